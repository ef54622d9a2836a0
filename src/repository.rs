//! # Low-Level Access to the Intent API
//!
//! The repository is the component that talks to the backend. It knows how
//! to list entities of a kind, read one entity, and submit creations and full
//! replacements. It knows nothing about VMs, disks or tasks beyond their
//! collection names.
//!
//! ## Design
//!
//! [Repository] is the seam between the protocol logic of this crate and the
//! wire. Everything above it ([crate::resolver], [crate::mutation],
//! [crate::task]) is written against the trait so it can be exercised with an
//! in-memory backend. [HttpRepository] is the implementation used against a
//! real Prism endpoint.
//!
//! ## Implementation
//!
//! [HttpRepository] uses a `hyper` client. By default the connector speaks
//! both `https` (rustls with webpki roots) and plain `http`. Any other
//! `hyper` connector can be supplied with [HttpRepository::with_connector],
//! for example one carrying a custom TLS configuration.
use std::fmt;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use hyper::{
    client::{connect::Connect, HttpConnector},
    Body, Client, Method, Request, StatusCode,
};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use serde_json::Value;
use tracing::{debug, error, instrument, trace};

use crate::builder::config::PrismConfig;
use prismpilot_models::models::{EntityList, IntentResponse, ListRequest};

/// Prefix of every call made against the intent API.
const API_PREFIX: &str = "api/nutanix/v3";

/// Kinds of entities addressed by this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Cluster,
    Image,
    Subnet,
    Project,
    User,
    Vm,
    Task,
}

impl Kind {
    /// Value of the `kind` field in request documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Cluster => "cluster",
            Kind::Image => "image",
            Kind::Subnet => "subnet",
            Kind::Project => "project",
            Kind::User => "user",
            Kind::Vm => "vm",
            Kind::Task => "task",
        }
    }

    /// Path segment of the REST collection holding entities of this kind
    pub fn collection(&self) -> &'static str {
        match self {
            Kind::Cluster => "clusters",
            Kind::Image => "images",
            Kind::Subnet => "subnets",
            Kind::Project => "projects",
            Kind::User => "users",
            Kind::Vm => "vms",
            Kind::Task => "tasks",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RepositoryError {
    #[error("Could not build uri for {0}, reason: {1}")]
    InvalidUri(String, String),
    #[error("Could not send request on uri {0}, reason: {1}")]
    Request(hyper::Uri, String),
    #[error("Request on uri {uri} failed with status {status}: {body}")]
    Status {
        uri: hyper::Uri,
        status: StatusCode,
        body: String,
    },
    #[error("Nothing found at uri {0}")]
    NotFound(hyper::Uri),
    #[error("Update on uri {0} conflicts with a concurrent modification")]
    Conflict(hyper::Uri),
    #[error("Could not serialize request, reason: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Could not deserialize response, reason: {0}")]
    Deserialize(#[source] serde_json::Error),
}

impl RepositoryError {
    /// Whether the backend answered at all. When it did not, the effect of a
    /// mutating call is unknown.
    pub fn is_answer(&self) -> bool {
        matches!(
            self,
            RepositoryError::Status { .. }
                | RepositoryError::NotFound(_)
                | RepositoryError::Conflict(_)
        )
    }
}

/// Typed requests the protocol layers need from the backend.
///
/// Responses of `get` are returned as raw JSON so the caller decides which
/// model to read them into.
#[async_trait]
pub trait Repository: fmt::Debug + Send + Sync {
    /// `POST <collection>/list`
    async fn list(&self, kind: Kind, request: &ListRequest) -> Result<EntityList, RepositoryError>;

    /// `GET <collection>/<uuid>`
    async fn get(&self, kind: Kind, uuid: &str) -> Result<Value, RepositoryError>;

    /// `PUT <collection>/<uuid>`, a full replace of the entity intent
    async fn update(
        &self,
        kind: Kind,
        uuid: &str,
        body: Value,
    ) -> Result<IntentResponse, RepositoryError>;

    /// `POST <collection>`
    async fn create(&self, kind: Kind, body: Value) -> Result<IntentResponse, RepositoryError>;
}

/// Repository speaking HTTP(S) to a Prism endpoint.
pub struct HttpRepository<C = HttpsConnector<HttpConnector>> {
    /// Base url of the endpoint, without the API prefix.
    base: String,
    /// Precomputed value of the `Authorization` header.
    authorization: String,
    client: Client<C, Body>,
}

impl HttpRepository {
    /// Create a repository using the default `https`/`http` connector.
    pub fn new(config: &PrismConfig) -> HttpRepository {
        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();
        HttpRepository::with_connector(config, connector)
    }
}

impl<C> HttpRepository<C>
where
    C: Connect + Clone + Send + Sync + 'static,
{
    /// Create a repository sending requests through the given connector.
    pub fn with_connector(config: &PrismConfig, connector: C) -> HttpRepository<C> {
        let credentials = format!("{}:{}", config.username, config.password);
        HttpRepository {
            base: config.url.as_str().trim_end_matches('/').to_string(),
            authorization: format!("Basic {}", STANDARD.encode(credentials)),
            client: Client::builder().build(connector),
        }
    }

    fn uri(&self, path: &str) -> Result<hyper::Uri, RepositoryError> {
        let uri = format!("{}/{}/{}", self.base, API_PREFIX, path);
        uri.parse::<hyper::Uri>()
            .map_err(|e| RepositoryError::InvalidUri(uri.clone(), e.to_string()))
    }

    #[instrument(skip(self, body), fields(base = %self.base))]
    async fn send_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, RepositoryError> {
        let url = self.uri(path)?;
        debug!("Send {} request to {}", method, url);

        let body = match body {
            Some(json) => {
                let body = serde_json::to_string(&json).map_err(RepositoryError::Serialize)?;
                trace!("Sent body [{}]: {}", url, body);
                Body::from(body)
            }
            None => Body::empty(),
        };

        let request = Request::builder()
            .method(method)
            .uri(url.clone())
            .header("Authorization", &self.authorization)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header("Cache-Control", "no-cache")
            .body(body)
            .map_err(|e| RepositoryError::Request(url.clone(), e.to_string()))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| RepositoryError::Request(url.clone(), e.to_string()))?;

        let status = response.status();
        trace!("Response status: {:#?}", status);
        let bytes = hyper::body::to_bytes(response.into_body())
            .await
            .map_err(|e| RepositoryError::Request(url.clone(), e.to_string()))?;

        match status {
            StatusCode::OK | StatusCode::ACCEPTED => {
                trace!(
                    "Response body [{}]: {}",
                    url,
                    String::from_utf8_lossy(&bytes)
                );
                if bytes.is_empty() {
                    return Ok(Value::Null);
                }
                serde_json::from_slice(&bytes).map_err(RepositoryError::Deserialize)
            }
            StatusCode::NOT_FOUND => {
                debug!("Nothing found at {}", url);
                Err(RepositoryError::NotFound(url))
            }
            StatusCode::CONFLICT => {
                debug!("Conflicting update on {}", url);
                Err(RepositoryError::Conflict(url))
            }
            _ => {
                let body = String::from_utf8_lossy(&bytes).to_string();
                error!("Request to {} failed: {:#?}", url, status);
                error!("Request [{}] body: {}", url, body);
                Err(RepositoryError::Status {
                    uri: url,
                    status,
                    body,
                })
            }
        }
    }
}

#[async_trait]
impl<C> Repository for HttpRepository<C>
where
    C: Connect + Clone + Send + Sync + 'static,
{
    async fn list(&self, kind: Kind, request: &ListRequest) -> Result<EntityList, RepositoryError> {
        let body = serde_json::to_value(request).map_err(RepositoryError::Serialize)?;
        let path = format!("{}/list", kind.collection());
        let json = self.send_request(Method::POST, &path, Some(body)).await?;
        serde_json::from_value(json).map_err(RepositoryError::Deserialize)
    }

    async fn get(&self, kind: Kind, uuid: &str) -> Result<Value, RepositoryError> {
        let path = format!("{}/{}", kind.collection(), uuid);
        self.send_request(Method::GET, &path, None).await
    }

    async fn update(
        &self,
        kind: Kind,
        uuid: &str,
        body: Value,
    ) -> Result<IntentResponse, RepositoryError> {
        let path = format!("{}/{}", kind.collection(), uuid);
        let json = self.send_request(Method::PUT, &path, Some(body)).await?;
        serde_json::from_value(json).map_err(RepositoryError::Deserialize)
    }

    async fn create(&self, kind: Kind, body: Value) -> Result<IntentResponse, RepositoryError> {
        let json = self
            .send_request(Method::POST, kind.collection(), Some(body))
            .await?;
        serde_json::from_value(json).map_err(RepositoryError::Deserialize)
    }
}

impl<C> fmt::Debug for HttpRepository<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRepository")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{config::PrismConfigBuilder, Builder};

    fn config(url: &str) -> PrismConfig {
        PrismConfigBuilder::new()
            .with_url(url.to_string())
            .with_username("admin".to_string())
            .with_password("secret".to_string())
            .try_build()
            .unwrap()
    }

    #[test]
    fn kind_collections() {
        assert_eq!(Kind::Vm.collection(), "vms");
        assert_eq!(Kind::Task.collection(), "tasks");
        assert_eq!(Kind::Subnet.as_str(), "subnet");
        assert_eq!(Kind::User.to_string(), "user");
    }

    #[tokio::test]
    async fn uri_is_prefixed_with_api_path() {
        let repository = HttpRepository::new(&config("https://prism.local:9440/"));
        let uri = repository.uri("vms/list").unwrap();
        assert_eq!(
            uri.to_string(),
            "https://prism.local:9440/api/nutanix/v3/vms/list"
        );
    }

    #[tokio::test]
    async fn authorization_is_basic() {
        let repository = HttpRepository::new(&config("https://prism.local:9440"));
        // base64("admin:secret")
        assert_eq!(repository.authorization, "Basic YWRtaW46c2VjcmV0");
    }

    #[test]
    fn only_backend_answers_are_answers() {
        let uri: hyper::Uri = "http://localhost/".parse().unwrap();
        assert!(RepositoryError::Conflict(uri.clone()).is_answer());
        assert!(!RepositoryError::Request(uri, "refused".to_string()).is_answer());
    }
}
