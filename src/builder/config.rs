use std::{env::var, fmt, time::Duration};

use url::Url;

use crate::builder::{assert_not_blank, assert_not_none, Builder, BuilderError};

/// Page size used when listing entities, large enough to fetch everything
/// in one call on most installations.
pub const DEFAULT_MAX_RESULTS: u32 = 99999;
/// Interval between two task status fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Number of times a conflicting update is retried from a fresh read.
pub const DEFAULT_CONFLICT_RETRIES: u32 = 3;

/// Settings of a connection to a Prism endpoint
#[derive(Clone)]
pub struct PrismConfig {
    /// Base url of the endpoint, e.g. `https://prism.example.com:9440`
    pub url: Url,
    pub username: String,
    pub password: String,
    /// Page size for every list call
    pub max_results: u32,
    pub poll_interval: Duration,
    /// Give up waiting on a task after this long. No limit when unset.
    pub task_timeout: Option<Duration>,
    pub conflict_retries: u32,
}

impl fmt::Debug for PrismConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrismConfig")
            .field("url", &self.url.as_str())
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("max_results", &self.max_results)
            .field("poll_interval", &self.poll_interval)
            .field("task_timeout", &self.task_timeout)
            .field("conflict_retries", &self.conflict_retries)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct PrismConfigBuilder {
    url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    max_results: Option<u32>,
    poll_interval: Option<Duration>,
    task_timeout: Option<Duration>,
    conflict_retries: Option<u32>,
}

impl PrismConfigBuilder {
    pub fn new() -> PrismConfigBuilder {
        PrismConfigBuilder::default()
    }

    /// Create a builder from the environment, every variable is optional and
    /// missing ones can still be provided with the `with_*` methods:
    ///
    /// - `PRISM_URL`: base url of the endpoint
    /// - `PRISM_USERNAME`
    /// - `PRISM_PASSWORD`
    pub fn from_env() -> PrismConfigBuilder {
        PrismConfigBuilder {
            url: var("PRISM_URL").ok(),
            username: var("PRISM_USERNAME").ok(),
            password: var("PRISM_PASSWORD").ok(),
            ..PrismConfigBuilder::default()
        }
    }

    pub fn with_url(mut self, url: String) -> PrismConfigBuilder {
        self.url = Some(url);
        self
    }

    pub fn with_username(mut self, username: String) -> PrismConfigBuilder {
        self.username = Some(username);
        self
    }

    pub fn with_password(mut self, password: String) -> PrismConfigBuilder {
        self.password = Some(password);
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> PrismConfigBuilder {
        self.max_results = Some(max_results);
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> PrismConfigBuilder {
        self.poll_interval = Some(poll_interval);
        self
    }

    pub fn with_task_timeout(mut self, task_timeout: Duration) -> PrismConfigBuilder {
        self.task_timeout = Some(task_timeout);
        self
    }

    pub fn with_conflict_retries(mut self, conflict_retries: u32) -> PrismConfigBuilder {
        self.conflict_retries = Some(conflict_retries);
        self
    }
}

// Credentials are often read from files or terminals with a trailing newline.
fn strip_newlines(value: String) -> String {
    value.replace(['\n', '\r'], "")
}

impl Builder<PrismConfig> for PrismConfigBuilder {
    fn try_build(self) -> Result<PrismConfig, BuilderError> {
        assert_not_blank(stringify!(self.url), &self.url)?;
        assert_not_none(stringify!(self.username), &self.username)?;
        assert_not_none(stringify!(self.password), &self.password)?;

        let raw_url = self.url.unwrap_or_default();
        let url = Url::parse(raw_url.trim()).map_err(|e| {
            BuilderError::InvalidField(stringify!(self.url).to_string(), e.to_string())
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(BuilderError::InvalidField(
                stringify!(self.url).to_string(),
                format!("unsupported scheme {}", url.scheme()),
            ));
        }

        let max_results = self.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
        if max_results == 0 {
            return Err(BuilderError::InvalidField(
                stringify!(self.max_results).to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(PrismConfig {
            url,
            username: strip_newlines(self.username.unwrap_or_default()),
            password: strip_newlines(self.password.unwrap_or_default()),
            max_results,
            poll_interval: self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL),
            task_timeout: self.task_timeout,
            conflict_retries: self.conflict_retries.unwrap_or(DEFAULT_CONFLICT_RETRIES),
        })
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn complete() -> PrismConfigBuilder {
        PrismConfigBuilder::new()
            .with_url("https://prism.example.com:9440".to_string())
            .with_username("admin\n".to_string())
            .with_password("secret\r\n".to_string())
    }

    #[test]
    fn test_config_defaults() {
        let config = complete().try_build().unwrap();
        assert_eq!(config.username, "admin");
        assert_eq!(config.password, "secret");
        assert_eq!(config.max_results, DEFAULT_MAX_RESULTS);
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.task_timeout, None);
        assert_eq!(config.conflict_retries, 3);
    }

    #[test]
    fn test_config_required_fields() {
        let result = PrismConfigBuilder::new()
            .with_username("admin".to_string())
            .with_password("secret".to_string())
            .try_build();
        assert_eq!(
            result.unwrap_err(),
            BuilderError::MissingRequiredField(stringify!(self.url).to_string())
        );

        let result = PrismConfigBuilder::new()
            .with_url("https://prism.example.com".to_string())
            .with_username("admin".to_string())
            .try_build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_rejects_bad_url() {
        let result = complete().with_url("not a url".to_string()).try_build();
        assert!(matches!(result, Err(BuilderError::InvalidField(_, _))));

        let result = complete()
            .with_url("ftp://prism.example.com".to_string())
            .try_build();
        assert!(matches!(result, Err(BuilderError::InvalidField(_, _))));
    }

    #[test]
    fn test_debug_hides_password() {
        let config = complete().try_build().unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        std::env::set_var("PRISM_URL", "https://10.0.0.10:9440");
        std::env::set_var("PRISM_USERNAME", "operator");
        std::env::set_var("PRISM_PASSWORD", "hunter2");
        let config = PrismConfigBuilder::from_env()
            .with_max_results(50)
            .try_build()
            .unwrap();
        assert_eq!(config.url.host_str(), Some("10.0.0.10"));
        assert_eq!(config.username, "operator");
        assert_eq!(config.max_results, 50);
        std::env::remove_var("PRISM_URL");
        std::env::remove_var("PRISM_USERNAME");
        std::env::remove_var("PRISM_PASSWORD");
    }

    #[test]
    #[serial]
    fn test_config_from_empty_env() {
        std::env::remove_var("PRISM_URL");
        let result = PrismConfigBuilder::from_env().try_build();
        assert!(result.is_err());
    }
}
