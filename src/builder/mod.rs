//! # Builder Pattern for Requests and Configuration
//!
//! Every document this crate sends is assembled through a builder. For each
//! component, fields are optional while building and validated once you run
//! [`Builder::try_build`]. A successfully built object is complete: it can be
//! submitted as is.
//!
//! ## Example
//!
//! ```rust
//! use uuid::Uuid;
//! use prismpilot::builder::{Builder, vm::VmBuilder};
//! use prismpilot::builder::static_network::StaticNetworkBuilder;
//! use prismpilot::network::NetworkConfiguration;
//!
//! // Full static configuration, for a network not managed by the backend
//! let network = StaticNetworkBuilder::new()
//!     .with_ip_address("10.0.0.5".to_string())
//!     .with_prefix("24".to_string())
//!     .with_default_gw("10.0.0.1".to_string())
//!     .with_dns_server1("8.8.8.8".to_string())
//!     .with_dns_server2("8.8.4.4".to_string())
//!     .with_dns_search("example.com".to_string())
//!     .try_build()
//!     .unwrap();
//!
//! // Identifiers come from the resolver, names are not accepted here
//! let request = VmBuilder::new("web-01".to_string())
//!     .with_cluster(Uuid::new_v4())
//!     .with_project(Uuid::new_v4())
//!     .with_owner(Uuid::new_v4())
//!     .with_image(Uuid::new_v4())
//!     .with_subnet(Uuid::new_v4())
//!     .with_memory_size_mib(2048)
//!     .with_network(NetworkConfiguration::AssignedStatic(network))
//!     .try_build()
//!     .unwrap();
//! assert_eq!(request.spec.resources.disk_list.map(|d| d.len()), Some(2));
//! ```
pub mod config;
pub mod static_network;
pub mod vm;

fn assert_not_none<T>(key: &str, value: &Option<T>) -> Result<(), BuilderError> {
    match value {
        Some(_) => Ok(()),
        None => Err(BuilderError::MissingRequiredField(key.to_string())),
    }
}

/// Same as [assert_not_none], but a blank string counts as missing.
fn assert_not_blank(key: &str, value: &Option<String>) -> Result<(), BuilderError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(BuilderError::MissingRequiredField(key.to_string())),
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// The field is required but was not provided in the builder object
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),
    /// The field was provided, but its value cannot be used
    #[error("Invalid value for field {0}: {1}")]
    InvalidField(String, String),
    /// A template could not be rendered with the provided fields
    #[error("Could not render template: {0}")]
    Render(String),
}

/// Generic trait which all builder components must implement
pub trait Builder<T> {
    /// Validate all the fields from the builder object and apply it to the
    /// final object
    ///
    /// ## Example
    ///
    /// ```rust
    /// use prismpilot::builder::Builder;
    /// use prismpilot::builder::config::PrismConfigBuilder;
    ///
    /// PrismConfigBuilder::new()
    ///     .with_url("https://prism.example.com:9440".to_string())
    ///     .with_username("admin".to_string())
    ///     .with_password("secret".to_string())
    ///     .try_build()
    ///     .unwrap();
    /// ```
    fn try_build(self) -> Result<T, BuilderError>;
}

#[cfg(test)]
mod tests {
    use crate::builder::{assert_not_blank, assert_not_none, BuilderError};

    #[test]
    fn macro_assert_not_none() {
        let x = Some(1);
        let y: Option<String> = None;
        assert_eq!(assert_not_none("x", &x), Ok(()));
        assert_eq!(
            assert_not_none("y", &y),
            Err(BuilderError::MissingRequiredField("y".to_string()))
        );
    }

    #[test]
    fn blank_is_missing() {
        assert_eq!(assert_not_blank("x", &Some("a".to_string())), Ok(()));
        assert_eq!(
            assert_not_blank("y", &Some("  ".to_string())),
            Err(BuilderError::MissingRequiredField("y".to_string()))
        );
    }
}
