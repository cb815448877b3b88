//! Service discovery: where is the ticketing service right now?
//!
//! A registry only reports the names currently registered. Choosing an
//! endpoint among them is the concert service's job.

mod endpoint;
mod kubernetes;
mod static_registry;

pub use endpoint::{select_endpoint, EndpointSelection, ServiceEndpoint};
pub use kubernetes::KubernetesRegistry;
pub use static_registry::StaticRegistry;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{DiscoveryBackend, DiscoveryConfig};

/// Errors that can occur when querying a discovery registry.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Registry API returned an error.
    #[error("Registry error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse registry response: {0}")]
    ParseError(String),

    /// Registry not usable with the given configuration.
    #[error("Registry not configured: {0}")]
    NotConfigured(String),
}

/// Trait for discovery registries.
#[async_trait]
pub trait DiscoveryRegistry: Send + Sync {
    /// Names of the currently registered services.
    async fn list_service_names(&self) -> Result<Vec<String>, DiscoveryError>;

    /// Name of this registry backend.
    fn backend_name(&self) -> &'static str;
}

/// Factory function to create a registry from config
pub fn create_registry(
    config: &DiscoveryConfig,
) -> Result<Box<dyn DiscoveryRegistry>, DiscoveryError> {
    match config.backend {
        DiscoveryBackend::Static => Ok(Box::new(StaticRegistry::new(
            config.services.clone(),
            config.ignore.clone(),
        ))),
        DiscoveryBackend::Kubernetes => {
            let k8s = config.kubernetes.clone().ok_or_else(|| {
                DiscoveryError::NotConfigured(
                    "discovery.kubernetes must be set when using the kubernetes backend"
                        .to_string(),
                )
            })?;
            Ok(Box::new(KubernetesRegistry::new(k8s, config.ignore.clone())?))
        }
    }
}

/// Drop ignored names, then sort and de-duplicate.
fn filter_names(names: impl IntoIterator<Item = String>, ignore: &[String]) -> Vec<String> {
    let mut names: Vec<String> = names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty() && !ignore.contains(name))
        .collect();
    names.sort();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_names() {
        let names = vec![
            "tickets".to_string(),
            "concerts".to_string(),
            " tickets ".to_string(),
            String::new(),
            "billing".to_string(),
        ];
        let filtered = filter_names(names, &["concerts".to_string()]);
        assert_eq!(filtered, vec!["billing", "tickets"]);
    }

    #[tokio::test]
    async fn test_create_registry_static() {
        let config = DiscoveryConfig {
            backend: DiscoveryBackend::Static,
            services: vec!["ticket-svc-7".to_string()],
            ignore: vec![],
            kubernetes: None,
        };
        let registry = create_registry(&config).unwrap();
        assert_eq!(registry.backend_name(), "static");
        assert_eq!(
            registry.list_service_names().await.unwrap(),
            vec!["ticket-svc-7"]
        );
    }

    #[test]
    fn test_create_registry_kubernetes_missing_section() {
        let config = DiscoveryConfig {
            backend: DiscoveryBackend::Kubernetes,
            services: vec![],
            ignore: vec![],
            kubernetes: None,
        };
        let result = create_registry(&config);
        assert!(matches!(result, Err(DiscoveryError::NotConfigured(_))));
    }
}
