//! Kubernetes API discovery.
//!
//! Lists the services of one namespace through the API server, authenticating
//! with the pod's service-account token. The token is re-read on every call
//! because the kubelet rotates it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Certificate, Client};
use serde::Deserialize;
use tracing::debug;

use super::{filter_names, DiscoveryError, DiscoveryRegistry};
use crate::config::KubernetesConfig;

/// Registry listing Kubernetes services in a namespace.
pub struct KubernetesRegistry {
    client: Client,
    services_url: String,
    config: KubernetesConfig,
    ignore: Vec<String>,
}

impl KubernetesRegistry {
    /// Create a new Kubernetes registry.
    pub fn new(config: KubernetesConfig, ignore: Vec<String>) -> Result<Self, DiscoveryError> {
        let mut builder =
            Client::builder().timeout(Duration::from_secs(config.timeout_secs as u64));

        if let Some(ca_path) = &config.ca_path {
            let pem = std::fs::read(ca_path).map_err(|e| {
                DiscoveryError::NotConfigured(format!(
                    "cannot read CA bundle {}: {}",
                    ca_path.display(),
                    e
                ))
            })?;
            let certificate = Certificate::from_pem(&pem)?;
            builder = builder.add_root_certificate(certificate);
        }

        let services_url = format!(
            "{}/api/v1/namespaces/{}/services",
            config.api_url.trim_end_matches('/'),
            urlencoding::encode(&config.namespace)
        );

        Ok(Self {
            client: builder.build()?,
            services_url,
            config,
            ignore,
        })
    }

    async fn read_token(&self) -> Result<String, DiscoveryError> {
        let token = tokio::fs::read_to_string(&self.config.token_path)
            .await
            .map_err(|e| {
                DiscoveryError::NotConfigured(format!(
                    "cannot read service account token {}: {}",
                    self.config.token_path.display(),
                    e
                ))
            })?;
        Ok(token.trim().to_string())
    }
}

#[async_trait]
impl DiscoveryRegistry for KubernetesRegistry {
    async fn list_service_names(&self) -> Result<Vec<String>, DiscoveryError> {
        let token = self.read_token().await?;

        debug!(
            "Kubernetes discovery: namespace='{}', url={}",
            self.config.namespace, self.services_url
        );

        let response = self
            .client
            .get(&self.services_url)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DiscoveryError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let list: K8sServiceList = response.json().await.map_err(|e| {
            DiscoveryError::ParseError(format!("Failed to parse service list: {}", e))
        })?;

        let names = list.items.into_iter().map(|item| item.metadata.name);
        Ok(filter_names(names, &self.ignore))
    }

    fn backend_name(&self) -> &'static str {
        "kubernetes"
    }
}

// ============================================================================
// Kubernetes API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct K8sServiceList {
    #[serde(default)]
    items: Vec<K8sService>,
}

#[derive(Debug, Deserialize)]
struct K8sService {
    metadata: K8sObjectMeta,
}

#[derive(Debug, Deserialize)]
struct K8sObjectMeta {
    name: String,
}
