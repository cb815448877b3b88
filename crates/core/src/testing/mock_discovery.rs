//! Mock discovery registry for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::discovery::{DiscoveryError, DiscoveryRegistry};

/// Mock implementation of the DiscoveryRegistry trait.
///
/// Returns whatever service names were configured, or a registry error while
/// marked unavailable.
///
/// # Example
///
/// ```rust,ignore
/// use concerts_core::testing::MockDiscoveryRegistry;
///
/// let registry = MockDiscoveryRegistry::with_services(["ticket-svc-7"]);
/// registry.set_services(["svc-a", "svc-b"]).await;
/// ```
#[derive(Debug, Default)]
pub struct MockDiscoveryRegistry {
    services: Arc<RwLock<Vec<String>>>,
    unavailable: Arc<RwLock<Option<String>>>,
    calls: AtomicUsize,
}

impl MockDiscoveryRegistry {
    /// Create a registry with no services.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the given services.
    pub fn with_services<I, S>(services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            services: Arc::new(RwLock::new(services.into_iter().map(Into::into).collect())),
            ..Self::default()
        }
    }

    /// Replace the registered services.
    pub async fn set_services<I, S>(&self, services: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.services.write().await = services.into_iter().map(Into::into).collect();
    }

    /// Make every query fail with the given message until cleared.
    pub async fn set_unavailable(&self, message: impl Into<String>) {
        *self.unavailable.write().await = Some(message.into());
    }

    /// Make queries succeed again.
    pub async fn clear_unavailable(&self) {
        *self.unavailable.write().await = None;
    }

    /// Number of queries made.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DiscoveryRegistry for MockDiscoveryRegistry {
    async fn list_service_names(&self) -> Result<Vec<String>, DiscoveryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.unavailable.read().await.clone() {
            return Err(DiscoveryError::ApiError {
                status: 503,
                message,
            });
        }

        Ok(self.services.read().await.clone())
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}
