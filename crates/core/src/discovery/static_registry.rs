use async_trait::async_trait;

use super::{filter_names, DiscoveryError, DiscoveryRegistry};

/// Registry backed by a fixed list of service names.
pub struct StaticRegistry {
    names: Vec<String>,
}

impl StaticRegistry {
    pub fn new(names: Vec<String>, ignore: Vec<String>) -> Self {
        Self {
            names: filter_names(names, &ignore),
        }
    }
}

#[async_trait]
impl DiscoveryRegistry for StaticRegistry {
    async fn list_service_names(&self) -> Result<Vec<String>, DiscoveryError> {
        Ok(self.names.clone())
    }

    fn backend_name(&self) -> &'static str {
        "static"
    }
}
