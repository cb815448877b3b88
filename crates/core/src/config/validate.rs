use super::{
    types::{Config, DiscoveryBackend},
    ConfigError,
};

/// Validate configuration
/// Currently validates:
/// - Discovery section exists (enforced by serde)
/// - Server port is not 0
/// - Kubernetes backend has its section
/// - Ticketing path is absolute and timeouts are non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.discovery.backend == DiscoveryBackend::Kubernetes {
        match &config.discovery.kubernetes {
            None => {
                return Err(ConfigError::ValidationError(
                    "discovery.kubernetes must be set when backend = \"kubernetes\"".to_string(),
                ));
            }
            Some(k8s) if k8s.timeout_secs == 0 => {
                return Err(ConfigError::ValidationError(
                    "discovery.kubernetes.timeout_secs cannot be 0".to_string(),
                ));
            }
            Some(_) => {}
        }
    }

    if !config.ticketing.path.starts_with('/') {
        return Err(ConfigError::ValidationError(format!(
            "ticketing.path must start with '/': {}",
            config.ticketing.path
        )));
    }

    if config.ticketing.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "ticketing.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
