pub mod concert;
pub mod config;
pub mod discovery;
pub mod metrics;
pub mod service;
pub mod testing;
pub mod ticketing;

pub use concert::{Concert, ConcertPatch, ConcertStore, NewConcert, SqliteConcertStore, StoreError};
pub use config::{
    load_config, load_config_from_str, validate_config, ConcertsConfig, Config, ConfigError,
    DatabaseConfig, DiscoveryBackend, DiscoveryConfig, KubernetesConfig, NoMatchPolicy,
    ServerConfig, TicketingConfig,
};
pub use discovery::{
    create_registry, select_endpoint, DiscoveryError, DiscoveryRegistry, EndpointSelection,
    KubernetesRegistry, ServiceEndpoint, StaticRegistry,
};
pub use metrics::ConcertMetrics;
pub use service::{ConcertError, ConcertService};
pub use ticketing::{HttpTicketingClient, TicketingClient, TicketingError};
