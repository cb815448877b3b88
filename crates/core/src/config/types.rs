use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub ticketing: TicketingConfig,
    #[serde(default)]
    pub concerts: ConcertsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("concerts.db")
}

/// Service discovery configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscoveryConfig {
    /// Registry backend type
    pub backend: DiscoveryBackend,
    /// Registered service names (used when backend = "static")
    #[serde(default)]
    pub services: Vec<String>,
    /// Service names that are never considered ticketing candidates
    #[serde(default)]
    pub ignore: Vec<String>,
    /// Kubernetes-specific configuration (required when backend = "kubernetes")
    #[serde(default)]
    pub kubernetes: Option<KubernetesConfig>,
}

/// Available discovery backends
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryBackend {
    Static,
    Kubernetes,
}

/// Kubernetes API discovery configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KubernetesConfig {
    /// API server URL (e.g., "https://kubernetes.default.svc")
    #[serde(default = "default_k8s_api_url")]
    pub api_url: String,
    /// Namespace whose services are listed
    #[serde(default = "default_k8s_namespace")]
    pub namespace: String,
    /// Service account token file
    #[serde(default = "default_k8s_token_path")]
    pub token_path: PathBuf,
    /// CA bundle for the API server certificate
    #[serde(default)]
    pub ca_path: Option<PathBuf>,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for KubernetesConfig {
    fn default() -> Self {
        Self {
            api_url: default_k8s_api_url(),
            namespace: default_k8s_namespace(),
            token_path: default_k8s_token_path(),
            ca_path: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_k8s_api_url() -> String {
    "https://kubernetes.default.svc".to_string()
}

fn default_k8s_namespace() -> String {
    "default".to_string()
}

fn default_k8s_token_path() -> PathBuf {
    PathBuf::from("/var/run/secrets/kubernetes.io/serviceaccount/token")
}

/// Ticketing service client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TicketingConfig {
    /// Path queried on the discovered endpoint
    #[serde(default = "default_tickets_path")]
    pub path: String,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for TicketingConfig {
    fn default() -> Self {
        Self {
            path: default_tickets_path(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_tickets_path() -> String {
    "/tickets".to_string()
}

fn default_timeout() -> u32 {
    10
}

/// Concert service behaviour
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConcertsConfig {
    /// What a name search with zero matches produces
    #[serde(default)]
    pub no_match_by_name: NoMatchPolicy,
}

/// Outcome of a name search that matched nothing.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoMatchPolicy {
    /// Report the empty result as an error.
    #[default]
    Error,
    /// Return an empty list.
    Empty,
}
