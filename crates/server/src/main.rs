use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use concerts_core::{
    create_registry, load_config, validate_config, Config, ConcertStore, DiscoveryRegistry,
    HttpTicketingClient, SqliteConcertStore, TicketingClient,
};
use concerts_server::{api::create_router, state::AppState};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable naming the config file.
const CONFIG_PATH_VAR: &str = "CONCERTS_CONFIG";

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn run() -> Result<()> {
    info!("concerts v{}", VERSION);

    let config_path = std::env::var(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let state = Arc::new(build_state(config)?);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Wire the store, registry and ticketing client from configuration.
fn build_state(config: Config) -> Result<AppState> {
    info!("Database path: {:?}", config.database.path);
    let store: Arc<dyn ConcertStore> = Arc::new(
        SqliteConcertStore::new(&config.database.path)
            .context("Failed to open concert store")?,
    );

    let registry: Arc<dyn DiscoveryRegistry> = Arc::from(
        create_registry(&config.discovery).context("Failed to create discovery registry")?,
    );
    info!(
        backend = registry.backend_name(),
        ignore = ?config.discovery.ignore,
        "Service discovery ready"
    );

    let ticketing: Arc<dyn TicketingClient> = Arc::new(
        HttpTicketingClient::new(&config.ticketing)
            .context("Failed to create ticketing client")?,
    );
    info!(
        path = %config.ticketing.path,
        timeout_secs = config.ticketing.timeout_secs,
        "Ticketing client ready"
    );

    AppState::new(config, store, registry, ticketing).context("Failed to register metrics")
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
