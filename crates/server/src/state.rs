use std::sync::Arc;

use concerts_core::{
    ConcertMetrics, ConcertService, ConcertStore, Config, DiscoveryRegistry, TicketingClient,
};

use crate::metrics::ServerMetrics;

/// Shared application state
pub struct AppState {
    config: Config,
    concerts: ConcertService,
    metrics: ServerMetrics,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn ConcertStore>,
        registry: Arc<dyn DiscoveryRegistry>,
        ticketing: Arc<dyn TicketingClient>,
    ) -> Result<Self, prometheus::Error> {
        let metrics = ServerMetrics::new()?;
        let concert_metrics = ConcertMetrics::new(metrics.registry())?;

        let concerts = ConcertService::new(store, registry, ticketing)
            .with_config(config.concerts.clone())
            .with_metrics(concert_metrics);

        Ok(Self {
            config,
            concerts,
            metrics,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn concerts(&self) -> &ConcertService {
        &self.concerts
    }

    pub fn metrics(&self) -> &ServerMetrics {
        &self.metrics
    }
}
