//! Concert service: stored concerts decorated with live ticket availability.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use super::ConcertError;
use crate::concert::{Concert, ConcertPatch, ConcertStore, NewConcert};
use crate::config::{ConcertsConfig, NoMatchPolicy};
use crate::discovery::{select_endpoint, DiscoveryRegistry, EndpointSelection, ServiceEndpoint};
use crate::metrics::ConcertMetrics;
use crate::ticketing::TicketingClient;

/// Orchestrates the concert store, the discovery registry and the ticketing
/// service.
///
/// Holds no per-request state: every call resolves its ticketing endpoint
/// from the registry again.
pub struct ConcertService {
    store: Arc<dyn ConcertStore>,
    registry: Arc<dyn DiscoveryRegistry>,
    ticketing: Arc<dyn TicketingClient>,
    config: ConcertsConfig,
    metrics: Option<ConcertMetrics>,
}

impl ConcertService {
    pub fn new(
        store: Arc<dyn ConcertStore>,
        registry: Arc<dyn DiscoveryRegistry>,
        ticketing: Arc<dyn TicketingClient>,
    ) -> Self {
        Self {
            store,
            registry,
            ticketing,
            config: ConcertsConfig::default(),
            metrics: None,
        }
    }

    /// Set the service behaviour options.
    pub fn with_config(mut self, config: ConcertsConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the metrics sink.
    pub fn with_metrics(mut self, metrics: ConcertMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Insert a new concert. The result is not decorated.
    #[instrument(skip(self, concert), fields(name = %concert.name))]
    pub async fn create(&self, concert: NewConcert) -> Result<Concert, ConcertError> {
        let concert = self.store.insert(concert).await?;
        info!(concert_id = %concert.id, "Concert created");
        Ok(concert)
    }

    /// List all stored concerts without decoration.
    ///
    /// The registry is queried alongside the store only to log which services
    /// are registered; its failure never fails the listing.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Concert>, ConcertError> {
        let (concerts, names) = tokio::join!(
            self.store.find_all(),
            self.registry.list_service_names()
        );

        match names {
            Ok(names) => {
                for name in &names {
                    info!(service = %name, "Discovered service");
                }
            }
            Err(e) => warn!(error = %e, "Service discovery failed while listing concerts"),
        }

        Ok(concerts?)
    }

    /// Substring search on concert names, without decoration.
    #[instrument(skip(self))]
    pub async fn find_by_name(&self, fragment: &str) -> Result<Vec<Concert>, ConcertError> {
        let concerts = self.store.find_by_name(fragment).await?;

        if concerts.is_empty() && self.config.no_match_by_name == NoMatchPolicy::Error {
            return Err(ConcertError::NoMatchByName(fragment.to_string()));
        }

        Ok(concerts)
    }

    /// Load a concert and decorate it with the current ticket availability.
    ///
    /// Returns only once the ticketing service has answered or a failure is
    /// certain. The store is checked before the registry outcome, so an
    /// unknown id is always `NotFound`.
    #[instrument(skip(self))]
    pub async fn resolve(&self, id: &str) -> Result<Concert, ConcertError> {
        let result = self.resolve_decorated(id).await;

        if let Some(metrics) = &self.metrics {
            let outcome = match &result {
                Ok(_) => "ok",
                Err(e) => e.kind(),
            };
            metrics.record_resolve(outcome);
        }

        if let Err(e) = &result {
            debug!(error = %e, "Concert resolution failed");
        }

        result
    }

    async fn resolve_decorated(&self, id: &str) -> Result<Concert, ConcertError> {
        let (stored, names) = tokio::join!(
            self.store.find_by_id(id),
            self.registry.list_service_names()
        );

        let concert = stored?.ok_or_else(|| ConcertError::NotFound(id.to_string()))?;
        let endpoint = self.pick_endpoint(names?)?;

        let started = Instant::now();
        let count = self.ticketing.available_tickets(&endpoint).await;
        if let Some(metrics) = &self.metrics {
            metrics.observe_ticketing(started.elapsed().as_secs_f64());
        }
        let count = count?;

        info!(endpoint = %endpoint, available_tickets = count, "Concert decorated");
        Ok(concert.with_available_tickets(count))
    }

    fn pick_endpoint(&self, names: Vec<String>) -> Result<ServiceEndpoint, ConcertError> {
        if let Some(metrics) = &self.metrics {
            metrics.observe_candidates(names.len());
        }

        match select_endpoint(names) {
            EndpointSelection::Selected(endpoint) => {
                info!(endpoint = %endpoint, "Tickets service discovered");
                Ok(endpoint)
            }
            EndpointSelection::Unavailable => {
                warn!("No tickets service registered");
                Err(ConcertError::ServiceUnavailable)
            }
            EndpointSelection::Ambiguous(candidates) => {
                warn!(?candidates, "More than one tickets service registered");
                Err(ConcertError::AmbiguousService(candidates))
            }
        }
    }

    /// Patch a concert and persist it.
    ///
    /// The concert must resolve first. The returned concert is the stored
    /// form, decorated with the count fetched while resolving, and is only
    /// returned once the store has committed the write.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: ConcertPatch) -> Result<Concert, ConcertError> {
        let mut concert = self.resolve(id).await?;
        let available_tickets = concert.available_tickets.take();
        concert.apply(patch);

        let mut saved = self.store.save(&concert).await?;
        info!("Concert updated");

        saved.available_tickets = available_tickets;
        Ok(saved)
    }

    /// Soft-delete a concert.
    ///
    /// Same precondition as [`Self::update`]. Deleting an already deleted
    /// concert succeeds again.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool, ConcertError> {
        let mut concert = self.resolve(id).await?;
        concert.is_deleted = true;

        self.store.save(&concert).await?;
        info!("Concert marked as deleted");

        Ok(true)
    }
}
