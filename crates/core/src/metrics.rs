//! Prometheus metrics for the concert service.
//!
//! Metrics are registered into a registry supplied by the caller, so every
//! service instance (and every test) gets its own set.

use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts, Registry};

/// Metrics sink injected into [`crate::ConcertService`].
#[derive(Clone)]
pub struct ConcertMetrics {
    resolve_total: IntCounterVec,
    ticketing_duration: Histogram,
    discovery_candidates: Histogram,
}

impl ConcertMetrics {
    /// Create the metrics and register them into `registry`.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let resolve_total = IntCounterVec::new(
            Opts::new(
                "concerts_resolve_total",
                "Concert resolutions by outcome",
            ),
            &["result"], // "ok", or the error kind
        )?;

        let ticketing_duration = Histogram::with_opts(
            HistogramOpts::new(
                "concerts_ticketing_request_duration_seconds",
                "Duration of ticketing service availability queries",
            )
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;

        let discovery_candidates = Histogram::with_opts(
            HistogramOpts::new(
                "concerts_discovery_candidates",
                "Number of ticketing candidates returned by the registry",
            )
            .buckets(vec![0.0, 1.0, 2.0, 3.0, 5.0, 10.0]),
        )?;

        registry.register(Box::new(resolve_total.clone()))?;
        registry.register(Box::new(ticketing_duration.clone()))?;
        registry.register(Box::new(discovery_candidates.clone()))?;

        Ok(Self {
            resolve_total,
            ticketing_duration,
            discovery_candidates,
        })
    }

    pub fn record_resolve(&self, result: &str) {
        self.resolve_total.with_label_values(&[result]).inc();
    }

    pub fn observe_ticketing(&self, seconds: f64) {
        self.ticketing_duration.observe(seconds);
    }

    pub fn observe_candidates(&self, count: usize) {
        self.discovery_candidates.observe(count as f64);
    }

    /// Resolutions recorded with the given outcome.
    pub fn resolve_count(&self, result: &str) -> u64 {
        self.resolve_total.with_label_values(&[result]).get()
    }
}
