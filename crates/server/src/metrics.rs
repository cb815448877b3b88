//! Prometheus metrics for observability.
//!
//! Every [`ServerMetrics`] owns its registry. The concert service registers
//! its own metrics into the same registry, and `/metrics` exposes them all.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

/// HTTP metrics plus the registry they live in.
pub struct ServerMetrics {
    registry: Registry,
    http_request_duration: HistogramVec,
    http_requests_total: IntCounterVec,
    http_requests_in_flight: IntGauge,
}

impl ServerMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_request_duration = HistogramVec::new(
            HistogramOpts::new(
                "concerts_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "path", "status"],
        )?;

        let http_requests_total = IntCounterVec::new(
            Opts::new("concerts_http_requests_total", "Total HTTP requests"),
            &["method", "path", "status"],
        )?;

        let http_requests_in_flight = IntGauge::new(
            "concerts_http_requests_in_flight",
            "Number of HTTP requests currently being processed",
        )?;

        registry.register(Box::new(http_request_duration.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;

        Ok(Self {
            registry,
            http_request_duration,
            http_requests_total,
            http_requests_in_flight,
        })
    }

    /// Registry shared with the concert service metrics.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Count a request as in flight until the returned guard is dropped.
    ///
    /// The guard also covers requests whose future is dropped early, such as
    /// when the client disconnects.
    pub fn track_in_flight(&self) -> InFlightGuard {
        self.http_requests_in_flight.inc();
        InFlightGuard {
            gauge: self.http_requests_in_flight.clone(),
        }
    }

    pub fn in_flight(&self) -> i64 {
        self.http_requests_in_flight.get()
    }

    /// Record a completed request. `path` must come from a bounded set.
    pub fn observe_request(&self, method: &str, path: &str, status: &str, seconds: f64) {
        self.http_request_duration
            .with_label_values(&[method, path, status])
            .observe(seconds);
        self.http_requests_total
            .with_label_values(&[method, path, status])
            .inc();
    }

    /// Encode all registered metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Decrements the in-flight gauge on drop.
#[must_use = "the request stops counting as in flight when the guard is dropped"]
pub struct InFlightGuard {
    gauge: IntGauge,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.gauge.dec();
    }
}
