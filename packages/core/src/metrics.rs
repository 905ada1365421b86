//! Prometheus metrics for the alert queue.
//!
//! [`AlertMetrics`] owns its counters and the [`Registry`] they belong to.
//! Construct it once at startup, wrap in `Arc`, and pass it to
//! [`AlertManager::with_metrics`](crate::alerts::AlertManager::with_metrics).

use prometheus::{Counter, Gauge, Opts, Registry};

/// All alert-queue metrics.
pub struct AlertMetrics {
    /// Alerts requested through `alert()`.
    pub requested_total: Counter,
    /// Alerts moved into the active slot.
    pub presented_total: Counter,
    /// Dismissals that cleared the active slot.
    pub dismissed_total: Counter,
    /// Dismissals ignored because the id was not the active alert.
    pub stale_dismissals_total: Counter,
    /// Listener invocations that panicked.
    pub listener_panics_total: Counter,
    /// Alerts currently waiting behind the active one.
    pub pending: Gauge,
    /// The registry that owns all of the above metrics.
    pub registry: Registry,
}

impl AlertMetrics {
    /// Create and register all metrics. Returns an error if any metric
    /// name is invalid or duplicated.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requested_total = Counter::with_opts(Opts::new(
            "alert_queue_requested_total",
            "Alerts requested",
        ))?;

        let presented_total = Counter::with_opts(Opts::new(
            "alert_queue_presented_total",
            "Alerts promoted into the active slot",
        ))?;

        let dismissed_total = Counter::with_opts(Opts::new(
            "alert_queue_dismissed_total",
            "Active alerts dismissed",
        ))?;

        let stale_dismissals_total = Counter::with_opts(Opts::new(
            "alert_queue_stale_dismissals_total",
            "Dismissals ignored for a non-active alert id",
        ))?;

        let listener_panics_total = Counter::with_opts(Opts::new(
            "alert_queue_listener_panics_total",
            "Listener invocations that panicked",
        ))?;

        let pending = Gauge::with_opts(Opts::new(
            "alert_queue_pending",
            "Alerts waiting behind the active one",
        ))?;

        registry.register(Box::new(requested_total.clone()))?;
        registry.register(Box::new(presented_total.clone()))?;
        registry.register(Box::new(dismissed_total.clone()))?;
        registry.register(Box::new(stale_dismissals_total.clone()))?;
        registry.register(Box::new(listener_panics_total.clone()))?;
        registry.register(Box::new(pending.clone()))?;

        Ok(Self {
            requested_total,
            presented_total,
            dismissed_total,
            stale_dismissals_total,
            listener_panics_total,
            pending,
            registry,
        })
    }

    /// Render all metrics in Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buf = Vec::new();
        encoder.encode(&metric_families, &mut buf)?;
        Ok(String::from_utf8(buf).unwrap_or_default())
    }
}
