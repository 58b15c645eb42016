//! Metrics collection for observability

use crate::budget::SelectionResult;
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_with_registry, register_histogram_with_registry, Counter, Histogram, Opts,
    Registry,
};
use std::sync::Arc;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> =
    Lazy::new(|| Arc::new(Metrics::new().expect("Failed to initialize metrics")));

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    pub selections_total: Counter,
    pub items_truncated_total: Counter,
    pub empty_bundles_total: Counter,
    pub cache_hits_total: Counter,
    pub cache_misses_total: Counter,
    pub budget_chars_used: Histogram,
    pub budget_chars_remaining: Histogram,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let selections_total = register_counter_with_registry!(
            Opts::new("selections_total", "Total selection passes run"),
            registry
        )?;

        let items_truncated_total = register_counter_with_registry!(
            Opts::new("items_truncated_total", "Total content items truncated"),
            registry
        )?;

        let empty_bundles_total = register_counter_with_registry!(
            Opts::new(
                "empty_bundles_total",
                "Total assembled bundles with zero usable items"
            ),
            registry
        )?;

        let cache_hits_total = register_counter_with_registry!(
            Opts::new("cache_hits_total", "Total content cache hits"),
            registry
        )?;

        let cache_misses_total = register_counter_with_registry!(
            Opts::new("cache_misses_total", "Total content cache misses"),
            registry
        )?;

        let budget_chars_used = register_histogram_with_registry!(
            "budget_chars_used",
            "Chars of budget consumed per selection",
            registry
        )?;

        let budget_chars_remaining = register_histogram_with_registry!(
            "budget_chars_remaining",
            "Chars of budget left over per selection",
            registry
        )?;

        Ok(Self {
            registry,
            selections_total,
            items_truncated_total,
            empty_bundles_total,
            cache_hits_total,
            cache_misses_total,
            budget_chars_used,
            budget_chars_remaining,
        })
    }

    /// Get the metrics registry for exporting
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record one selection pass
    pub fn record_selection(&self, result: &SelectionResult) {
        self.selections_total.inc();
        self.budget_chars_used.observe(result.total_chars_used as f64);
        self.budget_chars_remaining
            .observe(result.chars_remaining as f64);
        let truncated = result.items.iter().filter(|i| i.truncated).count();
        self.items_truncated_total.inc_by(truncated as f64);
        if result.items_selected == 0 {
            self.empty_bundles_total.inc();
        }
    }

    /// Record cache lookups observed since the last call
    pub fn record_cache_delta(&self, hits: u64, misses: u64) {
        self.cache_hits_total.inc_by(hits as f64);
        self.cache_misses_total.inc_by(misses as f64);
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}
