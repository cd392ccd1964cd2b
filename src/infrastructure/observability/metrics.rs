//! Prometheus metrics infrastructure

use std::sync::Arc;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;

/// Prometheus metrics handle used to render a snapshot
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Renders all recorded metrics in the Prometheus text format
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("guild_settings_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!("Prometheus metrics initialized");

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// How a cache read for a guild's settings turned out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLookupResult {
    Hit,
    Miss,
    Corrupt,
    Error,
}

impl CacheLookupResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::Corrupt => "corrupt",
            Self::Error => "error",
        }
    }
}

pub fn record_cache_lookup(result: CacheLookupResult) {
    counter!("guild_settings_cache_lookups_total", "result" => result.as_str()).increment(1);
}

pub fn record_cache_refresh_failure() {
    counter!("guild_settings_cache_refresh_failures_total").increment(1);
}

pub fn record_settings_created() {
    counter!("guild_settings_records_created_total").increment(1);
}

pub fn record_prefix_change() {
    counter!("guild_settings_prefix_changes_total").increment(1);
}
