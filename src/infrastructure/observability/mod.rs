//! Observability infrastructure - Metrics

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    init_metrics, record_cache_lookup, record_cache_refresh_failure, record_prefix_change,
    record_settings_created, CacheLookupResult, PrometheusMetrics,
};
