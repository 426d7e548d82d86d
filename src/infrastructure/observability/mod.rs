//! Observability infrastructure - Tracing, Metrics, and Logging

mod config;
mod metrics;
mod tracing_setup;

pub use self::config::{MetricsConfig, ObservabilityConfig, TracingConfig};
pub use self::metrics::{
    create_metrics_router, init_metrics, record_dataset, record_decision, record_explanation,
    record_http_request, PrometheusMetrics,
};
pub use self::tracing_setup::{init_tracing, shutdown_tracing};
