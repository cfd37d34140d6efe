//! Observability infrastructure - Metrics

mod metrics;

pub use metrics::{
    PrometheusMetrics, ValidationResult, create_metrics_router, init_metrics,
    record_credential_operation, record_http_request, record_validation,
};
