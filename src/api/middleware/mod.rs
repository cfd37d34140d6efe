//! API middleware components

pub mod api_key;
pub mod logging;
pub mod metrics;
pub mod session;

pub use api_key::RequireApiKey;
pub use logging::logging_middleware;
pub use metrics::metrics_middleware;
pub use session::RequireIdentity;
