//! API layer - HTTP endpoints and middleware

pub mod health;
pub mod keys;
pub mod middleware;
pub mod router;
pub mod state;
pub mod summarizer;
pub mod types;
pub mod validate;

pub use middleware::{RequireApiKey, RequireIdentity};
pub use router::create_router_with_state;
pub use state::AppState;
