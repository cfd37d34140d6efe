use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::health;
use super::keys;
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::summarizer;
use super::validate;

/// Routes under `/api`
fn create_api_router() -> Router<AppState> {
    Router::new()
        // Owner-scoped key management (session required)
        .route("/keys", get(keys::list_keys).post(keys::create_key))
        .route(
            "/keys/{key_id}",
            get(keys::get_key)
                .put(keys::update_key)
                .patch(keys::update_key)
                .delete(keys::delete_key),
        )
        // Bearer surfaces (no session)
        .route("/validate-key", post(validate::validate_key))
        .route(
            "/github-summarizer",
            post(summarizer::summarize_repository),
        )
}

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/api", create_api_router())
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
