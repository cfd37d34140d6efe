//! Session authentication for the owner-scoped surface

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::identity::Identity;

const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Extractor that resolves the caller's [`Identity`] from a session token
///
/// Reads `Authorization: Bearer <session token>`. A missing or invalid
/// session is rejected with 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct RequireIdentity(pub Identity);

impl FromRequestParts<AppState> for RequireIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_session_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized(NOT_AUTHENTICATED))?;

        let identity = state.session_verifier.verify(&token).map_err(|e| {
            debug!(error = %e, "Session rejected");
            ApiError::unauthorized(NOT_AUTHENTICATED)
        })?;

        Ok(RequireIdentity(identity))
    }
}

/// Credentials of a `Bearer` Authorization value; the scheme is case-insensitive
pub(crate) fn bearer_credentials(value: &str) -> Option<&str> {
    let (scheme, credentials) = value.trim_start().split_once(' ')?;

    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| credentials.trim())
}

/// Extract a session token from the Authorization header
fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = bearer_credentials(value)?;

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
