//! API key authentication for machine callers

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use tracing::debug;

use super::session::bearer_credentials;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::infrastructure::credential::token_fingerprint;

/// Extractor that requires a valid API key
///
/// Extracts the API key from either:
/// - Authorization header: `Bearer <api_key>`
/// - X-API-Key header: `<api_key>`
///
/// Only the existence of the key is checked; no session is involved.
#[derive(Debug, Clone)]
pub struct RequireApiKey;

impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let api_key = extract_api_key_from_headers(&parts.headers)?;

        debug!(token_fingerprint = %token_fingerprint(&api_key), "Validating API key");

        let outcome = state.validation_service.validate(&api_key).await?;
        if !outcome.valid {
            return Err(ApiError::unauthorized("Invalid API key"));
        }

        Ok(RequireApiKey)
    }
}

fn extract_api_key_from_headers(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

        if let Some(token) = bearer_credentials(auth_str) {
            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }
    }

    if let Some(api_key_header) = headers.get("x-api-key") {
        let key = api_key_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid X-API-Key header encoding"))?
            .trim();

        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }

    Err(ApiError::bad_request(
        "API key is required. Provide via 'Authorization: Bearer <key>' or 'X-API-Key: <key>' header",
    )
    .with_param("x-api-key"))
}
