//! Owner-scoped API key management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use crate::api::middleware::RequireIdentity;
use crate::api::state::AppState;
use crate::api::types::{ApiError, CredentialListResponse, CredentialResponse, Json};
use crate::domain::credential::{
    CreateCredentialRequest, CredentialId, CredentialPatch, ownership,
};

/// Parse a path id; malformed ids are indistinguishable from missing records
fn parse_key_id(key_id: &str) -> Result<CredentialId, ApiError> {
    CredentialId::parse(key_id).ok_or_else(|| ApiError::from(ownership::not_found()))
}

/// GET /api/keys
pub async fn list_keys(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
) -> Result<Json<CredentialListResponse>, ApiError> {
    debug!(owner_id = %identity.owner_id(), "Listing API keys");

    let credentials = state.credential_service.list(&identity).await?;

    Ok(Json(CredentialListResponse::from(credentials)))
}

/// POST /api/keys
pub async fn create_key(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    Json(request): Json<CreateCredentialRequest>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(owner_id = %identity.owner_id(), "Creating API key");

    let credential = state.credential_service.create(&identity, request).await?;

    Ok((StatusCode::CREATED, Json(CredentialResponse::from(credential))))
}

/// GET /api/keys/{key_id}
pub async fn get_key(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    Path(key_id): Path<String>,
) -> Result<Json<CredentialResponse>, ApiError> {
    let id = parse_key_id(&key_id)?;

    let credential = state.credential_service.get(&identity, &id).await?;

    Ok(Json(CredentialResponse::from(credential)))
}

/// PUT|PATCH /api/keys/{key_id}
pub async fn update_key(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    Path(key_id): Path<String>,
    Json(patch): Json<CredentialPatch>,
) -> Result<Json<CredentialResponse>, ApiError> {
    let id = parse_key_id(&key_id)?;
    debug!(owner_id = %identity.owner_id(), key_id = %id, "Updating API key");

    let credential = state.credential_service.update(&identity, &id, patch).await?;

    Ok(Json(CredentialResponse::from(credential)))
}

/// DELETE /api/keys/{key_id}
pub async fn delete_key(
    State(state): State<AppState>,
    RequireIdentity(identity): RequireIdentity,
    Path(key_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_key_id(&key_id)?;
    debug!(owner_id = %identity.owner_id(), key_id = %id, "Deleting API key");

    state.credential_service.delete(&identity, &id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_id() {
        let id = CredentialId::generate();
        assert_eq!(parse_key_id(&id.to_string()).unwrap(), id);

        let err = parse_key_id("not-a-uuid").unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.response.error.message, ownership::NOT_FOUND_MESSAGE);
    }
}
