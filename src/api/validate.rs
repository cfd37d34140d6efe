//! Owner-blind key validation endpoint

use axum::extract::State;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::credential::ValidationOutcome;

/// Body of a validation request
#[derive(Deserialize)]
pub struct ValidateKeyRequest {
    #[serde(default, alias = "token")]
    pub key: Option<String>,
}

impl std::fmt::Debug for ValidateKeyRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidateKeyRequest")
            .field("key", &self.key.as_ref().map(|_| "[hidden]"))
            .finish()
    }
}

/// POST /api/validate-key
///
/// No session is required. An unknown key is `{"valid": false}`, not an error;
/// a missing or blank key is rejected before any lookup.
pub async fn validate_key(
    State(state): State<AppState>,
    Json(request): Json<ValidateKeyRequest>,
) -> Result<Json<ValidationOutcome>, ApiError> {
    let key = request.key.unwrap_or_default();

    let outcome = state.validation_service.validate(&key).await?;

    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_token_alias() {
        let request: ValidateKeyRequest = serde_json::from_str(r#"{"token":"abc"}"#).unwrap();
        assert_eq!(request.key.as_deref(), Some("abc"));

        let request: ValidateKeyRequest = serde_json::from_str("{}").unwrap();
        assert!(request.key.is_none());
    }

    #[test]
    fn test_request_debug_hides_key() {
        let request = ValidateKeyRequest {
            key: Some("supersecret".to_string()),
        };
        assert!(!format!("{:?}", request).contains("supersecret"));
    }
}
