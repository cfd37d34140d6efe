//! Credential response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::credential::Credential;

/// Credential as returned to its owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialResponse {
    pub id: String,
    pub display_name: String,
    pub token: String,
    pub kind: String,
    pub usage_counter: u64,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<Credential> for CredentialResponse {
    fn from(credential: Credential) -> Self {
        Self {
            id: credential.id().to_string(),
            display_name: credential.display_name().to_string(),
            token: credential.token().to_string(),
            kind: credential.kind().to_string(),
            usage_counter: credential.usage_counter(),
            owner_id: credential.owner_id().to_string(),
            created_at: credential.created_at(),
        }
    }
}

/// List of the caller's credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialListResponse {
    pub api_keys: Vec<CredentialResponse>,
    pub total: usize,
}

impl From<Vec<Credential>> for CredentialListResponse {
    fn from(credentials: Vec<Credential>) -> Self {
        let api_keys: Vec<CredentialResponse> =
            credentials.into_iter().map(CredentialResponse::from).collect();
        let total = api_keys.len();

        Self { api_keys, total }
    }
}
