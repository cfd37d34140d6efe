//! Ownership gate
//!
//! Pure checks of an [`Identity`] against credential records. A record held
//! by someone else and a record that does not exist produce the same error.

use super::entity::Credential;
use crate::domain::DomainError;
use crate::domain::identity::Identity;

/// Message shared by every "absent or not yours" outcome
pub const NOT_FOUND_MESSAGE: &str = "API key not found";

/// Ownership-blind not-found error
pub fn not_found() -> DomainError {
    DomainError::not_found(NOT_FOUND_MESSAGE)
}

/// Authorize access to a single record
pub fn authorize(identity: &Identity, credential: Credential) -> Result<Credential, DomainError> {
    if credential.is_owned_by(identity.owner_id()) {
        Ok(credential)
    } else {
        Err(not_found())
    }
}

/// Resolve a lookup result into an owned record or the uniform not-found error
pub fn require_owned(
    identity: &Identity,
    credential: Option<Credential>,
) -> Result<Credential, DomainError> {
    match credential {
        Some(credential) => authorize(identity, credential),
        None => Err(not_found()),
    }
}

/// Keep only the records the identity owns, preserving order
pub fn retain_owned(identity: &Identity, credentials: Vec<Credential>) -> Vec<Credential> {
    credentials
        .into_iter()
        .filter(|c| c.is_owned_by(identity.owner_id()))
        .collect()
}
