//! Credential input validation utilities

use thiserror::Error;

use crate::domain::DomainError;

/// Errors raised while validating caller-supplied credential fields
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CredentialValidationError {
    #[error("API key name is required")]
    EmptyDisplayName,

    #[error("API key token cannot be empty")]
    EmptyToken,

    #[error("API key type cannot be empty")]
    EmptyKind,

    #[error("Usage must be a non-negative integer, got {0}")]
    NegativeUsage(i64),

    #[error("Field '{0}' cannot be modified")]
    ImmutableField(&'static str),

    #[error("Owner identifier cannot be empty")]
    EmptyOwner,
}

impl From<CredentialValidationError> for DomainError {
    fn from(err: CredentialValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

/// Default classification tag for new credentials
pub const DEFAULT_KIND: &str = "default";

/// Trim a display name and reject blanks
pub fn normalize_display_name(name: &str) -> Result<String, CredentialValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(CredentialValidationError::EmptyDisplayName);
    }

    Ok(trimmed.to_string())
}

/// Trim an explicit token and reject blanks
///
/// The remaining value is used verbatim.
pub fn normalize_token(token: &str) -> Result<String, CredentialValidationError> {
    let trimmed = token.trim();

    if trimmed.is_empty() {
        return Err(CredentialValidationError::EmptyToken);
    }

    Ok(trimmed.to_string())
}

/// Trim a classification tag and reject blanks
pub fn normalize_kind(kind: &str) -> Result<String, CredentialValidationError> {
    let trimmed = kind.trim();

    if trimmed.is_empty() {
        return Err(CredentialValidationError::EmptyKind);
    }

    Ok(trimmed.to_string())
}

/// Check that a usage counter is non-negative
pub fn validate_usage(usage: i64) -> Result<u64, CredentialValidationError> {
    u64::try_from(usage).map_err(|_| CredentialValidationError::NegativeUsage(usage))
}
