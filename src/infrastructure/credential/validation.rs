//! Owner-blind bearer validation
//!
//! Answers "does this token belong to any existing credential?" and nothing
//! more. No field of a matching record leaves this module.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::domain::DomainError;
use crate::domain::credential::CredentialStore;
use crate::infrastructure::observability::{ValidationResult, record_validation};

use super::generator::token_fingerprint;

/// Result of a validation check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
}

/// Read-only validation of presented bearer tokens
#[derive(Debug)]
pub struct ValidationService<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
}

impl<S: CredentialStore> Clone for ValidationService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: CredentialStore> ValidationService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Check whether a token matches an existing credential
    ///
    /// The token is matched exactly as presented. A blank token is a
    /// request-shape error raised before any lookup. An unknown token is
    /// `valid: false`; only store failures are errors.
    pub async fn validate(&self, token: &str) -> Result<ValidationOutcome, DomainError> {
        if token.trim().is_empty() {
            return Err(DomainError::validation("API key is required"));
        }

        let fingerprint = token_fingerprint(token);

        match self.store.find_by_token(token).await {
            Ok(found) => {
                let valid = found.is_some();
                debug!(token_fingerprint = %fingerprint, valid, "API key validated");
                record_validation(if valid {
                    ValidationResult::Valid
                } else {
                    ValidationResult::Invalid
                });
                Ok(ValidationOutcome { valid })
            }
            Err(e) => {
                error!(token_fingerprint = %fingerprint, error = %e, "API key validation failed");
                record_validation(ValidationResult::Error);
                Err(e)
            }
        }
    }

    /// Check that the backing store is reachable
    pub async fn health_check(&self) -> Result<(), DomainError> {
        self.store.health_check().await
    }
}
