//! Credential persistence trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Credential, CredentialChanges, CredentialId, NewCredential};
use crate::domain::DomainError;
use crate::domain::identity::OwnerId;

/// Persistence collaborator for credentials
///
/// Every operation is atomic for a single record. Owner-scoped operations
/// treat a record held by another owner exactly like a missing one.
#[async_trait]
pub trait CredentialStore: Send + Sync + Debug {
    /// Insert a new credential, assigning its id and creation time
    ///
    /// Fails with `DomainError::Conflict` when the token is already in use.
    async fn insert(&self, credential: NewCredential) -> Result<Credential, DomainError>;

    /// Get a credential by id, restricted to its owner
    async fn get_by_id(
        &self,
        id: &CredentialId,
        owner: &OwnerId,
    ) -> Result<Option<Credential>, DomainError>;

    /// List an owner's credentials, newest first
    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Credential>, DomainError>;

    /// Apply changes to an owned credential and return the stored result
    ///
    /// Fails with `DomainError::Conflict` when a new token collides.
    async fn update_by_id(
        &self,
        id: &CredentialId,
        owner: &OwnerId,
        changes: &CredentialChanges,
    ) -> Result<Option<Credential>, DomainError>;

    /// Delete an owned credential; returns whether a record was removed
    async fn delete_by_id(&self, id: &CredentialId, owner: &OwnerId)
    -> Result<bool, DomainError>;

    /// Find a credential by token across all owners
    async fn find_by_token(&self, token: &str) -> Result<Option<Credential>, DomainError>;

    /// Check that the backing store is reachable
    async fn health_check(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
