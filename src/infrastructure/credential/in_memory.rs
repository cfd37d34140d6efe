//! In-memory credential store

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::DomainError;
use crate::domain::credential::{
    Credential, CredentialChanges, CredentialId, CredentialStore, NewCredential,
};
use crate::domain::identity::OwnerId;

#[derive(Debug)]
struct StoredCredential {
    credential: Credential,
    /// Insertion order, used to break `created_at` ties
    seq: u64,
}

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<CredentialId, StoredCredential>,
    tokens: HashMap<String, CredentialId>,
    next_seq: u64,
}

/// Thread-safe in-memory credential store
///
/// Useful for testing and development. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    inner: RwLock<Inner>,
}

impl InMemoryCredentialStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, DomainError> {
        self.inner
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, DomainError> {
        self.inner
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))
    }
}

fn duplicate_token() -> DomainError {
    DomainError::conflict("An API key with this token already exists")
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn insert(&self, credential: NewCredential) -> Result<Credential, DomainError> {
        let mut inner = self.write()?;

        if inner.tokens.contains_key(&credential.token) {
            return Err(duplicate_token());
        }

        let id = CredentialId::generate();
        let created = Credential::from_new(id, credential, Utc::now());
        let seq = inner.next_seq;
        inner.next_seq += 1;

        inner.tokens.insert(created.token().to_string(), id);
        inner.records.insert(
            id,
            StoredCredential {
                credential: created.clone(),
                seq,
            },
        );

        Ok(created)
    }

    async fn get_by_id(
        &self,
        id: &CredentialId,
        owner: &OwnerId,
    ) -> Result<Option<Credential>, DomainError> {
        let inner = self.read()?;

        Ok(inner
            .records
            .get(id)
            .filter(|stored| stored.credential.is_owned_by(owner))
            .map(|stored| stored.credential.clone()))
    }

    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Credential>, DomainError> {
        let inner = self.read()?;

        let mut owned: Vec<&StoredCredential> = inner
            .records
            .values()
            .filter(|stored| stored.credential.is_owned_by(owner))
            .collect();

        owned.sort_by(|a, b| {
            b.credential
                .created_at()
                .cmp(&a.credential.created_at())
                .then(b.seq.cmp(&a.seq))
        });

        Ok(owned.into_iter().map(|s| s.credential.clone()).collect())
    }

    async fn update_by_id(
        &self,
        id: &CredentialId,
        owner: &OwnerId,
        changes: &CredentialChanges,
    ) -> Result<Option<Credential>, DomainError> {
        let mut inner = self.write()?;

        let old_token = match inner.records.get(id) {
            Some(stored) if stored.credential.is_owned_by(owner) => {
                stored.credential.token().to_string()
            }
            _ => return Ok(None),
        };

        if let Some(ref new_token) = changes.token {
            if *new_token != old_token && inner.tokens.contains_key(new_token) {
                return Err(duplicate_token());
            }
        }

        let updated = match inner.records.get_mut(id) {
            Some(stored) => {
                stored.credential.apply(changes);
                stored.credential.clone()
            }
            None => return Ok(None),
        };

        if updated.token() != old_token {
            inner.tokens.remove(&old_token);
            inner.tokens.insert(updated.token().to_string(), *id);
        }

        Ok(Some(updated))
    }

    async fn delete_by_id(
        &self,
        id: &CredentialId,
        owner: &OwnerId,
    ) -> Result<bool, DomainError> {
        let mut inner = self.write()?;

        let owned = inner
            .records
            .get(id)
            .is_some_and(|stored| stored.credential.is_owned_by(owner));
        if !owned {
            return Ok(false);
        }

        match inner.records.remove(id) {
            Some(stored) => {
                inner.tokens.remove(stored.credential.token());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Credential>, DomainError> {
        let inner = self.read()?;

        Ok(inner
            .tokens
            .get(token)
            .and_then(|id| inner.records.get(id))
            .map(|stored| stored.credential.clone()))
    }
}
