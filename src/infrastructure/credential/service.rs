//! Credential service
//!
//! Owner-scoped lifecycle operations plus the owner-blind validation check.
//! Every CRUD call takes the caller's [`Identity`] explicitly.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::DomainError;
use crate::domain::credential::{
    CreateCredentialRequest, Credential, CredentialId, CredentialPatch, CredentialStore,
    DEFAULT_KIND, NewCredential, normalize_display_name, normalize_kind, normalize_token,
    ownership, validate_usage,
};
use crate::domain::identity::Identity;
use crate::infrastructure::observability::record_credential_operation;

use super::generator::{KeyGenerator, token_fingerprint};
use super::validation::ValidationService;

fn observe<T>(operation: &'static str, result: Result<T, DomainError>) -> Result<T, DomainError> {
    record_credential_operation(operation, result.is_ok());
    result
}

/// Credential lifecycle service
#[derive(Debug)]
pub struct CredentialService<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    generator: KeyGenerator,
    validator: ValidationService<S>,
}

impl<S: CredentialStore> CredentialService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            validator: ValidationService::new(Arc::clone(&store)),
            store,
            generator: KeyGenerator::new(),
        }
    }

    /// Create a credential owned by the caller
    ///
    /// A duplicate explicit token is a conflict; nothing is retried.
    pub async fn create(
        &self,
        identity: &Identity,
        request: CreateCredentialRequest,
    ) -> Result<Credential, DomainError> {
        observe("create", self.create_inner(identity, request).await)
    }

    async fn create_inner(
        &self,
        identity: &Identity,
        request: CreateCredentialRequest,
    ) -> Result<Credential, DomainError> {
        let display_name = normalize_display_name(&request.display_name)?;
        let kind = match request.kind.as_deref() {
            Some(kind) => normalize_kind(kind)?,
            None => DEFAULT_KIND.to_string(),
        };
        let usage_counter = request.usage.map(validate_usage).transpose()?.unwrap_or(0);

        let token = match request.token.as_deref() {
            Some(explicit) => {
                debug!("Using caller-supplied API key token");
                normalize_token(explicit)?
            }
            None => self.generator.generate()?,
        };
        let fingerprint = token_fingerprint(&token);

        let created = self
            .store
            .insert(NewCredential {
                token,
                owner_id: identity.owner_id().clone(),
                display_name,
                kind,
                usage_counter,
            })
            .await
            .inspect_err(|e| {
                if matches!(e, DomainError::Conflict { .. }) {
                    warn!(token_fingerprint = %fingerprint, "API key token already in use");
                }
            })?;

        info!(
            credential_id = %created.id(),
            owner_id = %created.owner_id(),
            token_fingerprint = %fingerprint,
            "API key created"
        );

        Ok(created)
    }

    /// List the caller's credentials, newest first
    pub async fn list(&self, identity: &Identity) -> Result<Vec<Credential>, DomainError> {
        let result = self
            .store
            .list_by_owner(identity.owner_id())
            .await
            .map(|records| ownership::retain_owned(identity, records));

        observe("list", result)
    }

    /// Get one of the caller's credentials
    pub async fn get(
        &self,
        identity: &Identity,
        id: &CredentialId,
    ) -> Result<Credential, DomainError> {
        let result = match self.store.get_by_id(id, identity.owner_id()).await {
            Ok(found) => ownership::require_owned(identity, found),
            Err(e) => Err(e),
        };

        observe("get", result)
    }

    /// Apply a partial update to one of the caller's credentials
    ///
    /// A patch with no fields returns the current record unchanged.
    pub async fn update(
        &self,
        identity: &Identity,
        id: &CredentialId,
        patch: CredentialPatch,
    ) -> Result<Credential, DomainError> {
        observe("update", self.update_inner(identity, id, patch).await)
    }

    async fn update_inner(
        &self,
        identity: &Identity,
        id: &CredentialId,
        patch: CredentialPatch,
    ) -> Result<Credential, DomainError> {
        let changes = patch.into_changes()?;

        if changes.is_empty() {
            let current = self.store.get_by_id(id, identity.owner_id()).await?;
            return ownership::require_owned(identity, current);
        }

        let updated = self
            .store
            .update_by_id(id, identity.owner_id(), &changes)
            .await?;
        let updated = ownership::require_owned(identity, updated)?;

        if changes.token.is_some() {
            info!(
                credential_id = %id,
                token_fingerprint = %token_fingerprint(updated.token()),
                "API key token replaced"
            );
        } else {
            info!(credential_id = %id, "API key updated");
        }

        Ok(updated)
    }

    /// Delete one of the caller's credentials
    ///
    /// An absent or foreign id is reported as not found.
    pub async fn delete(&self, identity: &Identity, id: &CredentialId) -> Result<(), DomainError> {
        let result = match self.store.delete_by_id(id, identity.owner_id()).await {
            Ok(true) => {
                info!(credential_id = %id, "API key deleted");
                Ok(())
            }
            Ok(false) => Err(ownership::not_found()),
            Err(e) => Err(e),
        };

        observe("delete", result)
    }

    /// Validation half of this service, sharing the same store
    pub fn validator(&self) -> ValidationService<S> {
        self.validator.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::credential::mock::FailingCredentialStore;
    use crate::domain::identity::OwnerId;
    use crate::infrastructure::credential::InMemoryCredentialStore;
    use crate::infrastructure::credential::generator::TOKEN_LENGTH;

    fn identity(owner: &str) -> Identity {
        Identity::new(OwnerId::new(owner).unwrap())
    }

    fn create_service() -> CredentialService<InMemoryCredentialStore> {
        CredentialService::new(Arc::new(InMemoryCredentialStore::new()))
    }

    fn usage_patch(usage: i64) -> CredentialPatch {
        CredentialPatch {
            usage_counter: Some(usage),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_generates_token() {
        let service = create_service();
        let created = service
            .create(&identity("u1"), CreateCredentialRequest::new("Dev Key"))
            .await
            .unwrap();

        assert_eq!(created.display_name(), "Dev Key");
        assert_eq!(created.kind(), DEFAULT_KIND);
        assert_eq!(created.usage_counter(), 0);
        assert_eq!(created.owner_id().as_str(), "u1");
        assert_eq!(created.token().len(), TOKEN_LENGTH);
        assert!(created.token().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_create_then_validate() {
        let service = create_service();
        let created = service
            .create(&identity("u1"), CreateCredentialRequest::new("Dev Key"))
            .await
            .unwrap();

        assert!(service.validator().validate(created.token()).await.unwrap().valid);

        let listed = service.list(&identity("u1")).await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let service = create_service();
        let owner = identity("u1");

        let created = service
            .create(&owner, CreateCredentialRequest::new("Dev Key"))
            .await
            .unwrap();
        assert!(service.validator().validate(created.token()).await.unwrap().valid);

        service.delete(&owner, created.id()).await.unwrap();
        assert!(!service.validator().validate(created.token()).await.unwrap().valid);

        let err = service.get(&owner, created.id()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_create_blank_name_rejected() {
        let service = create_service();
        let owner = identity("u1");

        let err = service
            .create(&owner, CreateCredentialRequest::new("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(service.list(&owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_explicit_token() {
        let service = create_service();
        let created = service
            .create(
                &identity("u1"),
                CreateCredentialRequest::new("Migrated").with_token("  legacy-token  "),
            )
            .await
            .unwrap();

        assert_eq!(created.token(), "legacy-token");
        assert!(service.validator().validate("legacy-token").await.unwrap().valid);
    }

    #[tokio::test]
    async fn test_create_blank_explicit_token_rejected() {
        let service = create_service();

        let err = service
            .create(&identity("u1"), CreateCredentialRequest::new("Key").with_token("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_duplicate_token_conflicts() {
        let service = create_service();
        let existing = service
            .create(&identity("u1"), CreateCredentialRequest::new("First").with_token("dup"))
            .await
            .unwrap();

        let err = service
            .create(&identity("u2"), CreateCredentialRequest::new("Second").with_token("dup"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));

        let unchanged = service.get(&identity("u1"), existing.id()).await.unwrap();
        assert_eq!(unchanged, existing);
        assert!(service.list(&identity("u2")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_kind_and_usage() {
        let service = create_service();
        let created = service
            .create(
                &identity("u1"),
                CreateCredentialRequest::new("Prod").with_kind(" prod ").with_usage(12),
            )
            .await
            .unwrap();

        assert_eq!(created.kind(), "prod");
        assert_eq!(created.usage_counter(), 12);

        let err = service
            .create(&identity("u1"), CreateCredentialRequest::new("Bad").with_usage(-1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_foreign_get_indistinguishable_from_missing() {
        let service = create_service();
        let created = service
            .create(&identity("a"), CreateCredentialRequest::new("A's key"))
            .await
            .unwrap();

        let foreign = service.get(&identity("b"), created.id()).await.unwrap_err();
        let missing = service
            .get(&identity("b"), &CredentialId::generate())
            .await
            .unwrap_err();

        assert!(matches!(foreign, DomainError::NotFound { .. }));
        assert!(matches!(missing, DomainError::NotFound { .. }));
        assert_eq!(foreign.to_string(), missing.to_string());
    }

    #[tokio::test]
    async fn test_list_is_stable_and_scoped() {
        let service = create_service();
        for name in ["one", "two", "three"] {
            service
                .create(&identity("u1"), CreateCredentialRequest::new(name))
                .await
                .unwrap();
        }
        service
            .create(&identity("u2"), CreateCredentialRequest::new("other"))
            .await
            .unwrap();

        let first = service.list(&identity("u1")).await.unwrap();
        let second = service.list(&identity("u1")).await.unwrap();

        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        assert_eq!(first[0].display_name(), "three");
        assert_eq!(first[2].display_name(), "one");
    }

    #[tokio::test]
    async fn test_list_empty() {
        let service = create_service();
        assert!(service.list(&identity("nobody")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_fields() {
        let service = create_service();
        let owner = identity("u1");
        let created = service
            .create(&owner, CreateCredentialRequest::new("Dev Key"))
            .await
            .unwrap();

        let patch = CredentialPatch {
            display_name: Some("Renamed".to_string()),
            kind: Some("prod".to_string()),
            usage_counter: Some(4),
            ..Default::default()
        };
        let updated = service.update(&owner, created.id(), patch).await.unwrap();

        assert_eq!(updated.display_name(), "Renamed");
        assert_eq!(updated.kind(), "prod");
        assert_eq!(updated.usage_counter(), 4);
        assert_eq!(updated.id(), created.id());
        assert_eq!(updated.owner_id(), created.owner_id());
        assert_eq!(updated.created_at(), created.created_at());
        assert_eq!(updated.token(), created.token());
    }

    #[tokio::test]
    async fn test_update_negative_usage_rejected() {
        let service = create_service();
        let owner = identity("u1");
        let created = service
            .create(&owner, CreateCredentialRequest::new("Dev Key").with_usage(2))
            .await
            .unwrap();

        let err = service
            .update(&owner, created.id(), usage_patch(-1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));

        let current = service.get(&owner, created.id()).await.unwrap();
        assert_eq!(current.usage_counter(), 2);
    }

    #[tokio::test]
    async fn test_update_immutable_field_rejected() {
        let service = create_service();
        let owner = identity("u1");
        let created = service
            .create(&owner, CreateCredentialRequest::new("Dev Key"))
            .await
            .unwrap();

        let patch = CredentialPatch {
            owner_id: Some(serde_json::json!("u2")),
            ..Default::default()
        };
        let err = service.update(&owner, created.id(), patch).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));

        let current = service.get(&owner, created.id()).await.unwrap();
        assert_eq!(current.owner_id().as_str(), "u1");
    }

    #[tokio::test]
    async fn test_update_foreign_is_not_found() {
        let service = create_service();
        let created = service
            .create(&identity("a"), CreateCredentialRequest::new("A's key"))
            .await
            .unwrap();

        let err = service
            .update(&identity("b"), created.id(), usage_patch(99))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let current = service.get(&identity("a"), created.id()).await.unwrap();
        assert_eq!(current.usage_counter(), 0);
    }

    #[tokio::test]
    async fn test_update_empty_patch_returns_current() {
        let service = create_service();
        let owner = identity("u1");
        let created = service
            .create(&owner, CreateCredentialRequest::new("Dev Key"))
            .await
            .unwrap();

        let same = service
            .update(&owner, created.id(), CredentialPatch::default())
            .await
            .unwrap();
        assert_eq!(same, created);

        let err = service
            .update(&identity("u2"), created.id(), CredentialPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_rotates_token() {
        let service = create_service();
        let owner = identity("u1");
        let created = service
            .create(&owner, CreateCredentialRequest::new("Dev Key"))
            .await
            .unwrap();

        let patch = CredentialPatch {
            token: Some("rotated".to_string()),
            ..Default::default()
        };
        let updated = service.update(&owner, created.id(), patch).await.unwrap();

        assert_eq!(updated.token(), "rotated");
        assert!(service.validator().validate("rotated").await.unwrap().valid);
        assert!(!service.validator().validate(created.token()).await.unwrap().valid);
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let service = create_service();
        let owner = identity("u1");
        let created = service
            .create(&owner, CreateCredentialRequest::new("Dev Key"))
            .await
            .unwrap();

        service.delete(&owner, created.id()).await.unwrap();
        let err = service.delete(&owner, created.id()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_foreign_is_not_found() {
        let service = create_service();
        let created = service
            .create(&identity("a"), CreateCredentialRequest::new("A's key"))
            .await
            .unwrap();

        let err = service.delete(&identity("b"), created.id()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(service.validator().validate(created.token()).await.unwrap().valid);
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_independent() {
        let service = Arc::new(create_service());
        let mut handles = Vec::new();

        for i in 0..16 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service
                    .create(&identity("u1"), CreateCredentialRequest::new(format!("key {}", i)))
                    .await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let listed = service.list(&identity("u1")).await.unwrap();
        assert_eq!(listed.len(), 16);

        let mut ids: Vec<_> = listed.iter().map(|c| c.id().to_string()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 16);
    }

    #[tokio::test]
    async fn test_concurrent_updates_last_write_wins() {
        let service = Arc::new(create_service());
        let created = service
            .create(&identity("u1"), CreateCredentialRequest::new("Dev Key"))
            .await
            .unwrap();
        let id = *created.id();

        let patches = [("alpha", 1), ("beta", 2)];
        let mut handles = Vec::new();

        for (name, usage) in patches {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                let patch = CredentialPatch {
                    display_name: Some(name.to_string()),
                    usage_counter: Some(usage),
                    ..Default::default()
                };
                service.update(&identity("u1"), &id, patch).await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let current = service.get(&identity("u1"), &id).await.unwrap();
        let observed = (current.display_name(), current.usage_counter());
        assert!(
            observed == ("alpha", 1) || observed == ("beta", 2),
            "fields from different updates were mixed: {:?}",
            observed
        );
        assert_eq!(current.token(), created.token());
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let service = CredentialService::new(Arc::new(FailingCredentialStore::new()));
        let owner = identity("u1");
        let id = CredentialId::generate();

        let results = [
            service
                .create(&owner, CreateCredentialRequest::new("k"))
                .await
                .map(|_| ()),
            service.list(&owner).await.map(|_| ()),
            service.get(&owner, &id).await.map(|_| ()),
            service.update(&owner, &id, usage_patch(1)).await.map(|_| ()),
            service.delete(&owner, &id).await,
            service.validator().validate("token").await.map(|_| ()),
        ];

        for result in results {
            assert!(matches!(result, Err(DomainError::Storage { .. })));
        }
    }
}
