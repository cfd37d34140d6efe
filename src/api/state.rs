//! Application state for shared services

use std::sync::Arc;

use crate::domain::DomainError;
use crate::domain::credential::{
    CreateCredentialRequest, Credential, CredentialId, CredentialPatch, CredentialStore,
};
use crate::domain::identity::Identity;
use crate::domain::summary::ReadmeSummary;
use crate::infrastructure::auth::SessionVerifier;
use crate::infrastructure::credential::{CredentialService, ValidationOutcome, ValidationService};
use crate::infrastructure::summarizer::SummaryService;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub credential_service: Arc<dyn CredentialServiceTrait>,
    pub validation_service: Arc<dyn ValidationServiceTrait>,
    pub session_verifier: Arc<dyn SessionVerifier>,
    /// Absent when no summarizer backend is configured
    pub summary_service: Option<Arc<dyn SummaryServiceTrait>>,
}

/// Owner-scoped credential operations
#[async_trait::async_trait]
pub trait CredentialServiceTrait: Send + Sync {
    async fn list(&self, identity: &Identity) -> Result<Vec<Credential>, DomainError>;
    async fn create(
        &self,
        identity: &Identity,
        request: CreateCredentialRequest,
    ) -> Result<Credential, DomainError>;
    async fn get(&self, identity: &Identity, id: &CredentialId)
    -> Result<Credential, DomainError>;
    async fn update(
        &self,
        identity: &Identity,
        id: &CredentialId,
        patch: CredentialPatch,
    ) -> Result<Credential, DomainError>;
    async fn delete(&self, identity: &Identity, id: &CredentialId) -> Result<(), DomainError>;
}

/// Owner-blind bearer validation
#[async_trait::async_trait]
pub trait ValidationServiceTrait: Send + Sync {
    async fn validate(&self, token: &str) -> Result<ValidationOutcome, DomainError>;
    async fn health_check(&self) -> Result<(), DomainError>;
}

/// README summarization behind a valid key
#[async_trait::async_trait]
pub trait SummaryServiceTrait: Send + Sync {
    async fn summarize_repository(&self, repo_url: &str) -> Result<ReadmeSummary, DomainError>;
}

// Implement traits for the actual services

#[async_trait::async_trait]
impl<S: CredentialStore + 'static> CredentialServiceTrait for CredentialService<S> {
    async fn list(&self, identity: &Identity) -> Result<Vec<Credential>, DomainError> {
        CredentialService::list(self, identity).await
    }

    async fn create(
        &self,
        identity: &Identity,
        request: CreateCredentialRequest,
    ) -> Result<Credential, DomainError> {
        CredentialService::create(self, identity, request).await
    }

    async fn get(
        &self,
        identity: &Identity,
        id: &CredentialId,
    ) -> Result<Credential, DomainError> {
        CredentialService::get(self, identity, id).await
    }

    async fn update(
        &self,
        identity: &Identity,
        id: &CredentialId,
        patch: CredentialPatch,
    ) -> Result<Credential, DomainError> {
        CredentialService::update(self, identity, id, patch).await
    }

    async fn delete(&self, identity: &Identity, id: &CredentialId) -> Result<(), DomainError> {
        CredentialService::delete(self, identity, id).await
    }
}

#[async_trait::async_trait]
impl<S: CredentialStore + 'static> ValidationServiceTrait for ValidationService<S> {
    async fn validate(&self, token: &str) -> Result<ValidationOutcome, DomainError> {
        ValidationService::validate(self, token).await
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        ValidationService::health_check(self).await
    }
}

#[async_trait::async_trait]
impl SummaryServiceTrait for SummaryService {
    async fn summarize_repository(&self, repo_url: &str) -> Result<ReadmeSummary, DomainError> {
        SummaryService::summarize_repository(self, repo_url).await
    }
}

impl AppState {
    /// Build state from a credential service sharing one store with validation
    pub fn new<S: CredentialStore + 'static>(
        credential_service: CredentialService<S>,
        session_verifier: Arc<dyn SessionVerifier>,
    ) -> Self {
        let validation_service = credential_service.validator();

        Self {
            credential_service: Arc::new(credential_service),
            validation_service: Arc::new(validation_service),
            session_verifier,
            summary_service: None,
        }
    }

    pub fn with_summary_service(mut self, summary_service: Arc<dyn SummaryServiceTrait>) -> Self {
        self.summary_service = Some(summary_service);
        self
    }
}
