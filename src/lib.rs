//! Keygate
//!
//! Issues, stores and validates opaque API keys:
//! - Owner-scoped key management behind a session token
//! - Owner-blind validation for machine callers holding only a key
//! - A README summarizer gated behind a valid key

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use config::{SessionSettings, StorageBackend, SummarizerConfig};
use infrastructure::{
    auth::{JwtSessionVerifier, SessionConfig},
    credential::{
        CredentialService, InMemoryCredentialStore, PostgresConfig, PostgresCredentialStore,
    },
    summarizer::{GitHubReadmeSource, OpenAiReadmeSummarizer, SummaryService},
};
use tracing::{info, warn};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let session_verifier = Arc::new(create_session_verifier(&config.session));

    let state = match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory credential store");
            let store = Arc::new(InMemoryCredentialStore::new());
            AppState::new(CredentialService::new(store), session_verifier)
        }
        StorageBackend::Postgres => {
            let url = config.storage.database_url.as_deref().ok_or_else(|| {
                anyhow::anyhow!("storage.database_url is required for the postgres backend")
            })?;

            let pg_config = PostgresConfig::new(url)
                .with_max_connections(config.storage.max_connections)
                .with_table_name(&config.storage.table_name);

            let store = PostgresCredentialStore::connect(&pg_config).await?;
            store.ensure_schema().await?;
            info!(table = %config.storage.table_name, "Using PostgreSQL credential store");

            AppState::new(CredentialService::new(Arc::new(store)), session_verifier)
        }
    };

    match create_summary_service(&config.summarizer)? {
        Some(summary_service) => Ok(state.with_summary_service(Arc::new(summary_service))),
        None => {
            info!("README summarizer disabled (no OpenAI API key configured)");
            Ok(state)
        }
    }
}

/// Build the session verifier from configuration
pub fn create_session_verifier(settings: &SessionSettings) -> JwtSessionVerifier {
    if settings.jwt_secret == SessionSettings::default().jwt_secret {
        warn!("Using the default session secret; set KEYGATE__SESSION__JWT_SECRET in production");
    }

    let mut session_config =
        SessionConfig::new(settings.jwt_secret.clone()).with_leeway(settings.leeway_secs);
    if let Some(audience) = &settings.audience {
        session_config = session_config.with_audience(audience.clone());
    }

    JwtSessionVerifier::new(session_config)
}

fn create_summary_service(config: &SummarizerConfig) -> anyhow::Result<Option<SummaryService>> {
    let Some(api_key) = config.openai_api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
        return Ok(None);
    };

    let timeout = Duration::from_secs(config.timeout_secs);
    let source = GitHubReadmeSource::new(&config.github_api_url, timeout)?;
    let summarizer =
        OpenAiReadmeSummarizer::new(api_key, &config.openai_base_url, &config.model, timeout)?;

    info!(model = %config.model, "README summarizer enabled");

    Ok(Some(SummaryService::new(
        Arc::new(source),
        Arc::new(summarizer),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_state_uses_memory_without_summarizer() {
        let state = create_app_state().await.unwrap();
        assert!(state.summary_service.is_none());
    }

    #[tokio::test]
    async fn test_postgres_backend_requires_url() {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Postgres;

        let Err(err) = create_app_state_with_config(&config).await else {
            panic!("postgres backend without a url should fail");
        };
        assert!(err.to_string().contains("database_url"));
    }

    #[tokio::test]
    async fn test_summarizer_enabled_with_api_key() {
        let mut config = AppConfig::default();
        config.summarizer.openai_api_key = Some("sk-test".to_string());

        let state = create_app_state_with_config(&config).await.unwrap();
        assert!(state.summary_service.is_some());
    }

    #[test]
    fn test_session_verifier_round_trip() {
        use crate::domain::identity::OwnerId;
        use crate::infrastructure::auth::SessionVerifier;

        let verifier = create_session_verifier(&SessionSettings::default());
        let owner = OwnerId::new("u1").unwrap();
        let token = verifier.issue(&owner, 1).unwrap();

        let identity = verifier.verify(&token).unwrap();
        assert_eq!(identity.owner_id(), &owner);
    }
}
