//! PostgreSQL credential store

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use crate::domain::DomainError;
use crate::domain::credential::{
    Credential, CredentialChanges, CredentialId, CredentialStore, NewCredential,
};
use crate::domain::identity::OwnerId;

static TABLE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Longest table name whose `<table>_owner_idx` index still fits in 63 bytes
const MAX_TABLE_NAME_LEN: usize = 53;

/// Columns the store reads and writes
const REQUIRED_COLUMNS: [&str; 8] = [
    "id",
    "seq",
    "token",
    "owner_id",
    "name",
    "kind",
    "usage_counter",
    "created_at",
];

/// Check that a table name is a plain SQL identifier
///
/// The name is interpolated into every query, so anything else is refused.
pub fn validate_table_name(name: &str) -> Result<(), DomainError> {
    if name.len() > MAX_TABLE_NAME_LEN || !TABLE_NAME.is_match(name) {
        return Err(DomainError::configuration(format!(
            "Invalid table name '{}': expected [A-Za-z_][A-Za-z0-9_]* of at most {} characters",
            name, MAX_TABLE_NAME_LEN
        )));
    }

    Ok(())
}

/// Required columns absent from an existing table
fn missing_columns(present: &[String]) -> Vec<&'static str> {
    REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|required| !present.iter().any(|column| column == required))
        .collect()
}

/// PostgreSQL connection settings
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Table holding credential records
    pub table_name: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/keygate".to_string(),
            max_connections: 10,
            connect_timeout_secs: 30,
            table_name: "api_keys".to_string(),
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_table_name(&self.table_name)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    id: Uuid,
    token: String,
    owner_id: String,
    name: String,
    kind: String,
    usage_counter: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<CredentialRow> for Credential {
    type Error = DomainError;

    fn try_from(row: CredentialRow) -> Result<Self, Self::Error> {
        let owner_id = OwnerId::new(row.owner_id)
            .map_err(|e| DomainError::storage(format!("Corrupt credential row: {}", e)))?;
        let usage_counter = u64::try_from(row.usage_counter).map_err(|_| {
            DomainError::storage(format!(
                "Corrupt credential row: negative usage {}",
                row.usage_counter
            ))
        })?;

        Ok(Credential::from_new(
            CredentialId::from(row.id),
            NewCredential {
                token: row.token,
                owner_id,
                display_name: row.name,
                kind: row.kind,
                usage_counter,
            },
            row.created_at,
        ))
    }
}

fn map_write_error(context: &str, e: sqlx::Error) -> DomainError {
    let unique_violation = e
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());

    if unique_violation {
        DomainError::conflict("An API key with this token already exists")
    } else {
        DomainError::storage(format!("{}: {}", context, e))
    }
}

fn to_db_usage(usage: u64) -> Result<i64, DomainError> {
    i64::try_from(usage)
        .map_err(|_| DomainError::validation(format!("Usage {} is out of range", usage)))
}

/// Credential store backed by a PostgreSQL table
///
/// The `token` column carries a UNIQUE constraint; uniqueness violations are
/// reported as conflicts.
pub struct PostgresCredentialStore {
    pool: PgPool,
    table_name: String,
}

impl Debug for PostgresCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresCredentialStore")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool, table_name: impl Into<String>) -> Result<Self, DomainError> {
        let table_name = table_name.into();
        validate_table_name(&table_name)?;

        Ok(Self { pool, table_name })
    }

    /// Connect with a fresh pool
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        Self::new(pool, config.table_name.clone())
    }

    /// Create the credential table if it does not exist
    ///
    /// An existing table with a different layout is a configuration error.
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        let table = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id UUID PRIMARY KEY,
                seq BIGSERIAL NOT NULL,
                token TEXT NOT NULL UNIQUE,
                owner_id TEXT NOT NULL,
                name TEXT NOT NULL,
                kind TEXT NOT NULL DEFAULT 'default',
                usage_counter BIGINT NOT NULL DEFAULT 0 CHECK (usage_counter >= 0),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            table = self.table_name
        );
        let index = format!(
            "CREATE INDEX IF NOT EXISTS {table}_owner_idx ON {table} (owner_id, created_at DESC)",
            table = self.table_name
        );

        for statement in [table, index] {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to create schema: {}", e)))?;
        }

        self.check_columns().await
    }

    async fn check_columns(&self) -> Result<(), DomainError> {
        // Unquoted identifiers are folded to lower case
        let present: Vec<String> = sqlx::query_scalar(
            "SELECT column_name::TEXT FROM information_schema.columns \
             WHERE table_schema = current_schema() AND table_name = $1",
        )
        .bind(self.table_name.to_lowercase())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to inspect schema: {}", e)))?;

        let missing = missing_columns(&present);
        if !missing.is_empty() {
            return Err(DomainError::configuration(format!(
                "Table '{}' exists with an incompatible layout; missing columns: {}",
                self.table_name,
                missing.join(", ")
            )));
        }

        Ok(())
    }

    fn columns() -> &'static str {
        "id, token, owner_id, name, kind, usage_counter, created_at"
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn insert(&self, credential: NewCredential) -> Result<Credential, DomainError> {
        let query = format!(
            "INSERT INTO {} (id, token, owner_id, name, kind, usage_counter) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            self.table_name,
            Self::columns()
        );

        let row: CredentialRow = sqlx::query_as(&query)
            .bind(*CredentialId::generate().as_uuid())
            .bind(&credential.token)
            .bind(credential.owner_id.as_str())
            .bind(&credential.display_name)
            .bind(&credential.kind)
            .bind(to_db_usage(credential.usage_counter)?)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error("Failed to insert API key", e))?;

        row.try_into()
    }

    async fn get_by_id(
        &self,
        id: &CredentialId,
        owner: &OwnerId,
    ) -> Result<Option<Credential>, DomainError> {
        let query = format!(
            "SELECT {} FROM {} WHERE id = $1 AND owner_id = $2",
            Self::columns(),
            self.table_name
        );

        let row: Option<CredentialRow> = sqlx::query_as(&query)
            .bind(*id.as_uuid())
            .bind(owner.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get API key: {}", e)))?;

        row.map(Credential::try_from).transpose()
    }

    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Credential>, DomainError> {
        let query = format!(
            "SELECT {} FROM {} WHERE owner_id = $1 ORDER BY created_at DESC, seq DESC",
            Self::columns(),
            self.table_name
        );

        let rows: Vec<CredentialRow> = sqlx::query_as(&query)
            .bind(owner.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list API keys: {}", e)))?;

        rows.into_iter().map(Credential::try_from).collect()
    }

    async fn update_by_id(
        &self,
        id: &CredentialId,
        owner: &OwnerId,
        changes: &CredentialChanges,
    ) -> Result<Option<Credential>, DomainError> {
        let query = format!(
            "UPDATE {} SET \
                name = COALESCE($3, name), \
                token = COALESCE($4, token), \
                kind = COALESCE($5, kind), \
                usage_counter = COALESCE($6, usage_counter) \
             WHERE id = $1 AND owner_id = $2 RETURNING {}",
            self.table_name,
            Self::columns()
        );

        let usage = changes.usage_counter.map(to_db_usage).transpose()?;

        let row: Option<CredentialRow> = sqlx::query_as(&query)
            .bind(*id.as_uuid())
            .bind(owner.as_str())
            .bind(changes.display_name.as_deref())
            .bind(changes.token.as_deref())
            .bind(changes.kind.as_deref())
            .bind(usage)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error("Failed to update API key", e))?;

        row.map(Credential::try_from).transpose()
    }

    async fn delete_by_id(
        &self,
        id: &CredentialId,
        owner: &OwnerId,
    ) -> Result<bool, DomainError> {
        let query = format!(
            "DELETE FROM {} WHERE id = $1 AND owner_id = $2",
            self.table_name
        );

        let result = sqlx::query(&query)
            .bind(*id.as_uuid())
            .bind(owner.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete API key: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Credential>, DomainError> {
        let query = format!(
            "SELECT {} FROM {} WHERE token = $1",
            Self::columns(),
            self.table_name
        );

        let row: Option<CredentialRow> = sqlx::query_as(&query)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to look up API key: {}", e)))?;

        row.map(Credential::try_from).transpose()
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("PostgreSQL health check failed: {}", e)))?;

        Ok(())
    }
}
