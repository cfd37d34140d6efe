//! Credential entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::identity::OwnerId;

/// Credential identifier, assigned by the store at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialId(Uuid);

impl CredentialId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its textual form
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value.trim()).ok().map(Self)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for CredentialId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CredentialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A credential about to be inserted; the store assigns `id` and `created_at`
#[derive(Clone, PartialEq, Eq)]
pub struct NewCredential {
    pub token: String,
    pub owner_id: OwnerId,
    pub display_name: String,
    pub kind: String,
    pub usage_counter: u64,
}

impl std::fmt::Debug for NewCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewCredential")
            .field("token", &"[hidden]")
            .field("owner_id", &self.owner_id)
            .field("display_name", &self.display_name)
            .field("kind", &self.kind)
            .field("usage_counter", &self.usage_counter)
            .finish()
    }
}

/// Validated set of field changes applied by an update
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialChanges {
    pub display_name: Option<String>,
    pub token: Option<String>,
    pub kind: Option<String>,
    pub usage_counter: Option<u64>,
}

impl CredentialChanges {
    /// Whether no field would change
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.token.is_none()
            && self.kind.is_none()
            && self.usage_counter.is_none()
    }
}

impl std::fmt::Debug for CredentialChanges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialChanges")
            .field("display_name", &self.display_name)
            .field("token", &self.token.as_ref().map(|_| "[hidden]"))
            .field("kind", &self.kind)
            .field("usage_counter", &self.usage_counter)
            .finish()
    }
}

/// Credential entity
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Unique identifier
    id: CredentialId,
    /// Opaque bearer secret presented by machine callers
    token: String,
    /// Identity that created the credential
    owner_id: OwnerId,
    /// Human-readable label
    display_name: String,
    /// Free-form classification tag
    kind: String,
    /// Usage counter, never negative
    usage_counter: u64,
    /// Creation timestamp
    created_at: DateTime<Utc>,
}

impl Credential {
    /// Materialize a new credential with a store-assigned id and timestamp
    pub fn from_new(id: CredentialId, new: NewCredential, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            token: new.token,
            owner_id: new.owner_id,
            display_name: new.display_name,
            kind: new.kind,
            usage_counter: new.usage_counter,
            created_at,
        }
    }

    // Getters

    pub fn id(&self) -> &CredentialId {
        &self.id
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn usage_counter(&self) -> u64 {
        self.usage_counter
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Check whether the given owner holds this credential
    pub fn is_owned_by(&self, owner: &OwnerId) -> bool {
        &self.owner_id == owner
    }

    /// Apply validated changes; `id`, `owner_id` and `created_at` are never touched
    pub fn apply(&mut self, changes: &CredentialChanges) {
        if let Some(ref name) = changes.display_name {
            self.display_name = name.clone();
        }

        if let Some(ref token) = changes.token {
            self.token = token.clone();
        }

        if let Some(ref kind) = changes.kind {
            self.kind = kind.clone();
        }

        if let Some(usage) = changes.usage_counter {
            self.usage_counter = usage;
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("token", &"[hidden]")
            .field("owner_id", &self.owner_id)
            .field("display_name", &self.display_name)
            .field("kind", &self.kind)
            .field("usage_counter", &self.usage_counter)
            .field("created_at", &self.created_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_credential(owner: &str) -> NewCredential {
        NewCredential {
            token: "a".repeat(64),
            owner_id: OwnerId::new(owner).unwrap(),
            display_name: "Dev Key".to_string(),
            kind: "default".to_string(),
            usage_counter: 0,
        }
    }

    #[test]
    fn test_credential_id_parse() {
        let id = CredentialId::generate();
        let parsed = CredentialId::parse(&id.to_string()).unwrap();
        assert_eq!(parsed, id);

        assert!(CredentialId::parse("not-a-uuid").is_none());
        assert!(CredentialId::parse("").is_none());
    }

    #[test]
    fn test_from_new() {
        let id = CredentialId::generate();
        let now = Utc::now();
        let credential = Credential::from_new(id, new_credential("u1"), now);

        assert_eq!(credential.id(), &id);
        assert_eq!(credential.display_name(), "Dev Key");
        assert_eq!(credential.kind(), "default");
        assert_eq!(credential.usage_counter(), 0);
        assert_eq!(credential.created_at(), now);
        assert!(credential.is_owned_by(&OwnerId::new("u1").unwrap()));
        assert!(!credential.is_owned_by(&OwnerId::new("u2").unwrap()));
    }

    #[test]
    fn test_apply_changes() {
        let mut credential =
            Credential::from_new(CredentialId::generate(), new_credential("u1"), Utc::now());
        let original_id = *credential.id();
        let original_created = credential.created_at();

        credential.apply(&CredentialChanges {
            display_name: Some("Renamed".to_string()),
            token: None,
            kind: Some("prod".to_string()),
            usage_counter: Some(7),
        });

        assert_eq!(credential.display_name(), "Renamed");
        assert_eq!(credential.kind(), "prod");
        assert_eq!(credential.usage_counter(), 7);
        assert_eq!(credential.token(), "a".repeat(64));
        assert_eq!(credential.id(), &original_id);
        assert_eq!(credential.created_at(), original_created);
        assert_eq!(credential.owner_id().as_str(), "u1");
    }

    #[test]
    fn test_changes_is_empty() {
        assert!(CredentialChanges::default().is_empty());
        assert!(
            !CredentialChanges {
                usage_counter: Some(0),
                ..Default::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let credential =
            Credential::from_new(CredentialId::generate(), new_credential("u1"), Utc::now());
        let rendered = format!("{:?}", credential);

        assert!(rendered.contains("[hidden]"));
        assert!(!rendered.contains(&"a".repeat(64)));
    }
}
