//! Resolved human identity
//!
//! The session collaborator authenticates a human and hands the core an
//! [`Identity`]. Every owner-scoped operation receives it explicitly.

use serde::{Deserialize, Serialize};

use super::credential::CredentialValidationError;

/// Identifier of the human identity that owns credentials
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);

impl OwnerId {
    /// Create a new OwnerId, rejecting blank values
    pub fn new(id: impl Into<String>) -> Result<Self, CredentialValidationError> {
        let id = id.into();

        if id.trim().is_empty() {
            return Err(CredentialValidationError::EmptyOwner);
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OwnerId {
    type Error = CredentialValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OwnerId> for String {
    fn from(id: OwnerId) -> Self {
        id.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An authenticated human caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    owner_id: OwnerId,
}

impl Identity {
    pub fn new(owner_id: OwnerId) -> Self {
        Self { owner_id }
    }

    pub fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_id_valid() {
        let id = OwnerId::new("user-1").unwrap();
        assert_eq!(id.as_str(), "user-1");
        assert_eq!(id.to_string(), "user-1");
    }

    #[test]
    fn test_owner_id_blank_rejected() {
        assert_eq!(OwnerId::new(""), Err(CredentialValidationError::EmptyOwner));
        assert_eq!(OwnerId::new("   "), Err(CredentialValidationError::EmptyOwner));
    }

    #[test]
    fn test_owner_id_deserialize_rejects_blank() {
        let result: Result<OwnerId, _> = serde_json::from_str(r#""""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_identity_owner() {
        let identity = Identity::new(OwnerId::new("u1").unwrap());
        assert_eq!(identity.owner_id().as_str(), "u1");
    }
}
