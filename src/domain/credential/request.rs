//! Caller-supplied inputs for creating and patching credentials

use serde::Deserialize;

use super::entity::CredentialChanges;
use super::validation::{
    CredentialValidationError, normalize_display_name, normalize_kind, normalize_token,
    validate_usage,
};

/// Input for creating a credential
#[derive(Clone, Default, Deserialize)]
pub struct CreateCredentialRequest {
    /// Required, non-empty after trimming
    #[serde(default, alias = "name")]
    pub display_name: String,
    /// Explicit token override; bypasses the generator
    #[serde(default, alias = "key")]
    pub token: Option<String>,
    #[serde(default, alias = "type")]
    pub kind: Option<String>,
    #[serde(default, alias = "usage_counter")]
    pub usage: Option<i64>,
}

impl CreateCredentialRequest {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Default::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_usage(mut self, usage: i64) -> Self {
        self.usage = Some(usage);
        self
    }
}

impl std::fmt::Debug for CreateCredentialRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateCredentialRequest")
            .field("display_name", &self.display_name)
            .field("token", &self.token.as_ref().map(|_| "[hidden]"))
            .field("kind", &self.kind)
            .field("usage", &self.usage)
            .finish()
    }
}

/// Partial update of a credential
///
/// `id`, `owner_id` and `created_at` are accepted by the deserializer only so
/// that their presence can be rejected. A JSON `null` counts as absent.
#[derive(Clone, Default, Deserialize)]
pub struct CredentialPatch {
    #[serde(default, alias = "name")]
    pub display_name: Option<String>,
    #[serde(default, alias = "key")]
    pub token: Option<String>,
    #[serde(default, alias = "type")]
    pub kind: Option<String>,
    #[serde(default, alias = "usage")]
    pub usage_counter: Option<i64>,

    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default, alias = "user_id")]
    pub owner_id: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<serde_json::Value>,
}

impl CredentialPatch {
    /// Validate the patch into a set of changes
    ///
    /// Immutable fields are checked first so a patch mixing valid and
    /// forbidden fields is rejected as a whole.
    pub fn into_changes(self) -> Result<CredentialChanges, CredentialValidationError> {
        if self.id.is_some() {
            return Err(CredentialValidationError::ImmutableField("id"));
        }
        if self.owner_id.is_some() {
            return Err(CredentialValidationError::ImmutableField("owner_id"));
        }
        if self.created_at.is_some() {
            return Err(CredentialValidationError::ImmutableField("created_at"));
        }

        Ok(CredentialChanges {
            display_name: self
                .display_name
                .as_deref()
                .map(normalize_display_name)
                .transpose()?,
            token: self.token.as_deref().map(normalize_token).transpose()?,
            kind: self.kind.as_deref().map(normalize_kind).transpose()?,
            usage_counter: self.usage_counter.map(validate_usage).transpose()?,
        })
    }
}

impl std::fmt::Debug for CredentialPatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPatch")
            .field("display_name", &self.display_name)
            .field("token", &self.token.as_ref().map(|_| "[hidden]"))
            .field("kind", &self.kind)
            .field("usage_counter", &self.usage_counter)
            .finish_non_exhaustive()
    }
}
