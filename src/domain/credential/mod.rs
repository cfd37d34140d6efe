//! Credential domain
//!
//! Opaque API keys owned by a human identity and presented by machine callers.

mod entity;
pub mod ownership;
mod request;
mod store;
mod validation;

pub use entity::{Credential, CredentialChanges, CredentialId, NewCredential};
pub use request::{CreateCredentialRequest, CredentialPatch};
pub use store::CredentialStore;
pub use validation::{
    CredentialValidationError, DEFAULT_KIND, normalize_display_name, normalize_kind,
    normalize_token, validate_usage,
};

#[cfg(test)]
pub use store::mock;
