//! Credential infrastructure
//!
//! Token generation, store implementations and the services built on them.

pub mod generator;
mod in_memory;
mod postgres;
mod service;
mod validation;

pub use generator::{KeyGenerator, token_fingerprint};
pub use in_memory::InMemoryCredentialStore;
pub use postgres::{PostgresConfig, PostgresCredentialStore};
pub use service::CredentialService;
pub use validation::{ValidationOutcome, ValidationService};
