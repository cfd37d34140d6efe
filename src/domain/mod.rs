//! Domain layer - credential lifecycle, identities and the summary capability

pub mod credential;
pub mod error;
pub mod identity;
pub mod summary;

pub use error::DomainError;
