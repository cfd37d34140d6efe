//! API request and response types

pub mod credential;
pub mod error;
pub mod json;

pub use credential::{CredentialListResponse, CredentialResponse};
pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::Json;
