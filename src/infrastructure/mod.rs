//! Infrastructure layer - Store, session and downstream client implementations

pub mod auth;
pub mod credential;
pub mod logging;
pub mod observability;
pub mod summarizer;
