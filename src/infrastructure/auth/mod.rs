//! Authentication infrastructure module
//!
//! Session token verification for the owner-scoped surface.

mod jwt;

pub use jwt::{
    JwtSessionVerifier, MAX_EXPIRATION_HOURS, SessionClaims, SessionConfig, SessionVerifier,
};
