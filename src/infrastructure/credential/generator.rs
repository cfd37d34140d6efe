//! API key token generation
//!
//! Tokens are 32 bytes from the operating system's CSPRNG, hex encoded.

use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::domain::DomainError;

/// Number of random bytes per token (256 bits)
pub const TOKEN_BYTES: usize = 32;

/// Length of the hex-encoded token
pub const TOKEN_LENGTH: usize = TOKEN_BYTES * 2;

/// Generator for opaque API key tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyGenerator;

impl KeyGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a new token
    ///
    /// Fails if the entropy source is unavailable. The failure is not retried.
    pub fn generate(&self) -> Result<String, DomainError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.try_fill_bytes(&mut bytes).map_err(|e| {
            DomainError::internal(format!("Entropy source unavailable: {}", e))
        })?;

        Ok(hex::encode(bytes))
    }
}

/// Short, non-reversible fingerprint of a token, safe to log
pub fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    let mut fingerprint = hex::encode(digest);
    fingerprint.truncate(12);
    fingerprint
}
