//! Session token verification
//!
//! Human callers present an HS256 JWT issued by the session collaborator.
//! The `sub` claim names the owner; `exp` is always enforced.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::DomainError;
use crate::domain::identity::{Identity, OwnerId};

/// Upper bound on issued session lifetime (one year)
pub const MAX_EXPIRATION_HOURS: u64 = 24 * 365;

/// Session JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (owner ID)
    pub sub: String,
    /// Audience
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl SessionClaims {
    /// Create claims for an owner valid for the given number of hours
    pub fn new(owner: &OwnerId, expiration_hours: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours.min(MAX_EXPIRATION_HOURS) as i64);

        Self {
            sub: owner.as_str().to_string(),
            aud: None,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }
}

/// Configuration for session verification
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Shared HMAC secret
    pub secret: String,
    /// Required audience, if any
    pub audience: Option<String>,
    /// Clock skew tolerance in seconds
    pub leeway_secs: u64,
}

impl SessionConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            audience: None,
            leeway_secs: 0,
        }
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_leeway(mut self, secs: u64) -> Self {
        self.leeway_secs = secs;
        self
    }
}

/// Resolves a presented session token into an [`Identity`]
pub trait SessionVerifier: Send + Sync + Debug {
    /// Verify a session token
    fn verify(&self, token: &str) -> Result<Identity, DomainError>;
}

/// HS256 session verifier
#[derive(Clone)]
pub struct JwtSessionVerifier {
    config: SessionConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtSessionVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionVerifier")
            .field("audience", &self.config.audience)
            .field("leeway_secs", &self.config.leeway_secs)
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl JwtSessionVerifier {
    pub fn new(config: SessionConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a session token for an owner
    ///
    /// Used by the CLI to mint tokens for local testing.
    pub fn issue(&self, owner: &OwnerId, expiration_hours: u64) -> Result<String, DomainError> {
        let mut claims = SessionClaims::new(owner, expiration_hours);
        claims.aud = self.config.audience.clone();

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign session token: {}", e)))
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.config.leeway_secs;

        match self.config.audience {
            Some(ref audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        validation
    }
}

impl SessionVerifier for JwtSessionVerifier {
    fn verify(&self, token: &str) -> Result<Identity, DomainError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation())
            .map_err(|e| DomainError::validation(format!("Invalid session token: {}", e)))?;

        let owner = OwnerId::new(data.claims.sub)
            .map_err(|_| DomainError::validation("Invalid session token: missing subject"))?;

        Ok(Identity::new(owner))
    }
}
