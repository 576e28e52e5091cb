//! JWT issuance and verification.
//!
//! Remit issues a single short-lived access token per login. The signing
//! secret arrives through configuration at construction time; nothing in
//! here reads the process environment.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Claims;

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry_secs: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            access_token_expiry_secs: 3600,
        }
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Signing the token failed.
    #[error("failed to sign token: {0}")]
    Signing(String),

    /// The token is expired.
    #[error("token has expired")]
    Expired,

    /// The token is malformed or carries a bad signature.
    #[error("invalid token: {0}")]
    Invalid(String),
}

/// Issues and verifies HS256 access tokens.
#[derive(Clone)]
pub struct JwtService {
    ttl_secs: u64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("ttl_secs", &self.ttl_secs)
            .field("keys", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service from explicit configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        Self {
            ttl_secs: config.access_token_expiry_secs,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
        }
    }

    /// Issues an access token for a user.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Signing` if encoding fails.
    pub fn issue_token(&self, user_id: Uuid) -> Result<String, JwtError> {
        #[allow(clippy::cast_possible_wrap)]
        let expires_at = Utc::now() + Duration::seconds(self.ttl_secs as i64);
        let claims = Claims::new(user_id, expires_at);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Signing(e.to_string()))
    }

    /// Verifies a token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` for an expired token and
    /// `JwtError::Invalid` for anything else that fails verification.
    pub fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })
    }

    /// Token lifetime in seconds, for `expires_in` fields.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn token_ttl_secs(&self) -> i64 {
        self.ttl_secs as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_secret(secret: &str) -> JwtService {
        JwtService::new(JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_secs: 900,
        })
    }

    #[test]
    fn test_issue_then_verify() {
        let service = service_with_secret("a-test-only-secret");
        let user_id = Uuid::new_v4();

        let token = service.issue_token(user_id).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(service.token_ttl_secs(), 900);
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let service = service_with_secret("a-test-only-secret");
        assert!(matches!(
            service.verify_token("definitely.not.jwt"),
            Err(JwtError::Invalid(_))
        ));
    }

    #[test]
    fn test_cross_secret_verification_fails() {
        let issuer = service_with_secret("secret-one");
        let verifier = service_with_secret("secret-two");

        let token = issuer.issue_token(Uuid::new_v4()).unwrap();
        assert!(verifier.verify_token(&token).is_err());
    }
}
