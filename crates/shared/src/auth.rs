//! Authentication types for JWT and auth endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::types::UserId;

/// JWT claims for access tokens.
///
/// Remit tokens are user-scoped: the subject is the user id and nothing
/// else is encoded, since every user owns exactly one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: user_id,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username (unique).
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    /// Plaintext password.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1))]
    pub username: String,
    /// Plaintext password.
    #[validate(length(min = 1))]
    pub password: String,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: UserId,
    /// Username.
    pub username: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Authenticated user info.
    pub user: UserInfo,
    /// Access token.
    pub access_token: String,
    /// Token expiration in seconds.
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_length_rules() {
        let ok = RegisterRequest {
            username: "alice".to_string(),
            password: "long-enough-pass".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short_name = RegisterRequest {
            username: "al".to_string(),
            password: "long-enough-pass".to_string(),
        };
        assert!(short_name.validate().is_err());

        let short_password = RegisterRequest {
            username: "alice".to_string(),
            password: "short".to_string(),
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_claims_carry_user_id() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, Utc::now() + chrono::Duration::hours(1));
        assert_eq!(claims.user_id(), user_id);
        assert!(claims.exp > claims.iat);
    }
}
