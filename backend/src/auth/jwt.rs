//! JWT token generation and validation
//!
//! Tokens bind a user id to an expiry instant and are signed with a single
//! HS256 secret supplied at startup. There is one verification key and no
//! rotation: changing the secret invalidates every outstanding token.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Why a token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token signature or signing method is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    }
}

/// Pre-computed JWT keys for efficient token operations
/// These are expensive to create, so we cache them in AppState
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from secret
    /// This should be called once at startup
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// Issues and validates identity tokens
///
/// Cloning is cheap: keys are behind `Arc`.
#[derive(Clone)]
pub struct TokenService {
    keys: JwtKeys,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenService {
    /// Create a token service from the signing secret and token lifetime
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            keys: JwtKeys::new(secret),
            validation,
            ttl_secs,
        }
    }

    /// Issue a token for a user, valid for the configured TTL from now
    #[inline]
    pub fn issue(&self, user_id: i64) -> Result<String> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if it had been issued at `issued_at`
    pub fn issue_at(&self, user_id: i64, issued_at: DateTime<Utc>) -> Result<String> {
        let exp = issued_at + Duration::seconds(self.ttl_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: issued_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, self.keys.encoding())
            .map_err(|e| anyhow::anyhow!("Failed to issue token: {}", e))
    }

    /// Validate a token and return the user id it was issued for
    pub fn validate(&self, token: &str) -> Result<i64, TokenError> {
        let token_data = decode::<Claims>(token, self.keys.decoding(), &self.validation)?;

        token_data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenError::Malformed)
    }

    /// Token lifetime in seconds
    #[inline]
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: i64 = 12 * 60 * 60;

    fn create_test_service() -> TokenService {
        TokenService::new("test-secret", TTL)
    }

    #[test]
    fn test_issue_and_validate() {
        let service = create_test_service();

        let token = service.issue(42).unwrap();
        assert_eq!(service.validate(&token), Ok(42));
    }

    #[test]
    fn test_token_valid_just_before_expiry() {
        let service = create_test_service();
        let issued_at = Utc::now() - Duration::seconds(TTL - 60);

        let token = service.issue_at(7, issued_at).unwrap();
        assert_eq!(service.validate(&token), Ok(7));
    }

    #[test]
    fn test_token_expires_after_ttl() {
        let service = create_test_service();
        let issued_at = Utc::now() - Duration::seconds(TTL + 1);

        let token = service.issue_at(7, issued_at).unwrap();
        assert_eq!(service.validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let service = create_test_service();
        let other = TokenService::new("another-secret", TTL);

        let token = other.issue(1).unwrap();
        assert_eq!(service.validate(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_other_signing_method_is_invalid_signature() {
        let service = create_test_service();
        let claims = Claims {
            sub: "1".to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            iat: Utc::now().timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert_eq!(service.validate(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let service = create_test_service();

        assert_eq!(service.validate(""), Err(TokenError::Malformed));
        assert_eq!(service.validate("invalid.token.here"), Err(TokenError::Malformed));
        assert_eq!(service.validate("not-a-jwt"), Err(TokenError::Malformed));
    }

    #[test]
    fn test_non_numeric_subject_is_malformed() {
        let service = create_test_service();
        let claims = Claims {
            sub: "alice".to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            iat: Utc::now().timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            service.keys.encoding(),
        )
        .unwrap();

        assert_eq!(service.validate(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn test_service_is_clone_cheap() {
        let service = create_test_service();
        let cloned = service.clone();

        let token = service.issue(3).unwrap();
        assert_eq!(cloned.validate(&token), Ok(3));
        assert_eq!(cloned.ttl_secs(), TTL);
    }
}
