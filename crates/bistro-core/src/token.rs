//! # Token Service
//!
//! Issues and verifies signed, time-limited identity tokens (JWT, HS256).
//!
//! The service is stateless: tokens are never persisted and any process
//! holding the same secret can verify one. The tradeoff is that a token
//! cannot be revoked before its natural expiry, one hour after issuance.

use crate::error::{ApiError, ApiResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token lifetime: one hour from issuance
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Verification failure kinds. These are the only two; ordinary business
/// conditions never surface here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Signature mismatch or malformed payload
    #[error("token is not valid")]
    Invalid,

    /// Signature checks out but the token is past its expiry
    #[error("token has expired")]
    Expired,
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => ApiError::InvalidToken,
            TokenError::Expired => ApiError::ExpiredToken,
        }
    }
}

/// Identity claims carried in a token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity email (the subject)
    pub email: String,

    /// Display name, if the identity supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Issued-at (unix timestamp)
    pub iat: i64,

    /// Expiry (unix timestamp)
    pub exp: i64,
}

/// Stateless token issuer/verifier backed by a process-wide secret
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a service from the shared signing secret
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; no clock-skew grace window.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign identity claims with an expiry one hour in the future.
    ///
    /// No input validation beyond the claims being a well-formed identity
    /// payload; issuing is a pure function of the inputs and the clock.
    /// A signing failure is a server-side fault, not a credential
    /// problem, so it surfaces as a 500-class error.
    pub fn issue(&self, email: impl Into<String>, name: Option<String>) -> ApiResult<String> {
        let now = Utc::now();
        let claims = Claims {
            email: email.into(),
            name,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(TOKEN_TTL_SECS)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::Serialization(format!("failed to sign token: {e}")))
    }

    /// Check signature integrity and expiry, returning the original claims.
    ///
    /// Expiry after a valid signature is `Expired`; every other failure is
    /// `Invalid`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret")
    }

    #[test]
    fn test_issue_verify_round_trip() {
        let tokens = service();
        let token = tokens.issue("amy@example.com", Some("Amy".into())).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.email, "amy@example.com");
        assert_eq!(claims.name.as_deref(), Some("Amy"));
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn test_expired_token_is_expired_not_invalid() {
        let tokens = service();
        let now = Utc::now().timestamp();
        let stale = Claims {
            email: "amy@example.com".into(),
            name: None,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &stale,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert_eq!(tokens.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = TokenService::new("other-secret")
            .issue("amy@example.com", None)
            .unwrap();

        assert_eq!(service().verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        assert_eq!(service().verify("not.a.token"), Err(TokenError::Invalid));
        assert_eq!(service().verify(""), Err(TokenError::Invalid));
    }
}
