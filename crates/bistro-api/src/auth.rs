//! # Authorization Guards
//!
//! Composable request checks in front of protected handlers.
//!
//! Authentication is an extractor: a guarded handler receives the decoded
//! `Claims` as an argument, so it structurally cannot run without a
//! verified token, and the admin/self checks take those claims as inputs
//! rather than reading anything off a shared request. The role check hits
//! the store fresh on every call — promotions take effect immediately,
//! without waiting for the token to be reissued.

use crate::handlers::{error_response, ErrorResponse};
use crate::state::AppState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, StatusCode},
    Json,
};
use bistro_core::{ApiError, ApiResult, Claims};

/// Decoded identity claims for an authenticated request
#[derive(Debug, Clone)]
pub struct AuthClaims(pub Claims);

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let Some(header) = parts.headers.get(header::AUTHORIZATION) else {
            return Err(error_response(ApiError::Unauthenticated));
        };

        // Anything that is not `Bearer <token>` fails verification below.
        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .unwrap_or_default();

        let claims = state
            .tokens
            .verify(token)
            .map_err(|err| error_response(ApiError::from(err)))?;

        Ok(AuthClaims(claims))
    }
}

/// Require the authenticated identity to hold the admin role.
///
/// The role is looked up by email in the store on every call, never taken
/// from the token. An absent identity fails closed.
pub async fn require_admin(state: &AppState, claims: &Claims) -> ApiResult<()> {
    let user = state.store.find_user(&claims.email).await?;
    match user {
        Some(user) if user.is_admin() => Ok(()),
        _ => Err(ApiError::Forbidden),
    }
}

/// Require the requested email to be the authenticated identity's own.
///
/// Fails with `Forbidden` on mismatch regardless of whether the requested
/// email exists.
pub fn require_self(claims: &Claims, email: &str) -> ApiResult<()> {
    if claims.email == email {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}
