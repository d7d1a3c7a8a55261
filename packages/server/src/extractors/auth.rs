use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;

use crate::error::AppError;
use crate::identity::Identity;
use crate::state::AppState;

/// Authenticated caller resolved from the request's session credentials.
///
/// Add this as a handler parameter to require authentication, or take
/// `Option<AuthUser>` where anonymous callers are allowed. Ownership checks
/// live in [`crate::guard`].
pub struct AuthUser(pub Identity);

impl AuthUser {
    pub fn user_id(&self) -> i32 {
        self.0.id
    }

    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match state.identity.resolve(&parts.headers) {
            Ok(Some(identity)) => Ok(AuthUser(identity)),
            Ok(None) => Err(AppError::TokenMissing),
            Err(e) => {
                tracing::debug!("Rejected credentials: {e}");
                Err(AppError::TokenInvalid)
            }
        }
    }
}

impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        match state.identity.resolve(&parts.headers) {
            Ok(identity) => Ok(identity.map(AuthUser)),
            Err(e) => {
                // Public endpoints treat unusable credentials as an anonymous caller.
                tracing::debug!("Ignoring credentials on public endpoint: {e}");
                Ok(None)
            }
        }
    }
}
