//! Caller identity as seen by this service.
//!
//! Sessions are issued by an external identity provider. This module only turns the
//! credentials on an incoming request into an [`Identity`]; it never creates them.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use serde::Serialize;

use crate::utils::jwt;

/// The resolved caller: the user id plus the profile fields shown next to authored content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct Identity {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    #[schema(example = "https://avatars.example.com/ada.png")]
    pub image: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("malformed authorization header")]
    Malformed,
    #[error("invalid session token: {0}")]
    Invalid(String),
}

/// Resolves request credentials into a caller identity.
///
/// `Ok(None)` means the request carried no credentials at all.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Result<Option<Identity>, IdentityError>;
}

/// Accepts `Authorization: Bearer <token>` headers holding HS256 tokens signed with a
/// secret shared with the identity provider.
pub struct JwtIdentityResolver {
    secret: String,
}

impl JwtIdentityResolver {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl IdentityResolver for JwtIdentityResolver {
    fn resolve(&self, headers: &HeaderMap) -> Result<Option<Identity>, IdentityError> {
        let Some(value) = headers.get(AUTHORIZATION) else {
            return Ok(None);
        };

        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(IdentityError::Malformed)?;

        let claims =
            jwt::verify(token, &self.secret).map_err(|e| IdentityError::Invalid(e.to_string()))?;

        Ok(Some(Identity {
            id: claims.uid,
            name: claims.name,
            image: claims.image,
        }))
    }
}
