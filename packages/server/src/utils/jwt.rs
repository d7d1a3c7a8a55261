use anyhow::{Result, anyhow};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Session token claims issued by the identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Login or display name.
    pub sub: String,
    pub uid: i32,
    pub name: Option<String>,
    /// Avatar URL.
    pub image: Option<String>,
    /// Expiry as a Unix timestamp.
    pub exp: usize,
}

/// Sign a session token. Used by the identity provider side and by tests.
pub fn sign(
    user_id: i32,
    name: Option<&str>,
    image: Option<&str>,
    secret: &str,
    ttl: Duration,
) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(ttl)
        .ok_or_else(|| anyhow!("token expiry out of range"))?
        .timestamp();

    let claims = Claims {
        sub: name.unwrap_or_default().to_owned(),
        uid: user_id,
        name: name.map(str::to_owned),
        image: image.map(str::to_owned),
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify and decode a session token.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
