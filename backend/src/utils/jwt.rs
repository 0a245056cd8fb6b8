//! Signed, expiring token issuance and verification.
//!
//! Access and refresh tokens are signed with independent symmetric secrets.
//! Validity is purely a function of signature and expiry; there is no
//! revocation list for access tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;

pub const PURPOSE_PASSWORD_RESET: &str = "password_reset";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,
    #[error("Could not validate credentials")]
    Invalid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Numeric user id.
    pub sub: i64,
    pub email: String,
    /// Set on single-purpose tokens such as password resets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

impl Claims {
    pub fn new(user_id: i64, email: String, purpose: Option<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email,
            purpose,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}

fn issue_token(claims: &Claims, secret: &str) -> anyhow::Result<String> {
    let token = encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;
    Ok(token)
}

fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &validation)
        .map(|data| data.claims)
        .map_err(|err| match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })
}

pub fn create_access_token(user_id: i64, email: &str, config: &Config) -> anyhow::Result<String> {
    let claims = Claims::new(
        user_id,
        email.to_string(),
        None,
        Duration::minutes(config.access_token_expire_minutes),
    );
    issue_token(&claims, &config.secret_key_access)
}

pub fn create_refresh_token(user_id: i64, email: &str, config: &Config) -> anyhow::Result<String> {
    let claims = Claims::new(
        user_id,
        email.to_string(),
        None,
        Duration::days(config.refresh_token_expire_days),
    );
    issue_token(&claims, &config.secret_key_refresh)
}

/// Password-reset tokens reuse the access signer with a shorter validity
/// window and a dedicated purpose claim.
pub fn create_password_reset_token(
    user_id: i64,
    email: &str,
    config: &Config,
) -> anyhow::Result<String> {
    let claims = Claims::new(
        user_id,
        email.to_string(),
        Some(PURPOSE_PASSWORD_RESET.to_string()),
        Duration::hours(config.reset_token_expire_hours),
    );
    issue_token(&claims, &config.secret_key_access)
}

pub fn verify_access_token(token: &str, config: &Config) -> Result<Claims, TokenError> {
    verify_token(token, &config.secret_key_access)
}

pub fn verify_refresh_token(token: &str, config: &Config) -> Result<Claims, TokenError> {
    verify_token(token, &config.secret_key_refresh)
}
