//! # Authentication and Identity
//!
//! This module provides bearer token issuance and verification for the
//! Cantine API, plus the [`CurrentUser`] extractor that resolves the
//! authenticated identity for protected endpoints. Identity is always
//! passed explicitly into handlers; nothing reads it from shared state.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;
use crate::error::{ApiError, unauthorized};
use crate::models::utilisateur;

/// Claims carried by an issued bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Utilisateur id the token is bound to
    pub sub: i32,
    pub email: String,
    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,
}

/// Errors that can occur while issuing or verifying tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT secret is not configured")]
    MissingSecret,
    #[error("failed to issue token: {0}")]
    Issue(#[source] jsonwebtoken::errors::Error),
    #[error("invalid token: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
    #[error("token expiration overflowed")]
    ExpirationOverflow,
}

/// Issue a bearer token bound to the given utilisateur.
pub fn issue_token(config: &AppConfig, user: &utilisateur::Model) -> Result<String, AuthError> {
    let secret = config.jwt_secret.as_ref().ok_or(AuthError::MissingSecret)?;

    let expiration = Utc::now()
        .checked_add_signed(Duration::seconds(config.jwt_ttl_seconds as i64))
        .ok_or(AuthError::ExpirationOverflow)?
        .timestamp();

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(AuthError::Issue)
}

/// Verify a bearer token and return its claims.
pub fn verify_token(config: &AppConfig, token: &str) -> Result<Claims, AuthError> {
    let secret = config.jwt_secret.as_ref().ok_or(AuthError::MissingSecret)?;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(AuthError::InvalidToken)
}

/// Authenticated identity extracted from the `Authorization` header.
///
/// Carries the verified claims only; handlers resolve the utilisateur row
/// themselves and answer 401 when the identity no longer exists.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Claims);

impl<S> FromRequestParts<S> for CurrentUser
where
    Arc<AppConfig>: FromRef<S>,
    S: Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Arc::<AppConfig>::from_ref(state);
        let token = extract_bearer_token(&parts.headers)?;

        let claims = verify_token(&config, token).map_err(|err| {
            tracing::debug!(error = %err, "Bearer token rejected");
            unauthorized(Some("Invalid token"))
        })?;

        Ok(CurrentUser(claims))
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized(Some("Missing Authorization header")))
        .and_then(|value| {
            value
                .to_str()
                .map_err(|_| unauthorized(Some("Invalid Authorization header")))
        })
        .and_then(|header| {
            header
                .strip_prefix("Bearer ")
                .ok_or_else(|| unauthorized(Some("Authorization header must use Bearer scheme")))
        })
}
