use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use pantry_shared::Requester;
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::error::AppError;
use crate::routes::AppState;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    exp: u64,
    iat: u64,
    sub: String,
}

pub fn generate_token(config: &JwtConfig, user_id: i64) -> anyhow::Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let lifetime = u64::try_from(config.expiration_days.max(1))? * 24 * 60 * 60;
    let claims = Claims {
        exp: now + lifetime,
        iat: now,
        sub: user_id.to_string(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Returns the user id the token was issued for.
pub fn validate_token(config: &JwtConfig, token: &str) -> anyhow::Result<i64> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;

    Ok(token_data.claims.sub.parse()?)
}

/// Token from `Authorization: Token <t>` or `Authorization: Bearer <t>`.
fn bearer(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if scheme.eq_ignore_ascii_case("token") || scheme.eq_ignore_ascii_case("bearer") {
        Some(token.trim())
    } else {
        None
    }
}

async fn authenticate(parts: &Parts, state: &AppState) -> Result<Option<Requester>, AppError> {
    let Some(token) = bearer(parts) else {
        return Ok(None);
    };

    let user_id = validate_token(&state.config.jwt, token).map_err(|e| {
        tracing::debug!("Invalid auth token: {e}");
        pantry_shared::Error::Unauthenticated
    })?;

    // Deleted users keep valid tokens until they expire.
    let Some(user) = state.user_query.find(user_id).await? else {
        return Err(pantry_shared::Error::Unauthenticated.into());
    };

    Ok(Some(Requester {
        id: user.id,
        is_superuser: user.is_superuser,
    }))
}

/// Authenticated caller, 401 otherwise.
pub struct AuthUser(pub Requester);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match authenticate(parts, state).await? {
            Some(requester) => Ok(AuthUser(requester)),
            None => Err(pantry_shared::Error::Unauthenticated.into()),
        }
    }
}

/// Caller who may be anonymous. A token that is sent but invalid is still
/// rejected.
pub struct MaybeUser(pub Option<Requester>);

impl MaybeUser {
    pub fn id(&self) -> Option<i64> {
        self.0.map(|requester| requester.id)
    }
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(authenticate(parts, state).await?))
    }
}
