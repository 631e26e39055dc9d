use axum::{extract::State, http::StatusCode};
use pantry_user::LoginInput;
use serde::Serialize;

use super::AppState;
use crate::auth::{AuthUser, generate_token};
use crate::error::Result;
use crate::extract::Json;

#[derive(Debug, Serialize)]
pub struct TokenJson {
    pub auth_token: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<TokenJson>> {
    let credentials = state.user_command.login(input).await?;
    let auth_token = generate_token(&state.config.jwt, credentials.id)?;

    tracing::info!(id = credentials.id, "User logged in");

    Ok(Json(TokenJson { auth_token }))
}

/// Tokens are stateless, logging out only confirms the token was valid.
pub async fn logout(AuthUser(requester): AuthUser) -> StatusCode {
    tracing::info!(id = requester.id, "User logged out");

    StatusCode::NO_CONTENT
}
