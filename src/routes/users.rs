use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
};
use pantry_shared::Args;
use pantry_user::{RegisterInput, password::SetPasswordInput};
use serde::{Deserialize, Serialize};

use super::AppState;
use super::view::{Paginated, SubscriptionJson, UserJson, not_found, recipes_limit};
use crate::auth::{AuthUser, MaybeUser};
use crate::error::Result;
use crate::extract::{Json, Path, Query};

#[derive(Debug, Serialize)]
pub struct RegisteredJson {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<RegisteredJson>)> {
    let id = state.user_command.register(input).await?;
    let user = state
        .user_query
        .find(id)
        .await?
        .ok_or_else(|| not_found("user"))?;

    Ok((
        StatusCode::CREATED,
        Json(RegisteredJson {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }),
    ))
}

pub async fn list(
    State(state): State<AppState>,
    viewer: MaybeUser,
    OriginalUri(uri): OriginalUri,
    Query(args): Query<Args>,
) -> Result<Json<Paginated<UserJson>>> {
    let page = state.user_query.list(args).await?;

    let mut results = Vec::with_capacity(page.results.len());
    for user in page.results {
        results.push(UserJson::load(&state, user, viewer.id()).await?);
    }

    let page = pantry_shared::Page {
        count: page.count,
        results,
    };

    Ok(Json(Paginated::new(page, args, &uri)))
}

pub async fn detail(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(id): Path<i64>,
) -> Result<Json<UserJson>> {
    let user = state
        .user_query
        .find(id)
        .await?
        .ok_or_else(|| not_found("user"))?;

    Ok(Json(UserJson::load(&state, user, viewer.id()).await?))
}

pub async fn me(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
) -> Result<Json<UserJson>> {
    let user = state
        .user_query
        .find(requester.id)
        .await?
        .ok_or_else(|| not_found("user"))?;

    Ok(Json(UserJson::load(&state, user, Some(requester.id)).await?))
}

pub async fn set_password(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Json(input): Json<SetPasswordInput>,
) -> Result<StatusCode> {
    state.user_command.password.set(requester.id, input).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub recipes_limit: Option<String>,
}

impl SubscriptionParams {
    fn args(&self) -> Args {
        Args {
            page: self.page.unwrap_or(1),
            limit: self.limit,
        }
    }
}

pub async fn subscriptions(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<SubscriptionParams>,
) -> Result<Json<Paginated<SubscriptionJson>>> {
    let args = params.args();
    let limit = recipes_limit(params.recipes_limit.as_deref());
    let page = state.subscription_query.list(requester.id, args).await?;

    let mut results = Vec::with_capacity(page.results.len());
    for row in page.results {
        let user = UserJson {
            email: row.email,
            id: row.id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            is_subscribed: true,
        };
        results.push(SubscriptionJson::load(&state, user, row.recipes_count, limit).await?);
    }

    let page = pantry_shared::Page {
        count: page.count,
        results,
    };

    Ok(Json(Paginated::new(page, args, &uri)))
}

pub async fn subscribe(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(author_id): Path<i64>,
    Query(params): Query<SubscriptionParams>,
) -> Result<(StatusCode, Json<SubscriptionJson>)> {
    state
        .user_command
        .subscription
        .subscribe(requester.id, author_id)
        .await?;

    let author = state
        .user_query
        .find(author_id)
        .await?
        .ok_or_else(|| not_found("author"))?;
    let recipes_count = state.recipe_query.count_by_author(author_id).await?;
    let user = UserJson::load(&state, author, Some(requester.id)).await?;
    let limit = recipes_limit(params.recipes_limit.as_deref());

    Ok((
        StatusCode::CREATED,
        Json(SubscriptionJson::load(&state, user, recipes_count, limit).await?),
    ))
}

pub async fn unsubscribe(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(author_id): Path<i64>,
) -> Result<StatusCode> {
    state
        .user_command
        .subscription
        .unsubscribe(requester.id, author_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
