use axum::{
    extract::{OriginalUri, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use pantry_recipe::{CreateInput, IngredientEntry, RecipeRow, RecipesQuery, UpdateInput};
use pantry_shared::{Args, Page, Requester};
use serde::Deserialize;

use super::AppState;
use super::view::{Paginated, RecipeJson, ShortRecipeJson, not_found};
use crate::auth::{AuthUser, MaybeUser};
use crate::blob::decode_data_url;
use crate::error::Result;
use crate::extract::{Json, Path, Query};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: Option<i64>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

fn flag(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true" | "True"))
}

pub async fn list(
    State(state): State<AppState>,
    viewer: MaybeUser,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<ListParams>,
) -> Result<Json<Paginated<RecipeJson>>> {
    let args = Args {
        page: params.page.unwrap_or(1),
        limit: params.limit,
    };

    let page = state
        .recipe_query
        .filter(RecipesQuery {
            tags: params.tags,
            author_id: params.author,
            viewer_id: viewer.id(),
            is_favorited: flag(params.is_favorited.as_deref()),
            is_in_shopping_cart: flag(params.is_in_shopping_cart.as_deref()),
            args,
        })
        .await?;

    let mut results = Vec::with_capacity(page.results.len());
    for row in page.results {
        results.push(RecipeJson::load(&state, row, viewer.id()).await?);
    }

    let page = Page {
        count: page.count,
        results,
    };

    Ok(Json(Paginated::new(page, args, &uri)))
}

pub async fn detail(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(id): Path<i64>,
) -> Result<Json<RecipeJson>> {
    let row = state
        .recipe_query
        .find(id)
        .await?
        .ok_or_else(|| not_found("recipe"))?;

    Ok(Json(RecipeJson::load(&state, row, viewer.id()).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i64,
    pub tags: Vec<i64>,
    pub ingredients: Vec<IngredientEntry>,
}

async fn store_image(state: &AppState, data_url: &str) -> Result<String> {
    let (bytes, extension) = decode_data_url(data_url)?;

    Ok(state.blob_store.put(bytes, &extension).await?)
}

async fn discard_image(state: &AppState, reference: &str) {
    if let Err(err) = state.blob_store.remove(reference).await {
        tracing::warn!(reference, error = %err, "Failed to remove blob");
    }
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Json(body): Json<CreateBody>,
) -> Result<(StatusCode, Json<RecipeJson>)> {
    let mut input = CreateInput {
        name: body.name,
        text: body.text,
        image: body.image,
        cooking_time: body.cooking_time,
        tags: body.tags,
        ingredients: body.ingredients,
    };
    input.check()?;

    let image = store_image(&state, &input.image).await?;
    input.image = image.clone();

    let id = match state.recipe_command.create(input, requester.id).await {
        Ok(id) => id,
        Err(err) => {
            discard_image(&state, &image).await;
            return Err(err.into());
        }
    };

    let row = state
        .recipe_query
        .find(id)
        .await?
        .ok_or_else(|| not_found("recipe"))?;

    Ok((
        StatusCode::CREATED,
        Json(RecipeJson::load(&state, row, Some(requester.id)).await?),
    ))
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBody {
    pub name: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub cooking_time: Option<i64>,
    pub tags: Option<Vec<i64>>,
    pub ingredients: Option<Vec<IngredientEntry>>,
}

/// Fails before any blob is written when the caller may not edit.
async fn editable(state: &AppState, id: i64, requester: Requester) -> Result<RecipeRow> {
    let row = state
        .recipe_query
        .find(id)
        .await?
        .ok_or_else(|| not_found("recipe"))?;

    if !requester.can_edit(row.author_id) {
        return Err(pantry_shared::Error::Forbidden.into());
    }

    Ok(row)
}

pub async fn update(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateBody>,
) -> Result<Json<RecipeJson>> {
    let current = editable(&state, id, requester).await?;

    let mut input = UpdateInput {
        name: body.name,
        text: body.text,
        image: body.image,
        cooking_time: body.cooking_time,
        tags: body.tags,
        ingredients: body.ingredients,
    };
    input.check()?;

    let image = match input.image.take() {
        Some(data_url) => Some(store_image(&state, &data_url).await?),
        None => None,
    };
    input.image = image.clone();

    let updated = state.recipe_command.update(id, input, requester).await;

    match (updated, image) {
        (Ok(()), Some(_)) => discard_image(&state, &current.image).await,
        (Ok(()), None) => {}
        (Err(err), image) => {
            if let Some(image) = image {
                discard_image(&state, &image).await;
            }
            return Err(err.into());
        }
    }

    let row = state
        .recipe_query
        .find(id)
        .await?
        .ok_or_else(|| not_found("recipe"))?;

    Ok(Json(RecipeJson::load(&state, row, Some(requester.id)).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let image = state.recipe_query.find(id).await?.map(|row| row.image);

    state.recipe_command.delete(id, requester).await?;

    if let Some(image) = image {
        discard_image(&state, &image).await;
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn short(state: &AppState, id: i64) -> Result<Json<ShortRecipeJson>> {
    let row = state
        .recipe_query
        .find(id)
        .await?
        .ok_or_else(|| not_found("recipe"))?;

    Ok(Json(ShortRecipeJson::from_recipe(state, row)))
}

pub async fn add_favorite(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<ShortRecipeJson>)> {
    state.recipe_command.favorites.add(requester.id, id).await?;

    Ok((StatusCode::CREATED, short(&state, id).await?))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.recipe_command.favorites.remove(requester.id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<ShortRecipeJson>)> {
    state
        .recipe_command
        .shopping_cart
        .add(requester.id, id)
        .await?;

    Ok((StatusCode::CREATED, short(&state, id).await?))
}

pub async fn remove_from_cart(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state
        .recipe_command
        .shopping_cart
        .remove(requester.id, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn download_shopping_cart(
    State(state): State<AppState>,
    AuthUser(requester): AuthUser,
) -> Result<impl IntoResponse> {
    let items = state.shopping_query.shopping_list(requester.id).await?;
    let document = state.renderer.render(&items);

    Ok((
        [
            (header::CONTENT_TYPE, state.renderer.content_type().to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", state.renderer.file_name()),
            ),
        ],
        document,
    ))
}
