use axum::extract::State;
use pantry_catalog::{IngredientRow, TagRow};
use serde::Deserialize;

use super::AppState;
use super::view::not_found;
use crate::error::Result;
use crate::extract::{Json, Path, Query};

pub async fn tags(State(state): State<AppState>) -> Result<Json<Vec<TagRow>>> {
    Ok(Json(state.catalog_query.list_tags().await?))
}

pub async fn tag(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<TagRow>> {
    let tag = state
        .catalog_query
        .find_tag(id)
        .await?
        .ok_or_else(|| not_found("tag"))?;

    Ok(Json(tag))
}

#[derive(Debug, Default, Deserialize)]
pub struct IngredientParams {
    pub name: Option<String>,
}

/// Case-insensitive prefix search on the ingredient name.
pub async fn ingredients(
    State(state): State<AppState>,
    Query(params): Query<IngredientParams>,
) -> Result<Json<Vec<IngredientRow>>> {
    let prefix = params.name.as_deref().map(str::trim).filter(|name| !name.is_empty());

    Ok(Json(state.catalog_query.search_ingredients(prefix).await?))
}

pub async fn ingredient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<IngredientRow>> {
    let ingredient = state
        .catalog_query
        .find_ingredient(id)
        .await?
        .ok_or_else(|| not_found("ingredient"))?;

    Ok(Json(ingredient))
}
