use axum::http::Uri;
use pantry_catalog::TagRow;
use pantry_recipe::{LineRow, RecipeRow, ShortRecipeRow};
use pantry_shared::{Args, Page};
use pantry_user::UserView;
use serde::Serialize;

use super::AppState;
use crate::error::{AppError, Result};

#[derive(Debug, Serialize)]
pub struct UserJson {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl UserJson {
    pub async fn load(state: &AppState, user: UserView, viewer_id: Option<i64>) -> Result<Self> {
        let is_subscribed = state
            .subscription_query
            .is_subscribed(viewer_id, user.id)
            .await?;

        Ok(Self {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ShortRecipeJson {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i64,
}

impl ShortRecipeJson {
    pub fn new(state: &AppState, row: ShortRecipeRow) -> Self {
        Self {
            id: row.id,
            image: state.blob_store.url(&row.image),
            name: row.name,
            cooking_time: row.cooking_time,
        }
    }

    pub fn from_recipe(state: &AppState, row: RecipeRow) -> Self {
        Self {
            id: row.id,
            image: state.blob_store.url(&row.image),
            name: row.name,
            cooking_time: row.cooking_time,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeJson {
    pub id: i64,
    pub author: UserJson,
    pub name: String,
    pub text: String,
    pub image: String,
    pub ingredients: Vec<LineRow>,
    pub tags: Vec<TagRow>,
    pub cooking_time: i64,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl RecipeJson {
    pub async fn load(state: &AppState, row: RecipeRow, viewer_id: Option<i64>) -> Result<Self> {
        let Some(author) = state.user_query.find(row.author_id).await? else {
            pantry_shared::bail!("recipe {} has no author", row.id);
        };

        Ok(Self {
            author: UserJson::load(state, author, viewer_id).await?,
            ingredients: state.recipe_query.lines(row.id).await?,
            tags: state.recipe_query.tags(row.id).await?,
            is_favorited: state
                .recipe_command
                .favorites
                .contains(viewer_id, row.id)
                .await?,
            is_in_shopping_cart: state
                .recipe_command
                .shopping_cart
                .contains(viewer_id, row.id)
                .await?,
            image: state.blob_store.url(&row.image),
            id: row.id,
            name: row.name,
            text: row.text,
            cooking_time: row.cooking_time,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SubscriptionJson {
    #[serde(flatten)]
    pub user: UserJson,
    pub recipes: Vec<ShortRecipeJson>,
    pub recipes_count: i64,
}

impl SubscriptionJson {
    pub async fn load(
        state: &AppState,
        user: UserJson,
        recipes_count: i64,
        recipes_limit: Option<u64>,
    ) -> Result<Self> {
        let recipes = state
            .recipe_query
            .by_author(user.id, recipes_limit)
            .await?
            .into_iter()
            .map(|row| ShortRecipeJson::new(state, row))
            .collect();

        Ok(Self {
            user,
            recipes,
            recipes_count,
        })
    }
}

/// Non-numeric values mean no limit.
pub fn recipes_limit(value: Option<&str>) -> Option<u64> {
    value.and_then(|value| value.trim().parse().ok())
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(page: Page<T>, args: Args, uri: &Uri) -> Self {
        let next = args
            .has_next(page.count)
            .then(|| page_link(uri, args.page() + 1));
        let previous = args
            .has_previous()
            .then(|| page_link(uri, args.page() - 1));

        Self {
            count: page.count,
            next,
            previous,
            results: page.results,
        }
    }
}

/// `uri` with its `page` parameter replaced. Page 1 drops the parameter.
fn page_link(uri: &Uri, page: u64) -> String {
    let mut pairs: Vec<String> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty() && !pair.starts_with("page="))
        .map(str::to_owned)
        .collect();

    if page > 1 {
        pairs.push(format!("page={page}"));
    }

    if pairs.is_empty() {
        uri.path().to_owned()
    } else {
        format!("{}?{}", uri.path(), pairs.join("&"))
    }
}

pub fn not_found(resource: &str) -> AppError {
    pantry_shared::Error::NotFound(resource.to_owned()).into()
}
