use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use pantry_shopping::{DocumentRenderer, PlainTextRenderer};
use sqlx::SqlitePool;
use tower_http::services::ServeDir;

use crate::blob::{BlobStore, FsBlobStore};

mod auth;
mod catalog;
mod health;
mod recipes;
mod users;
mod view;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub pool: SqlitePool,
    pub user_command: pantry_user::Command,
    pub user_query: pantry_user::Query,
    pub subscription_query: pantry_user::subscription::Query,
    pub catalog_query: pantry_catalog::Query,
    pub recipe_command: pantry_recipe::Command,
    pub recipe_query: pantry_recipe::Query,
    pub shopping_query: pantry_shopping::Query,
    pub blob_store: Arc<dyn BlobStore>,
    pub renderer: Arc<dyn DocumentRenderer>,
}

impl AppState {
    /// Wires every command and query to the pools, images on the filesystem
    /// and shopping lists as plain text.
    pub fn new(config: crate::config::Config, state: pantry_shared::State) -> Self {
        let read_db = state.read_db.clone();
        let blob_store = FsBlobStore::new(&config.media.root, &config.media.url_prefix);

        Self {
            pool: read_db.clone(),
            user_command: pantry_user::Command::new(state.clone()),
            user_query: pantry_user::Query(read_db.clone()),
            subscription_query: pantry_user::subscription::Query(read_db.clone()),
            catalog_query: pantry_catalog::Query(read_db.clone()),
            recipe_command: pantry_recipe::Command::new(state),
            recipe_query: pantry_recipe::Query(read_db.clone()),
            shopping_query: pantry_shopping::Query(read_db),
            blob_store: Arc::new(blob_store),
            renderer: Arc::new(PlainTextRenderer),
            config,
        }
    }
}

fn api() -> Router<AppState> {
    Router::new()
        .route("/auth/token/login", post(auth::login))
        .route("/auth/token/logout", post(auth::logout))
        .route("/users", get(users::list).post(users::register))
        .route("/users/me", get(users::me))
        .route("/users/set_password", post(users::set_password))
        .route("/users/subscriptions", get(users::subscriptions))
        .route("/users/{id}", get(users::detail))
        .route(
            "/users/{id}/subscribe",
            post(users::subscribe).delete(users::unsubscribe),
        )
        .route("/tags", get(catalog::tags))
        .route("/tags/{id}", get(catalog::tag))
        .route("/ingredients", get(catalog::ingredients))
        .route("/ingredients/{id}", get(catalog::ingredient))
        .route("/recipes", get(recipes::list).post(recipes::create))
        .route(
            "/recipes/download_shopping_cart",
            get(recipes::download_shopping_cart),
        )
        .route(
            "/recipes/{id}",
            get(recipes::detail)
                .patch(recipes::update)
                .delete(recipes::delete),
        )
        .route(
            "/recipes/{id}/favorite",
            post(recipes::add_favorite).delete(recipes::remove_favorite),
        )
        .route(
            "/recipes/{id}/shopping_cart",
            post(recipes::add_to_cart).delete(recipes::remove_from_cart),
        )
}

pub fn router(app_state: AppState) -> Router {
    let media = ServeDir::new(&app_state.config.media.root);
    let media_prefix = app_state
        .config
        .media
        .url_prefix
        .trim_end_matches('/')
        .to_owned();

    Router::new()
        // Health check endpoints (no auth required)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .nest("/api", api().with_state(app_state))
        .nest_service(&media_prefix, media)
}
