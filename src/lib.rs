pub mod auth;
pub mod blob;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod observability;
pub mod routes;

pub use routes::AppState;

use tower_http::trace::TraceLayer;

/// Full application router, as served and as driven by the integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    routes::router(state).layer(TraceLayer::new_for_http())
}

/// Applies every pending migration.
pub async fn migrate(pool: &sqlx::SqlitePool) -> anyhow::Result<()> {
    use sqlx_migrator::{Migrate, Plan};

    let mut conn = pool.acquire().await?;
    pantry_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(())
}
