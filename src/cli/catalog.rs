use pantry_catalog::{CreateIngredientInput, CreateTagInput};

#[tracing::instrument(skip(config))]
pub async fn add_tag(
    config: pantry::config::Config,
    name: String,
    color: String,
    slug: String,
) -> anyhow::Result<()> {
    let pool = pantry::db::create_pool(&config.database.url, 1).await?;
    let command = pantry_catalog::Command::new(pantry_shared::State::single(pool.clone()));

    let id = command
        .create_tag(CreateTagInput { name, color, slug })
        .await?;
    tracing::info!(id, "Tag added");

    pool.close().await;

    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn add_ingredient(
    config: pantry::config::Config,
    name: String,
    unit: String,
) -> anyhow::Result<()> {
    let pool = pantry::db::create_pool(&config.database.url, 1).await?;
    let command = pantry_catalog::Command::new(pantry_shared::State::single(pool.clone()));

    let id = command
        .create_ingredient(CreateIngredientInput {
            name,
            measurement_unit: unit,
        })
        .await?;
    tracing::info!(id, "Ingredient added");

    pool.close().await;

    Ok(())
}
