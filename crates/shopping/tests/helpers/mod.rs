use std::{path::PathBuf, str::FromStr};

use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<pantry_shared::State> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    pantry_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(pantry_shared::State::single(pool))
}

pub async fn create_user(state: &pantry_shared::State, name: &str) -> anyhow::Result<i64> {
    Ok(pantry_user::Command::new(state.clone())
        .register(pantry_user::RegisterInput {
            email: format!("{name}@pantry.localhost"),
            username: name.to_owned(),
            first_name: name.to_owned(),
            last_name: "Tester".to_owned(),
            password: "my_password".to_owned(),
        })
        .await?)
}

pub async fn create_ingredient(
    state: &pantry_shared::State,
    name: &str,
    unit: &str,
) -> anyhow::Result<i64> {
    Ok(pantry_catalog::Command::new(state.clone())
        .create_ingredient(pantry_catalog::CreateIngredientInput {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
        })
        .await?)
}

pub async fn create_recipe(
    state: &pantry_shared::State,
    author_id: i64,
    name: &str,
    ingredients: Vec<(i64, i64)>,
) -> anyhow::Result<i64> {
    let catalog = pantry_catalog::Command::new(state.clone());
    let tag = match pantry_catalog::Query(state.read_db.clone())
        .list_tags()
        .await?
        .first()
    {
        Some(tag) => tag.id,
        None => {
            catalog
                .create_tag(pantry_catalog::CreateTagInput {
                    name: "Dinner".to_owned(),
                    color: "#8775D2".to_owned(),
                    slug: "dinner".to_owned(),
                })
                .await?
        }
    };

    Ok(pantry_recipe::Command::new(state.clone())
        .create(
            pantry_recipe::CreateInput {
                name: name.to_owned(),
                text: format!("How to cook {name}"),
                image: "recipes/images/test.png".to_owned(),
                cooking_time: 15,
                tags: vec![tag],
                ingredients: ingredients
                    .into_iter()
                    .map(|(id, amount)| pantry_recipe::IngredientEntry { id, amount })
                    .collect(),
            },
            author_id,
        )
        .await?)
}
