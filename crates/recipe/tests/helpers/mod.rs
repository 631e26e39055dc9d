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

#[allow(dead_code)]
pub async fn create_users(
    state: &pantry_shared::State,
    names: impl IntoIterator<Item = impl Into<String>>,
) -> anyhow::Result<Vec<i64>> {
    let command = pantry_user::Command::new(state.clone());

    let mut ids = vec![];
    for name in names.into_iter() {
        let name = name.into();
        let id = command
            .register(pantry_user::RegisterInput {
                email: format!("{name}@pantry.localhost"),
                username: name.to_owned(),
                first_name: name.to_owned(),
                last_name: "Tester".to_owned(),
                password: "my_password".to_owned(),
            })
            .await?;
        ids.push(id);
    }

    Ok(ids)
}

#[allow(dead_code)]
pub async fn create_tags(
    state: &pantry_shared::State,
    slugs: impl IntoIterator<Item = &'static str>,
) -> anyhow::Result<Vec<i64>> {
    let command = pantry_catalog::Command::new(state.clone());

    let mut ids = vec![];
    for slug in slugs {
        ids.push(
            command
                .create_tag(pantry_catalog::CreateTagInput {
                    name: slug.to_uppercase(),
                    color: "#49B64E".to_owned(),
                    slug: slug.to_owned(),
                })
                .await?,
        );
    }

    Ok(ids)
}

#[allow(dead_code)]
pub async fn create_ingredients(
    state: &pantry_shared::State,
    items: impl IntoIterator<Item = (&'static str, &'static str)>,
) -> anyhow::Result<Vec<i64>> {
    let command = pantry_catalog::Command::new(state.clone());

    let mut ids = vec![];
    for (name, unit) in items {
        ids.push(
            command
                .create_ingredient(pantry_catalog::CreateIngredientInput {
                    name: name.to_owned(),
                    measurement_unit: unit.to_owned(),
                })
                .await?,
        );
    }

    Ok(ids)
}

#[allow(dead_code)]
pub fn entry(id: i64, amount: i64) -> pantry_recipe::IngredientEntry {
    pantry_recipe::IngredientEntry { id, amount }
}

#[allow(dead_code)]
pub fn recipe_input(
    name: &str,
    tags: Vec<i64>,
    ingredients: Vec<pantry_recipe::IngredientEntry>,
) -> pantry_recipe::CreateInput {
    pantry_recipe::CreateInput {
        name: name.to_owned(),
        text: format!("How to cook {name}"),
        image: "recipes/images/test.png".to_owned(),
        cooking_time: 30,
        tags,
        ingredients,
    }
}

#[allow(dead_code)]
pub fn requester(id: i64) -> pantry_shared::Requester {
    pantry_shared::Requester {
        id,
        is_superuser: false,
    }
}
