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
pub async fn create_user(
    state: &pantry_shared::State,
    name: impl Into<String>,
) -> anyhow::Result<i64> {
    let ids = create_users(state, vec![name]).await?;

    Ok(ids[0])
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
