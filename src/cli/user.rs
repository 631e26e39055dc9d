use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Role {
    User,
    Superuser,
}

impl From<Role> for pantry_user::Role {
    fn from(role: Role) -> Self {
        match role {
            Role::User => pantry_user::Role::User,
            Role::Superuser => pantry_user::Role::Superuser,
        }
    }
}

#[tracing::instrument(skip(config))]
pub async fn set_role(config: pantry::config::Config, email: String, role: Role) -> anyhow::Result<()> {
    let pool = pantry::db::create_pool(&config.database.url, 1).await?;
    let command = pantry_user::Command::new(pantry_shared::State::single(pool.clone()));

    match command.set_role(email.to_owned(), role.into()).await {
        Ok(()) => tracing::info!("{email} is now {}", pantry_user::Role::from(role)),
        Err(pantry_shared::Error::NotFound(_)) => tracing::error!("user {email} not found"),
        Err(e) => return Err(e.into()),
    }

    pool.close().await;

    Ok(())
}
