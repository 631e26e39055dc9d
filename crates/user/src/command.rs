use std::{ops::Deref, sync::LazyLock};

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use regex::Regex;
use serde::Deserialize;
use strum::{AsRefStr, Display, EnumString};
use validator::Validate;

use crate::repository::{self, EMAIL_TAKEN, USERNAME_TAKEN};

static RE_USERNAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    User,
    Superuser,
}

#[derive(Validate, Deserialize)]
pub struct RegisterInput {
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 150), regex(path = *RE_USERNAME, message = "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."))]
    pub username: String,
    #[validate(length(min = 1, max = 150))]
    pub first_name: String,
    #[validate(length(min = 1, max = 150))]
    pub last_name: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Validate, Deserialize)]
pub struct LoginInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Identity established by a successful login.
#[derive(Debug, Clone, Copy)]
pub struct Credentials {
    pub id: i64,
    pub is_superuser: bool,
}

#[derive(Clone)]
pub struct Command {
    state: pantry_shared::State,
    pub password: crate::password::Command,
    pub subscription: crate::subscription::Command,
}

impl Deref for Command {
    type Target = pantry_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl Command {
    pub fn new(state: pantry_shared::State) -> Self {
        Self {
            password: crate::password::Command(state.clone()),
            subscription: crate::subscription::Command(state.clone()),
            state,
        }
    }

    pub async fn register(&self, input: RegisterInput) -> pantry_shared::Result<i64> {
        input.validate()?;

        if repository::find(
            &self.read_db,
            repository::FindType::Email(input.email.to_owned()),
        )
        .await?
        .is_some()
        {
            pantry_shared::user!("{EMAIL_TAKEN}");
        }

        if repository::find(
            &self.read_db,
            repository::FindType::Username(input.username.to_owned()),
        )
        .await?
        .is_some()
        {
            pantry_shared::user!("{USERNAME_TAKEN}");
        }

        let password = crate::password::hash(&input.password)?;

        let id = repository::create(
            &self.write_db,
            repository::CreateInput {
                email: input.email,
                username: input.username,
                first_name: input.first_name,
                last_name: input.last_name,
                password,
            },
        )
        .await?;

        tracing::info!(id, "user registered");

        Ok(id)
    }

    pub async fn login(&self, input: LoginInput) -> pantry_shared::Result<Credentials> {
        input.validate()?;

        let Some(user_row) =
            repository::find(&self.read_db, repository::FindType::Email(input.email)).await?
        else {
            pantry_shared::user!("Unable to log in with provided credentials.");
        };

        let parsed_hash = PasswordHash::new(&user_row.password)?;

        if Argon2::default()
            .verify_password(input.password.as_bytes(), &parsed_hash)
            .is_err()
        {
            pantry_shared::user!("Unable to log in with provided credentials.");
        }

        Ok(Credentials {
            id: user_row.id,
            is_superuser: user_row.is_superuser,
        })
    }

    pub async fn set_role(&self, email: impl Into<String>, role: Role) -> pantry_shared::Result<()> {
        let Some(user_row) =
            repository::find(&self.read_db, repository::FindType::Email(email.into())).await?
        else {
            pantry_shared::not_found!("user");
        };

        repository::update(
            &self.write_db,
            repository::UpdateInput {
                id: user_row.id,
                password: None,
                is_superuser: Some(role == Role::Superuser),
            },
        )
        .await?;

        tracing::info!(id = user_row.id, role = role.as_ref(), "user role changed");

        Ok(())
    }
}
