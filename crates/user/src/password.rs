use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use serde::Deserialize;
use validator::Validate;

use crate::repository;

#[derive(Validate, Deserialize)]
pub struct SetPasswordInput {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

pub(crate) fn hash(password: &str) -> pantry_shared::Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

#[derive(Clone)]
pub struct Command(pub pantry_shared::State);

impl Command {
    pub async fn set(&self, id: i64, input: SetPasswordInput) -> pantry_shared::Result<()> {
        input.validate()?;

        let Some(user_row) = repository::find(&self.0.read_db, repository::FindType::Id(id)).await?
        else {
            pantry_shared::not_found!("user");
        };

        let parsed_hash = PasswordHash::new(&user_row.password)?;
        if Argon2::default()
            .verify_password(input.current_password.as_bytes(), &parsed_hash)
            .is_err()
        {
            pantry_shared::user!("Invalid password.");
        }

        repository::update(
            &self.0.write_db,
            repository::UpdateInput {
                id,
                password: Some(hash(&input.new_password)?),
                is_superuser: None,
            },
        )
        .await?;

        Ok(())
    }
}
