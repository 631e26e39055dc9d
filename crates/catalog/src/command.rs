use std::{ops::Deref, sync::LazyLock};

use pantry_db::table::{Ingredient, Tag};
use pantry_shared::Integrity;
use regex::Regex;
use sea_query::{Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use validator::Validate;

use crate::query::{find_ingredient_by_name_unit, find_tag_by_name, find_tag_by_slug};

static RE_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());
static RE_SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").unwrap());

#[derive(Validate)]
pub struct CreateTagInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(regex(path = *RE_COLOR, message = "Color must be a #RRGGBB hex value."))]
    pub color: String,
    #[validate(length(min = 1, max = 200), regex(path = *RE_SLUG, message = "Slug may only contain letters, numbers, hyphens and underscores."))]
    pub slug: String,
}

#[derive(Validate)]
pub struct CreateIngredientInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub measurement_unit: String,
}

#[derive(Clone)]
pub struct Command {
    state: pantry_shared::State,
}

impl Deref for Command {
    type Target = pantry_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl Command {
    pub fn new(state: pantry_shared::State) -> Self {
        Self { state }
    }

    pub async fn create_tag(&self, input: CreateTagInput) -> pantry_shared::Result<i64> {
        input.validate()?;

        if find_tag_by_name(&self.read_db, &input.name).await?.is_some() {
            pantry_shared::user!("Tag with this name already exists");
        }

        if find_tag_by_slug(&self.read_db, &input.slug).await?.is_some() {
            pantry_shared::user!("Tag with this slug already exists");
        }

        let statement = Query::insert()
            .into_table(Tag::Table)
            .columns([Tag::Name, Tag::Color, Tag::Slug])
            .values_panic([
                input.name.into(),
                input.color.to_uppercase().into(),
                input.slug.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let id = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await
            .or_conflict("Tag with this name or slug already exists")?
            .last_insert_rowid();

        tracing::info!(id, "tag created");

        Ok(id)
    }

    pub async fn create_ingredient(
        &self,
        input: CreateIngredientInput,
    ) -> pantry_shared::Result<i64> {
        input.validate()?;

        if find_ingredient_by_name_unit(&self.read_db, &input.name, &input.measurement_unit)
            .await?
            .is_some()
        {
            pantry_shared::user!("Ingredient with this name and unit already exists");
        }

        let statement = Query::insert()
            .into_table(Ingredient::Table)
            .columns([Ingredient::Name, Ingredient::MeasurementUnit])
            .values_panic([input.name.into(), input.measurement_unit.into()])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let id = sqlx::query_with(&sql, values)
            .execute(&self.write_db)
            .await
            .or_conflict("Ingredient with this name and unit already exists")?
            .last_insert_rowid();

        tracing::info!(id, "ingredient created");

        Ok(id)
    }
}
