use pantry_db::table::Recipe;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use validator::Validate;

use super::{IngredientEntry, lines, tag_set, validate_entries};

/// Partial update: absent fields keep their value.
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateInput {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub text: Option<String>,
    #[validate(length(min = 1))]
    pub image: Option<String>,
    #[validate(range(min = 1, max = 32767, message = "Cooking time must be between 1 and 32767 minutes."))]
    pub cooking_time: Option<i64>,
    pub tags: Option<Vec<i64>>,
    pub ingredients: Option<Vec<IngredientEntry>>,
}

impl UpdateInput {
    /// Checks the present fields without touching storage and returns the
    /// deduplicated tag set when tags are replaced.
    pub fn check(&self) -> pantry_shared::Result<Option<Vec<i64>>> {
        self.validate()?;

        if let Some(entries) = self.ingredients.as_deref() {
            validate_entries(entries)?;
        }

        match self.tags.as_deref() {
            Some(tags) => Ok(Some(tag_set(tags)?)),
            None => Ok(None),
        }
    }
}

impl super::Command {
    pub async fn update(
        &self,
        recipe_id: i64,
        input: UpdateInput,
        requested_by: pantry_shared::Requester,
    ) -> pantry_shared::Result<()> {
        let tags = input.check()?;

        let mut tx = self.write_db.begin().await?;

        let author_id = lines::recipe_author(&mut tx, recipe_id).await?;
        if !requested_by.can_edit(author_id) {
            return Err(pantry_shared::Error::Forbidden);
        }

        if let Some(tags) = tags.as_deref() {
            lines::ensure_tags(&mut tx, tags).await?;
        }

        if let Some(entries) = input.ingredients.as_deref() {
            lines::ensure_ingredients(&mut tx, entries).await?;
        }

        let mut statement = Query::update()
            .table(Recipe::Table)
            .and_where(Expr::col(Recipe::Id).eq(recipe_id))
            .to_owned();
        let mut changed = false;

        if let Some(name) = input.name {
            statement.value(Recipe::Name, name);
            changed = true;
        }

        if let Some(text) = input.text {
            statement.value(Recipe::Text, text);
            changed = true;
        }

        if let Some(image) = input.image {
            statement.value(Recipe::Image, image);
            changed = true;
        }

        if let Some(cooking_time) = input.cooking_time {
            statement.value(Recipe::CookingTime, cooking_time);
            changed = true;
        }

        if changed {
            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        }

        if let Some(tags) = tags.as_deref() {
            lines::replace_tags(&mut tx, recipe_id, tags).await?;
        }

        if let Some(entries) = input.ingredients.as_deref() {
            lines::replace_lines(&mut tx, recipe_id, entries).await?;
        }

        tx.commit().await?;

        tracing::info!(recipe_id, requested_by = requested_by.id, "recipe updated");

        Ok(())
    }
}
