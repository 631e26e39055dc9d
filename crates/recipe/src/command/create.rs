use pantry_db::table::Recipe;
use sea_query::{Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::error::ErrorKind;
use time::OffsetDateTime;
use validator::Validate;

use super::{IngredientEntry, lines, tag_set, validate_entries};

#[derive(Debug, Clone, Validate)]
pub struct CreateInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub text: String,
    /// Blob store reference of the already stored image.
    #[validate(length(min = 1))]
    pub image: String,
    #[validate(range(min = 1, max = 32767, message = "Cooking time must be between 1 and 32767 minutes."))]
    pub cooking_time: i64,
    pub tags: Vec<i64>,
    pub ingredients: Vec<IngredientEntry>,
}

impl CreateInput {
    /// Runs every check that needs no storage access and returns the tag set.
    pub fn check(&self) -> pantry_shared::Result<Vec<i64>> {
        self.validate()?;
        validate_entries(&self.ingredients)?;
        tag_set(&self.tags)
    }
}

impl super::Command {
    /// Persists the recipe, its tag links and every ingredient line, or nothing.
    pub async fn create(&self, input: CreateInput, author_id: i64) -> pantry_shared::Result<i64> {
        let tags = input.check()?;

        let mut tx = self.write_db.begin().await?;

        lines::ensure_tags(&mut tx, &tags).await?;
        lines::ensure_ingredients(&mut tx, &input.ingredients).await?;

        let now = OffsetDateTime::now_utc().unix_timestamp();
        let statement = Query::insert()
            .into_table(Recipe::Table)
            .columns([
                Recipe::AuthorId,
                Recipe::Name,
                Recipe::Text,
                Recipe::Image,
                Recipe::CookingTime,
                Recipe::CreatedAt,
            ])
            .values_panic([
                author_id.into(),
                input.name.into(),
                input.text.into(),
                input.image.into(),
                input.cooking_time.into(),
                now.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let id = sqlx::query_with(&sql, values)
            .execute(&mut *tx)
            .await
            .map_err(|err| {
                let missing_author = matches!(
                    &err,
                    sqlx::Error::Database(db) if matches!(db.kind(), ErrorKind::ForeignKeyViolation)
                );

                if missing_author {
                    pantry_shared::Error::NotFound("author".to_owned())
                } else {
                    err.into()
                }
            })?
            .last_insert_rowid();

        lines::insert_tags(&mut tx, id, &tags).await?;
        lines::insert_lines(&mut tx, id, &input.ingredients).await?;

        tx.commit().await?;

        tracing::info!(id, author_id, "recipe created");

        Ok(id)
    }
}
