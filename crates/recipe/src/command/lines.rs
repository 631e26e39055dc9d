use pantry_db::table::{Ingredient, Recipe, RecipeIngredient, RecipeTag, Tag};
use pantry_shared::Integrity;
use sea_query::{Expr, ExprTrait, Func, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{Sqlite, Transaction};

use super::{IngredientEntry, validate_entries};

type Tx<'a> = Transaction<'a, Sqlite>;

pub(crate) async fn recipe_author(tx: &mut Tx<'_>, recipe_id: i64) -> pantry_shared::Result<i64> {
    let statement = Query::select()
        .column(Recipe::AuthorId)
        .from(Recipe::Table)
        .and_where(Expr::col(Recipe::Id).eq(recipe_id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let author_id = sqlx::query_scalar_with::<_, i64, _>(&sql, values)
        .fetch_optional(&mut **tx)
        .await?;

    match author_id {
        Some(author_id) => Ok(author_id),
        None => pantry_shared::not_found!("recipe"),
    }
}

async fn count_existing(
    tx: &mut Tx<'_>,
    table: impl sea_query::IntoTableRef,
    id_col: impl sea_query::IntoColumnRef + Clone,
    ids: Vec<i64>,
) -> pantry_shared::Result<usize> {
    let statement = Query::select()
        .expr(Func::count(Expr::col(id_col.clone())))
        .from(table)
        .and_where(Expr::col(id_col).is_in(ids))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let count = sqlx::query_scalar_with::<_, i64, _>(&sql, values)
        .fetch_one(&mut **tx)
        .await?;

    Ok(usize::try_from(count).unwrap_or_default())
}

/// `tags` must already be deduplicated.
pub(crate) async fn ensure_tags(tx: &mut Tx<'_>, tags: &[i64]) -> pantry_shared::Result<()> {
    if count_existing(tx, Tag::Table, Tag::Id, tags.to_vec()).await? != tags.len() {
        pantry_shared::not_found!("tag");
    }

    Ok(())
}

pub(crate) async fn ensure_ingredients(
    tx: &mut Tx<'_>,
    entries: &[IngredientEntry],
) -> pantry_shared::Result<()> {
    let ids = entries.iter().map(|entry| entry.id).collect::<Vec<_>>();
    if count_existing(tx, Ingredient::Table, Ingredient::Id, ids).await? != entries.len() {
        pantry_shared::not_found!("ingredient");
    }

    Ok(())
}

pub(crate) async fn insert_tags(
    tx: &mut Tx<'_>,
    recipe_id: i64,
    tags: &[i64],
) -> pantry_shared::Result<()> {
    let mut statement = Query::insert()
        .into_table(RecipeTag::Table)
        .columns([RecipeTag::RecipeId, RecipeTag::TagId])
        .to_owned();

    for tag_id in tags {
        statement.values_panic([recipe_id.into(), (*tag_id).into()]);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values)
        .execute(&mut **tx)
        .await
        .or_conflict("Duplicate tags are not allowed.")?;

    Ok(())
}

pub(crate) async fn replace_tags(
    tx: &mut Tx<'_>,
    recipe_id: i64,
    tags: &[i64],
) -> pantry_shared::Result<()> {
    let statement = Query::delete()
        .from_table(RecipeTag::Table)
        .and_where(Expr::col(RecipeTag::RecipeId).eq(recipe_id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&mut **tx).await?;

    insert_tags(tx, recipe_id, tags).await
}

pub(crate) async fn insert_lines(
    tx: &mut Tx<'_>,
    recipe_id: i64,
    entries: &[IngredientEntry],
) -> pantry_shared::Result<()> {
    let mut statement = Query::insert()
        .into_table(RecipeIngredient::Table)
        .columns([
            RecipeIngredient::RecipeId,
            RecipeIngredient::IngredientId,
            RecipeIngredient::Amount,
        ])
        .to_owned();

    for entry in entries {
        statement.values_panic([recipe_id.into(), entry.id.into(), entry.amount.into()]);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values)
        .execute(&mut **tx)
        .await
        .or_conflict("Duplicate ingredients are not allowed.")?;

    Ok(())
}

pub(crate) async fn replace_lines(
    tx: &mut Tx<'_>,
    recipe_id: i64,
    entries: &[IngredientEntry],
) -> pantry_shared::Result<()> {
    let statement = Query::delete()
        .from_table(RecipeIngredient::Table)
        .and_where(Expr::col(RecipeIngredient::RecipeId).eq(recipe_id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&mut **tx).await?;

    insert_lines(tx, recipe_id, entries).await
}

impl super::Command {
    /// Swaps the whole ingredient composition of a recipe in one transaction.
    pub async fn replace_ingredients(
        &self,
        recipe_id: i64,
        entries: Vec<IngredientEntry>,
    ) -> pantry_shared::Result<()> {
        validate_entries(&entries)?;

        let mut tx = self.write_db.begin().await?;
        recipe_author(&mut tx, recipe_id).await?;
        ensure_ingredients(&mut tx, &entries).await?;
        replace_lines(&mut tx, recipe_id, &entries).await?;
        tx.commit().await?;

        tracing::info!(recipe_id, lines = entries.len(), "recipe ingredients replaced");

        Ok(())
    }
}
