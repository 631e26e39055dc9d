//! Per-user deduplicated recipe sets.
//!
//! Favorites and the shopping cart share one implementation: a purpose
//! marker picks the backing table and the messages reported when an add or
//! remove would not change the set.

use std::marker::PhantomData;

use pantry_db::table;
use pantry_shared::Integrity;
use sea_query::{Expr, ExprTrait, Iden, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use time::OffsetDateTime;

pub trait Purpose: Send + Sync + 'static {
    type Column: Iden + Clone + Send + Sync + 'static;

    const TABLE: Self::Column;
    const USER_ID: Self::Column;
    const RECIPE_ID: Self::Column;
    const CREATED_AT: Self::Column;

    const ALREADY_PRESENT: &'static str;
    const NOT_PRESENT: &'static str;
}

pub struct Favorites;

impl Purpose for Favorites {
    type Column = table::Favorite;

    const TABLE: Self::Column = table::Favorite::Table;
    const USER_ID: Self::Column = table::Favorite::UserId;
    const RECIPE_ID: Self::Column = table::Favorite::RecipeId;
    const CREATED_AT: Self::Column = table::Favorite::CreatedAt;

    const ALREADY_PRESENT: &'static str = "Recipe is already in favorites.";
    const NOT_PRESENT: &'static str = "Recipe is not in favorites.";
}

pub struct ShoppingCart;

impl Purpose for ShoppingCart {
    type Column = table::ShoppingCart;

    const TABLE: Self::Column = table::ShoppingCart::Table;
    const USER_ID: Self::Column = table::ShoppingCart::UserId;
    const RECIPE_ID: Self::Column = table::ShoppingCart::RecipeId;
    const CREATED_AT: Self::Column = table::ShoppingCart::CreatedAt;

    const ALREADY_PRESENT: &'static str = "Recipe is already in the shopping cart.";
    const NOT_PRESENT: &'static str = "Recipe is not in the shopping cart.";
}

pub struct MembershipSet<P: Purpose> {
    state: pantry_shared::State,
    purpose: PhantomData<fn() -> P>,
}

impl<P: Purpose> Clone for MembershipSet<P> {
    fn clone(&self) -> Self {
        Self::new(self.state.clone())
    }
}

impl<P: Purpose> MembershipSet<P> {
    pub fn new(state: pantry_shared::State) -> Self {
        Self {
            state,
            purpose: PhantomData,
        }
    }

    pub async fn add(&self, user_id: i64, recipe_id: i64) -> pantry_shared::Result<()> {
        let mut tx = self.state.write_db.begin().await?;

        ensure_recipe(&mut tx, recipe_id).await?;

        if self.exists(&mut *tx, user_id, recipe_id).await? {
            pantry_shared::user!("{}", P::ALREADY_PRESENT);
        }

        let now = OffsetDateTime::now_utc().unix_timestamp();
        let statement = Query::insert()
            .into_table(P::TABLE)
            .columns([P::USER_ID, P::RECIPE_ID, P::CREATED_AT])
            .values_panic([user_id.into(), recipe_id.into(), now.into()])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&mut *tx)
            .await
            .or_conflict(P::ALREADY_PRESENT)?;

        tx.commit().await?;

        Ok(())
    }

    /// Removing a recipe that is not in the set is an error, not a no-op.
    pub async fn remove(&self, user_id: i64, recipe_id: i64) -> pantry_shared::Result<()> {
        let mut tx = self.state.write_db.begin().await?;

        ensure_recipe(&mut tx, recipe_id).await?;

        let statement = Query::delete()
            .from_table(P::TABLE)
            .and_where(Expr::col(P::USER_ID).eq(user_id))
            .and_where(Expr::col(P::RECIPE_ID).eq(recipe_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        if result.rows_affected() == 0 {
            pantry_shared::user!("{}", P::NOT_PRESENT);
        }

        tx.commit().await?;

        Ok(())
    }

    /// Always false for anonymous viewers.
    pub async fn contains(&self, user_id: Option<i64>, recipe_id: i64) -> anyhow::Result<bool> {
        let Some(user_id) = user_id else {
            return Ok(false);
        };

        Ok(self.exists(&self.state.read_db, user_id, recipe_id).await?)
    }

    async fn exists<'e, E>(&self, executor: E, user_id: i64, recipe_id: i64) -> sqlx::Result<bool>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let statement = Query::select()
            .column(P::RECIPE_ID)
            .from(P::TABLE)
            .and_where(Expr::col(P::USER_ID).eq(user_id))
            .and_where(Expr::col(P::RECIPE_ID).eq(recipe_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_optional(executor)
            .await?
            .is_some())
    }
}

async fn ensure_recipe(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    recipe_id: i64,
) -> pantry_shared::Result<()> {
    let statement = Query::select()
        .column(table::Recipe::Id)
        .from(table::Recipe::Table)
        .and_where(Expr::col(table::Recipe::Id).eq(recipe_id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let found = sqlx::query_scalar_with::<_, i64, _>(&sql, values)
        .fetch_optional(&mut **tx)
        .await?;

    if found.is_none() {
        pantry_shared::not_found!("recipe");
    }

    Ok(())
}
