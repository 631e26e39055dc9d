use pantry_db::table::{Ingredient, RecipeIngredient, ShoppingCart};
use sea_query::{Expr, ExprTrait, JoinType, Query as SeaQuery, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;

use crate::{CartLine, ShoppingItem, aggregate};

#[derive(Clone)]
pub struct Query(pub SqlitePool);

impl Query {
    /// Every ingredient line of the recipes in `user_id`'s cart, and only
    /// that user's cart.
    pub async fn cart_lines(&self, user_id: i64) -> anyhow::Result<Vec<CartLine>> {
        let statement = SeaQuery::select()
            .columns([
                (Ingredient::Table, Ingredient::Name),
                (Ingredient::Table, Ingredient::MeasurementUnit),
            ])
            .column((RecipeIngredient::Table, RecipeIngredient::Amount))
            .from(ShoppingCart::Table)
            .join(
                JoinType::InnerJoin,
                RecipeIngredient::Table,
                Expr::col((RecipeIngredient::Table, RecipeIngredient::RecipeId))
                    .equals((ShoppingCart::Table, ShoppingCart::RecipeId)),
            )
            .join(
                JoinType::InnerJoin,
                Ingredient::Table,
                Expr::col((Ingredient::Table, Ingredient::Id))
                    .equals((RecipeIngredient::Table, RecipeIngredient::IngredientId)),
            )
            .and_where(Expr::col((ShoppingCart::Table, ShoppingCart::UserId)).eq(user_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, CartLine, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    pub async fn shopping_list(&self, user_id: i64) -> anyhow::Result<Vec<ShoppingItem>> {
        Ok(aggregate(self.cart_lines(user_id).await?))
    }
}
