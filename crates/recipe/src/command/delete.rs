use pantry_db::table::Recipe;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

use super::lines;

impl super::Command {
    /// Lines, tag links, favorites and cart entries go with the recipe.
    pub async fn delete(
        &self,
        recipe_id: i64,
        requested_by: pantry_shared::Requester,
    ) -> pantry_shared::Result<()> {
        let mut tx = self.write_db.begin().await?;

        let author_id = lines::recipe_author(&mut tx, recipe_id).await?;
        if !requested_by.can_edit(author_id) {
            return Err(pantry_shared::Error::Forbidden);
        }

        let statement = Query::delete()
            .from_table(Recipe::Table)
            .and_where(Expr::col(Recipe::Id).eq(recipe_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        tx.commit().await?;

        tracing::info!(recipe_id, requested_by = requested_by.id, "recipe deleted");

        Ok(())
    }
}
