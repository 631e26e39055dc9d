use pantry_catalog::TagRow;
use pantry_db::table::{
    Favorite, Ingredient, Recipe, RecipeIngredient, RecipeTag, ShoppingCart as CartTable, Tag,
};
use pantry_shared::{Args, Page, Reader};
use sea_query::{
    Asterisk, Expr, ExprTrait, Func, JoinType, Order, Query as SeaQuery, SqliteQueryBuilder,
};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::{SqlitePool, prelude::FromRow};

#[derive(Debug, Clone, FromRow)]
pub struct RecipeRow {
    pub id: i64,
    pub author_id: i64,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct ShortRecipeRow {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct LineRow {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Recipe list filters. The viewer-relative flags only apply when a viewer
/// is present.
#[derive(Debug, Clone, Default)]
pub struct RecipesQuery {
    pub tags: Vec<String>,
    pub author_id: Option<i64>,
    pub viewer_id: Option<i64>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub args: Args,
}

const RECIPE_COLUMNS: [(Recipe, Recipe); 7] = [
    (Recipe::Table, Recipe::Id),
    (Recipe::Table, Recipe::AuthorId),
    (Recipe::Table, Recipe::Name),
    (Recipe::Table, Recipe::Text),
    (Recipe::Table, Recipe::Image),
    (Recipe::Table, Recipe::CookingTime),
    (Recipe::Table, Recipe::CreatedAt),
];

#[derive(Clone)]
pub struct Query(pub SqlitePool);

impl Query {
    pub async fn find(&self, id: i64) -> anyhow::Result<Option<RecipeRow>> {
        let statement = SeaQuery::select()
            .columns(RECIPE_COLUMNS)
            .from(Recipe::Table)
            .and_where(Expr::col((Recipe::Table, Recipe::Id)).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?)
    }

    /// Newest first.
    pub async fn filter(&self, query: RecipesQuery) -> anyhow::Result<Page<RecipeRow>> {
        let mut statement = SeaQuery::select()
            .columns(RECIPE_COLUMNS)
            .from(Recipe::Table)
            .order_by((Recipe::Table, Recipe::CreatedAt), Order::Desc)
            .order_by((Recipe::Table, Recipe::Id), Order::Desc)
            .to_owned();

        if !query.tags.is_empty() {
            let tagged = SeaQuery::select()
                .column((RecipeTag::Table, RecipeTag::RecipeId))
                .from(RecipeTag::Table)
                .join(
                    JoinType::InnerJoin,
                    Tag::Table,
                    Expr::col((RecipeTag::Table, RecipeTag::TagId)).equals((Tag::Table, Tag::Id)),
                )
                .and_where(Expr::col((Tag::Table, Tag::Slug)).is_in(query.tags))
                .to_owned();

            statement.and_where(Expr::col((Recipe::Table, Recipe::Id)).in_subquery(tagged));
        }

        if let Some(author_id) = query.author_id {
            statement.and_where(Expr::col((Recipe::Table, Recipe::AuthorId)).eq(author_id));
        }

        if let Some(viewer_id) = query.viewer_id {
            if query.is_favorited {
                let favorited = SeaQuery::select()
                    .column(Favorite::RecipeId)
                    .from(Favorite::Table)
                    .and_where(Expr::col(Favorite::UserId).eq(viewer_id))
                    .to_owned();

                statement.and_where(Expr::col((Recipe::Table, Recipe::Id)).in_subquery(favorited));
            }

            if query.is_in_shopping_cart {
                let in_cart = SeaQuery::select()
                    .column(CartTable::RecipeId)
                    .from(CartTable::Table)
                    .and_where(Expr::col(CartTable::UserId).eq(viewer_id))
                    .to_owned();

                statement.and_where(Expr::col((Recipe::Table, Recipe::Id)).in_subquery(in_cart));
            }
        }

        Reader::new(statement).args(query.args).execute(&self.0).await
    }

    /// Ingredient lines in insertion order.
    pub async fn lines(&self, recipe_id: i64) -> anyhow::Result<Vec<LineRow>> {
        let statement = SeaQuery::select()
            .columns([
                (Ingredient::Table, Ingredient::Id),
                (Ingredient::Table, Ingredient::Name),
                (Ingredient::Table, Ingredient::MeasurementUnit),
            ])
            .column((RecipeIngredient::Table, RecipeIngredient::Amount))
            .from(RecipeIngredient::Table)
            .join(
                JoinType::InnerJoin,
                Ingredient::Table,
                Expr::col((RecipeIngredient::Table, RecipeIngredient::IngredientId))
                    .equals((Ingredient::Table, Ingredient::Id)),
            )
            .and_where(Expr::col((RecipeIngredient::Table, RecipeIngredient::RecipeId)).eq(recipe_id))
            .order_by_expr(Expr::cust("\"recipe_ingredient\".\"rowid\""), Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, LineRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    pub async fn tags(&self, recipe_id: i64) -> anyhow::Result<Vec<TagRow>> {
        let statement = SeaQuery::select()
            .columns([
                (Tag::Table, Tag::Id),
                (Tag::Table, Tag::Name),
                (Tag::Table, Tag::Color),
                (Tag::Table, Tag::Slug),
            ])
            .from(RecipeTag::Table)
            .join(
                JoinType::InnerJoin,
                Tag::Table,
                Expr::col((RecipeTag::Table, RecipeTag::TagId)).equals((Tag::Table, Tag::Id)),
            )
            .and_where(Expr::col((RecipeTag::Table, RecipeTag::RecipeId)).eq(recipe_id))
            .order_by((Tag::Table, Tag::Id), Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, TagRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    /// An author's most recent recipes, all of them when `limit` is `None`.
    pub async fn by_author(
        &self,
        author_id: i64,
        limit: Option<u64>,
    ) -> anyhow::Result<Vec<ShortRecipeRow>> {
        let mut statement = SeaQuery::select()
            .columns([Recipe::Id, Recipe::Name, Recipe::Image, Recipe::CookingTime])
            .from(Recipe::Table)
            .and_where(Expr::col(Recipe::AuthorId).eq(author_id))
            .order_by(Recipe::CreatedAt, Order::Desc)
            .order_by(Recipe::Id, Order::Desc)
            .to_owned();

        if let Some(limit) = limit {
            statement.limit(limit);
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, ShortRecipeRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    pub async fn count_by_author(&self, author_id: i64) -> anyhow::Result<i64> {
        let statement = SeaQuery::select()
            .expr(Func::count(Expr::col(Asterisk)))
            .from(Recipe::Table)
            .and_where(Expr::col(Recipe::AuthorId).eq(author_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_one(&self.0)
            .await?)
    }
}
