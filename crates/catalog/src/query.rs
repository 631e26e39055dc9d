use pantry_db::table::{Ingredient, Tag};
use sea_query::{Expr, ExprTrait, LikeExpr, Order, Query as SeaQuery, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::{SqlitePool, prelude::FromRow};

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct TagRow {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct IngredientRow {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Clone)]
pub struct Query(pub SqlitePool);

impl Query {
    pub async fn list_tags(&self) -> anyhow::Result<Vec<TagRow>> {
        let statement = SeaQuery::select()
            .columns([Tag::Id, Tag::Name, Tag::Color, Tag::Slug])
            .from(Tag::Table)
            .order_by(Tag::Id, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, TagRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    pub async fn find_tag(&self, id: i64) -> anyhow::Result<Option<TagRow>> {
        let statement = SeaQuery::select()
            .columns([Tag::Id, Tag::Name, Tag::Color, Tag::Slug])
            .from(Tag::Table)
            .and_where(Expr::col(Tag::Id).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, TagRow, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?)
    }

    /// Ingredients whose name starts with `prefix`, ignoring ASCII case.
    /// No prefix returns the whole catalog, ordered by name.
    pub async fn search_ingredients(
        &self,
        prefix: Option<&str>,
    ) -> anyhow::Result<Vec<IngredientRow>> {
        let mut statement = SeaQuery::select()
            .columns([Ingredient::Id, Ingredient::Name, Ingredient::MeasurementUnit])
            .from(Ingredient::Table)
            .order_by(Ingredient::Name, Order::Asc)
            .order_by(Ingredient::Id, Order::Asc)
            .to_owned();

        if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
            statement.and_where(
                Expr::col(Ingredient::Name)
                    .like(LikeExpr::new(format!("{}%", escape_like(prefix))).escape('\\')),
            );
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, IngredientRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    pub async fn find_ingredient(&self, id: i64) -> anyhow::Result<Option<IngredientRow>> {
        let statement = SeaQuery::select()
            .columns([Ingredient::Id, Ingredient::Name, Ingredient::MeasurementUnit])
            .from(Ingredient::Table)
            .and_where(Expr::col(Ingredient::Id).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, IngredientRow, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?)
    }
}

pub(crate) async fn find_tag_by_name(
    pool: &SqlitePool,
    name: &str,
) -> anyhow::Result<Option<i64>> {
    find_id(pool, Tag::Table, Expr::col(Tag::Name).eq(name)).await
}

pub(crate) async fn find_tag_by_slug(
    pool: &SqlitePool,
    slug: &str,
) -> anyhow::Result<Option<i64>> {
    find_id(pool, Tag::Table, Expr::col(Tag::Slug).eq(slug)).await
}

pub(crate) async fn find_ingredient_by_name_unit(
    pool: &SqlitePool,
    name: &str,
    unit: &str,
) -> anyhow::Result<Option<i64>> {
    find_id(
        pool,
        Ingredient::Table,
        Expr::col(Ingredient::Name)
            .eq(name)
            .and(Expr::col(Ingredient::MeasurementUnit).eq(unit)),
    )
    .await
}

async fn find_id(
    pool: &SqlitePool,
    table: impl sea_query::IntoTableRef,
    condition: Expr,
) -> anyhow::Result<Option<i64>> {
    let statement = SeaQuery::select()
        .expr(Expr::cust("id"))
        .from(table)
        .and_where(condition)
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_scalar_with::<_, i64, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
