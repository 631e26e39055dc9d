use pantry_db::table::{Subscription, User};
use pantry_shared::{Args, Integrity, Page, Reader};
use sea_query::{Alias, Expr, ExprTrait, JoinType, Order, Query as SeaQuery, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};
use time::OffsetDateTime;

pub(crate) const ALREADY_SUBSCRIBED: &str = "You are already subscribed to this author.";

#[derive(Clone)]
pub struct Command(pub pantry_shared::State);

impl Command {
    pub async fn subscribe(&self, subscriber_id: i64, author_id: i64) -> pantry_shared::Result<()> {
        if subscriber_id == author_id {
            pantry_shared::user!("You cannot subscribe to yourself.");
        }

        let mut tx = self.0.write_db.begin().await?;

        if !user_exists(&mut tx, author_id).await? {
            pantry_shared::not_found!("author");
        }

        if edge_exists(&mut tx, subscriber_id, author_id).await? {
            pantry_shared::user!("{ALREADY_SUBSCRIBED}");
        }

        let now = OffsetDateTime::now_utc().unix_timestamp();
        let statement = SeaQuery::insert()
            .into_table(Subscription::Table)
            .columns([
                Subscription::SubscriberId,
                Subscription::AuthorId,
                Subscription::CreatedAt,
            ])
            .values_panic([subscriber_id.into(), author_id.into(), now.into()])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&mut *tx)
            .await
            .or_conflict(ALREADY_SUBSCRIBED)?;

        tx.commit().await?;

        tracing::info!(subscriber_id, author_id, "subscription created");

        Ok(())
    }

    /// Removing an edge that does not exist is an error, not a no-op.
    pub async fn unsubscribe(
        &self,
        subscriber_id: i64,
        author_id: i64,
    ) -> pantry_shared::Result<()> {
        let mut tx = self.0.write_db.begin().await?;

        if !user_exists(&mut tx, author_id).await? {
            pantry_shared::not_found!("author");
        }

        let statement = SeaQuery::delete()
            .from_table(Subscription::Table)
            .and_where(Expr::col(Subscription::SubscriberId).eq(subscriber_id))
            .and_where(Expr::col(Subscription::AuthorId).eq(author_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        if result.rows_affected() == 0 {
            pantry_shared::user!("Subscription does not exist.");
        }

        tx.commit().await?;

        tracing::info!(subscriber_id, author_id, "subscription removed");

        Ok(())
    }
}

async fn user_exists(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    id: i64,
) -> pantry_shared::Result<bool> {
    let statement = SeaQuery::select()
        .column(User::Id)
        .from(User::Table)
        .and_where(Expr::col(User::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_scalar_with::<_, i64, _>(&sql, values)
        .fetch_optional(&mut **tx)
        .await?
        .is_some())
}

async fn edge_exists(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    subscriber_id: i64,
    author_id: i64,
) -> pantry_shared::Result<bool> {
    let statement = SeaQuery::select()
        .column(Subscription::AuthorId)
        .from(Subscription::Table)
        .and_where(Expr::col(Subscription::SubscriberId).eq(subscriber_id))
        .and_where(Expr::col(Subscription::AuthorId).eq(author_id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_scalar_with::<_, i64, _>(&sql, values)
        .fetch_optional(&mut **tx)
        .await?
        .is_some())
}

#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionRow {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub recipes_count: i64,
}

#[derive(Clone)]
pub struct Query(pub SqlitePool);

impl Query {
    /// Anonymous viewers are never subscribed.
    pub async fn is_subscribed(
        &self,
        viewer_id: Option<i64>,
        author_id: i64,
    ) -> anyhow::Result<bool> {
        let Some(viewer_id) = viewer_id else {
            return Ok(false);
        };

        let statement = SeaQuery::select()
            .column(Subscription::AuthorId)
            .from(Subscription::Table)
            .and_where(Expr::col(Subscription::SubscriberId).eq(viewer_id))
            .and_where(Expr::col(Subscription::AuthorId).eq(author_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?
            .is_some())
    }

    /// Authors followed by `subscriber_id`, most recent subscription first.
    pub async fn list(
        &self,
        subscriber_id: i64,
        args: Args,
    ) -> anyhow::Result<Page<SubscriptionRow>> {
        let statement = SeaQuery::select()
            .columns([
                (User::Table, User::Id),
                (User::Table, User::Email),
                (User::Table, User::Username),
                (User::Table, User::FirstName),
                (User::Table, User::LastName),
            ])
            .expr_as(
                Expr::cust(
                    r#"(SELECT COUNT(*) FROM "recipe" WHERE "recipe"."author_id" = "user"."id")"#,
                ),
                Alias::new("recipes_count"),
            )
            .from(Subscription::Table)
            .join(
                JoinType::InnerJoin,
                User::Table,
                Expr::col((Subscription::Table, Subscription::AuthorId))
                    .equals((User::Table, User::Id)),
            )
            .and_where(
                Expr::col((Subscription::Table, Subscription::SubscriberId)).eq(subscriber_id),
            )
            .order_by((Subscription::Table, Subscription::CreatedAt), Order::Desc)
            .order_by_expr(Expr::cust("\"subscription\".\"rowid\""), Order::Desc)
            .to_owned();

        Reader::new(statement).args(args).execute(&self.0).await
    }
}
