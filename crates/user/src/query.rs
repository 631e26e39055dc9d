use pantry_db::table::User;
use pantry_shared::{Args, Page, Reader};
use sea_query::{Expr, ExprTrait, Order, Query as SeaQuery, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};

#[derive(Debug, Clone, FromRow)]
pub struct UserView {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_superuser: bool,
}

pub(crate) const USER_COLUMNS: [User; 6] = [
    User::Id,
    User::Email,
    User::Username,
    User::FirstName,
    User::LastName,
    User::IsSuperuser,
];

#[derive(Clone)]
pub struct Query(pub SqlitePool);

impl Query {
    pub async fn find(&self, id: i64) -> anyhow::Result<Option<UserView>> {
        let statement = SeaQuery::select()
            .columns(USER_COLUMNS)
            .from(User::Table)
            .and_where(Expr::col(User::Id).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, UserView, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?)
    }

    /// Newest accounts first.
    pub async fn list(&self, args: Args) -> anyhow::Result<Page<UserView>> {
        let statement = SeaQuery::select()
            .columns(USER_COLUMNS)
            .from(User::Table)
            .order_by(User::Id, Order::Desc)
            .to_owned();

        Reader::new(statement).args(args).execute(&self.0).await
    }
}
