use pantry_db::table::User;
use pantry_shared::Integrity;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};
use time::OffsetDateTime;

pub(crate) const EMAIL_TAKEN: &str = "A user with that email already exists.";
pub(crate) const USERNAME_TAKEN: &str = "A user with that username already exists.";

#[derive(FromRow)]
pub struct UserRow {
    pub id: i64,
    pub password: String,
    pub is_superuser: bool,
}

pub enum FindType {
    Id(i64),
    Email(String),
    Username(String),
}

pub(crate) async fn find(
    pool: &SqlitePool,
    arg_type: FindType,
) -> pantry_shared::Result<Option<UserRow>> {
    let mut statement = Query::select()
        .columns([User::Id, User::Password, User::IsSuperuser])
        .from(User::Table)
        .limit(1)
        .to_owned();

    match arg_type {
        FindType::Id(id) => statement.and_where(Expr::col(User::Id).eq(id)),
        FindType::Email(email) => statement.and_where(Expr::col(User::Email).eq(email)),
        FindType::Username(username) => {
            statement.and_where(Expr::col(User::Username).eq(username))
        }
    };

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, UserRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

pub struct CreateInput {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

pub(crate) async fn create(pool: &SqlitePool, input: CreateInput) -> pantry_shared::Result<i64> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let statement = Query::insert()
        .into_table(User::Table)
        .columns([
            User::Email,
            User::Username,
            User::FirstName,
            User::LastName,
            User::Password,
            User::IsSuperuser,
            User::CreatedAt,
        ])
        .values_panic([
            input.email.into(),
            input.username.into(),
            input.first_name.into(),
            input.last_name.into(),
            input.password.into(),
            false.into(),
            now.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    let id = sqlx::query_with(&sql, values)
        .execute(pool)
        .await
        .or_conflict("A user with that email or username already exists.")?
        .last_insert_rowid();

    Ok(id)
}

pub struct UpdateInput {
    pub id: i64,
    pub password: Option<String>,
    pub is_superuser: Option<bool>,
}

pub async fn update(pool: &SqlitePool, input: UpdateInput) -> pantry_shared::Result<()> {
    let mut statement = Query::update()
        .table(User::Table)
        .and_where(Expr::col(User::Id).eq(input.id))
        .to_owned();

    if let Some(password) = input.password {
        statement.value(User::Password, password);
    }

    if let Some(is_superuser) = input.is_superuser {
        statement.value(User::IsSuperuser, is_superuser);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}
