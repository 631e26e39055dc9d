use sea_query::{Alias, Asterisk, Expr, Func, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, sqlite::SqliteRow};

pub const DEFAULT_PAGE_SIZE: u64 = 6;
pub const MAX_PAGE_SIZE: u64 = 100;
/// Highest page whose offset still fits a SQLite integer.
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_PAGE_SIZE;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Args {
    #[serde(default = "default_page")]
    pub page: u64,
    pub limit: Option<u64>,
}

fn default_page() -> u64 {
    1
}

impl Default for Args {
    fn default() -> Self {
        Self {
            page: 1,
            limit: None,
        }
    }
}

impl Args {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page,
            limit: Some(limit),
        }
    }

    pub fn limit(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn page(&self) -> u64 {
        self.page.clamp(1, MAX_PAGE)
    }

    pub fn offset(&self) -> u64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    pub fn has_next(&self, count: u64) -> bool {
        self.offset().saturating_add(self.limit()) < count
    }

    pub fn has_previous(&self) -> bool {
        self.page() > 1
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub results: Vec<T>,
}

/// Runs an ordered select as one page plus a total row count.
pub struct Reader {
    statement: SelectStatement,
    args: Args,
}

impl Reader {
    pub fn new(statement: SelectStatement) -> Self {
        Self {
            statement,
            args: Args::default(),
        }
    }

    pub fn args(mut self, args: Args) -> Self {
        self.args = args;
        self
    }

    pub async fn execute<R>(self, pool: &SqlitePool) -> anyhow::Result<Page<R>>
    where
        R: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let count_statement = Query::select()
            .expr(Func::count(Expr::col(Asterisk)))
            .from_subquery(self.statement.clone(), Alias::new("page_source"))
            .to_owned();

        let (sql, values) = count_statement.build_sqlx(SqliteQueryBuilder);
        let count = sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_one(pool)
            .await?;

        let mut statement = self.statement;
        statement.limit(self.args.limit()).offset(self.args.offset());

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let results = sqlx::query_as_with::<_, R, _>(&sql, values)
            .fetch_all(pool)
            .await?;

        Ok(Page {
            count: u64::try_from(count).unwrap_or_default(),
            results,
        })
    }
}
