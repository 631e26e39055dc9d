mod command;
mod pagination;

pub use command::*;
pub use pagination::*;

#[derive(Clone)]
pub struct State {
    pub read_db: sqlx::SqlitePool,
    pub write_db: sqlx::SqlitePool,
}

impl State {
    /// Single pool for both reads and writes, used by the CLI and tests.
    pub fn single(pool: sqlx::SqlitePool) -> Self {
        Self {
            read_db: pool.clone(),
            write_db: pool,
        }
    }
}

/// The authenticated caller of a mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub id: i64,
    pub is_superuser: bool,
}

impl Requester {
    /// Authors may change their own resources, superusers may change any.
    pub fn can_edit(&self, owner_id: i64) -> bool {
        self.is_superuser || self.id == owner_id
    }
}
