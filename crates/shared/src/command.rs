use sqlx::error::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validate(#[from] validator::ValidationErrors),

    #[error("{0}")]
    User(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("forbidden")]
    Forbidden,

    #[error("Authentication credentials were not provided.")]
    Unauthenticated,

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        Self::Unknown(value.into())
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(value: argon2::password_hash::Error) -> Self {
        Self::Unknown(anyhow::anyhow!(value))
    }
}

impl From<sqlx_migrator::Error> for Error {
    fn from(value: sqlx_migrator::Error) -> Self {
        Self::Unknown(value.into())
    }
}

/// Maps storage-level constraint violations onto the domain taxonomy.
///
/// Unique and check violations become [`Error::User`] with the message of the
/// matching pre-check. Foreign key violations become [`Error::NotFound`].
pub trait Integrity<T> {
    fn or_conflict(self, message: &str) -> Result<T>;
}

impl<T> Integrity<T> for std::result::Result<T, sqlx::Error> {
    fn or_conflict(self, message: &str) -> Result<T> {
        self.map_err(|err| {
            let kind = match &err {
                sqlx::Error::Database(db) => Some(db.kind()),
                _ => None,
            };

            match kind {
                Some(ErrorKind::UniqueViolation) | Some(ErrorKind::CheckViolation) => {
                    Error::User(message.to_owned())
                }
                Some(ErrorKind::ForeignKeyViolation) => {
                    Error::NotFound("referenced resource".to_owned())
                }
                _ => err.into(),
            }
        })
    }
}

#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::Server(format!($msg)).into())
    };
    ($err:expr $(,)?) => {
        return Err($crate::Error::Server(format!($err)).into())
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::Server(format!($fmt, $($arg)*)).into())
    };
}

#[macro_export]
macro_rules! user {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::User(format!($msg)).into())
    };
    ($err:expr $(,)?) => {
        return Err($crate::Error::User(format!($err)).into())
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::User(format!($fmt, $($arg)*)).into())
    };
}

#[macro_export]
macro_rules! not_found {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::NotFound(format!($msg)).into())
    };
    ($err:expr $(,)?) => {
        return Err($crate::Error::NotFound(format!($err)).into())
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::NotFound(format!($fmt, $($arg)*)).into())
    };
}
