use booksblog_core::exception::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
	#[error("Connection error: {0}")]
	Connection(#[source] sqlx::Error),

	#[error("Migration error: {0}")]
	Migration(#[from] sqlx::migrate::MigrateError),

	#[error("Query error: {0}")]
	Query(#[from] sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;

impl From<DbError> for Error {
	fn from(err: DbError) -> Self {
		Error::Database(err.to_string())
	}
}

/// True when `err` comes from a UNIQUE constraint.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
	matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
