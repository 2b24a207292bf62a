use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{DbError, DbResult};

/// Pool settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
	pub url: String,
	pub max_connections: u32,
	pub acquire_timeout: Duration,
}

impl DatabaseConfig {
	pub fn new(url: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			max_connections: 5,
			acquire_timeout: Duration::from_secs(30),
		}
	}
}

/// Shared handle to the SQLite pool. Clones share the pool.
#[derive(Debug, Clone)]
pub struct DatabaseConnection {
	pool: SqlitePool,
}

impl DatabaseConnection {
	/// Open (creating if needed) the database at `config.url`.
	pub async fn connect(config: &DatabaseConfig) -> DbResult<Self> {
		let options = SqliteConnectOptions::from_str(&config.url)
			.map_err(DbError::Connection)?
			.create_if_missing(true)
			.foreign_keys(true);

		let pool = SqlitePoolOptions::new()
			.max_connections(config.max_connections)
			.acquire_timeout(config.acquire_timeout)
			.connect_with(options)
			.await
			.map_err(DbError::Connection)?;

		tracing::info!(url = %config.url, "connected to database");
		Ok(Self { pool })
	}

	/// Private in-memory database.
	///
	/// Every connection to `sqlite::memory:` is a separate database, so the
	/// pool is pinned to a single connection that is never recycled.
	pub async fn connect_in_memory() -> DbResult<Self> {
		let options = SqliteConnectOptions::from_str("sqlite::memory:")
			.map_err(DbError::Connection)?
			.foreign_keys(true);

		let pool = SqlitePoolOptions::new()
			.max_connections(1)
			.idle_timeout(None)
			.max_lifetime(None)
			.connect_with(options)
			.await
			.map_err(DbError::Connection)?;

		Ok(Self { pool })
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	/// Apply the embedded migrations that have not run yet.
	pub async fn migrate(&self) -> DbResult<()> {
		sqlx::migrate!("./migrations").run(&self.pool).await?;
		tracing::info!("database migrations applied");
		Ok(())
	}

	/// One pooled connection, for code that runs several statements in a row.
	pub async fn acquire(&self) -> DbResult<PoolConnection<Sqlite>> {
		Ok(self.pool.acquire().await?)
	}

	pub async fn begin(&self) -> DbResult<Transaction<'static, Sqlite>> {
		Ok(self.pool.begin().await?)
	}

	pub async fn close(&self) {
		self.pool.close().await;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::is_unique_violation;
	use rstest::rstest;

	#[rstest]
	#[tokio::test]
	async fn test_migrations_create_tables() {
		let db = DatabaseConnection::connect_in_memory().await.unwrap();
		db.migrate().await.unwrap();

		let tables: Vec<String> = sqlx::query_scalar(
			"SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' AND name NOT LIKE 'sqlite%' ORDER BY name",
		)
		.fetch_all(db.pool())
		.await
		.unwrap();

		assert_eq!(
			tables,
			vec![
				"auth_session",
				"auth_user",
				"auth_userfollows",
				"blog_review",
				"blog_ticket"
			]
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_migrate_is_idempotent() {
		let db = DatabaseConnection::connect_in_memory().await.unwrap();
		db.migrate().await.unwrap();
		db.migrate().await.unwrap();
	}

	#[rstest]
	#[tokio::test]
	async fn test_file_database_is_created() {
		let dir = tempfile::tempdir().unwrap();
		let url = format!("sqlite://{}", dir.path().join("db.sqlite3").display());

		let db = DatabaseConnection::connect(&DatabaseConfig::new(url))
			.await
			.unwrap();
		db.migrate().await.unwrap();
		db.close().await;

		assert!(dir.path().join("db.sqlite3").exists());
	}

	#[rstest]
	#[tokio::test]
	async fn test_unique_violation_detection() {
		let db = DatabaseConnection::connect_in_memory().await.unwrap();
		db.migrate().await.unwrap();

		let insert = "INSERT INTO auth_user (username, password, date_joined) VALUES ('ann', 'x', '2024-01-01T00:00:00Z')";
		sqlx::query(insert).execute(db.pool()).await.unwrap();
		let err = sqlx::query(insert).execute(db.pool()).await.unwrap_err();

		assert!(is_unique_violation(&err));
	}

	#[rstest]
	#[tokio::test]
	async fn test_foreign_keys_cascade() {
		let db = DatabaseConnection::connect_in_memory().await.unwrap();
		db.migrate().await.unwrap();

		sqlx::query("INSERT INTO auth_user (id, username, password, date_joined) VALUES (1, 'ann', 'x', 'now')")
			.execute(db.pool())
			.await
			.unwrap();
		sqlx::query("INSERT INTO blog_ticket (title, user_id, uploader_id, time_created, ticket_type) VALUES ('T', 1, 1, 'now', 'REQUEST')")
			.execute(db.pool())
			.await
			.unwrap();
		sqlx::query("DELETE FROM auth_user WHERE id = 1")
			.execute(db.pool())
			.await
			.unwrap();

		let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blog_ticket")
			.fetch_one(db.pool())
			.await
			.unwrap();
		assert_eq!(remaining, 0);
	}
}
