//! Database-backed session storage
//!
//! Sessions live in the `auth_session` table created by the embedded
//! migrations. A session row binds a random key, sent to the browser as a
//! cookie, to a user id until its expiry date. Each session can also carry
//! one pending flash message, shown once on the next rendered page.
//!
//! ## Example
//!
//! ```rust,no_run
//! use booksblog_auth::{DatabaseSessionBackend, SessionConfig};
//! use booksblog_db::DatabaseConnection;
//!
//! # async fn example() {
//! let db = DatabaseConnection::connect_in_memory().await.unwrap();
//! db.migrate().await.unwrap();
//!
//! let sessions = DatabaseSessionBackend::new(db, SessionConfig::default());
//! let session = sessions.create(42).await.unwrap();
//! let set_cookie = sessions.session_cookie(&session.session_key);
//!
//! let loaded = sessions.load(&session.session_key).await.unwrap();
//! assert_eq!(loaded.map(|s| s.user_id), Some(42));
//! # let _ = set_cookie;
//! # }
//! ```

use booksblog_core::exception::Error;
use booksblog_db::DatabaseConnection;
use chrono::{DateTime, Duration, Utc};
use cookie::{Cookie, SameSite};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SessionError {
	#[error("Session storage error: {0}")]
	Database(#[from] sqlx::Error),

	#[error("Session lifetime {0} is out of range")]
	InvalidLifetime(Duration),
}

impl From<SessionError> for Error {
	fn from(err: SessionError) -> Self {
		match err {
			SessionError::Database(_) => Error::Database(err.to_string()),
			SessionError::InvalidLifetime(_) => Error::ImproperlyConfigured(err.to_string()),
		}
	}
}

/// Cookie and lifetime settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
	pub cookie_name: String,
	pub max_age: Duration,
	pub secure: bool,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			cookie_name: "sessionid".to_string(),
			max_age: Duration::days(14),
			secure: false,
		}
	}
}

/// One row of `auth_session`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Session {
	pub session_key: String,
	pub user_id: i64,
	/// Expiry as milliseconds since the Unix epoch
	pub expire_date: i64,
	pub flash: Option<String>,
}

impl Session {
	pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
		self.expire_date <= now.timestamp_millis()
	}
}

#[derive(Debug, Clone)]
pub struct DatabaseSessionBackend {
	db: DatabaseConnection,
	config: SessionConfig,
}

impl DatabaseSessionBackend {
	pub fn new(db: DatabaseConnection, config: SessionConfig) -> Self {
		Self { db, config }
	}

	pub fn config(&self) -> &SessionConfig {
		&self.config
	}

	/// Start a new session for `user_id`.
	pub async fn create(&self, user_id: i64) -> Result<Session, SessionError> {
		let expires = Utc::now()
			.checked_add_signed(self.config.max_age)
			.ok_or(SessionError::InvalidLifetime(self.config.max_age))?;
		let session = Session {
			session_key: Uuid::new_v4().simple().to_string(),
			user_id,
			expire_date: expires.timestamp_millis(),
			flash: None,
		};

		sqlx::query(
			"INSERT INTO auth_session (session_key, user_id, expire_date, flash) VALUES (?1, ?2, ?3, NULL)",
		)
		.bind(&session.session_key)
		.bind(session.user_id)
		.bind(session.expire_date)
		.execute(self.db.pool())
		.await?;

		tracing::debug!(user_id, "session created");
		Ok(session)
	}

	/// Live session for `session_key`. Expired sessions are deleted and
	/// reported as absent.
	pub async fn load(&self, session_key: &str) -> Result<Option<Session>, SessionError> {
		let session = sqlx::query_as::<_, Session>(
			"SELECT session_key, user_id, expire_date, flash FROM auth_session WHERE session_key = ?1",
		)
		.bind(session_key)
		.fetch_optional(self.db.pool())
		.await?;

		match session {
			Some(session) if session.is_expired(Utc::now()) => {
				self.delete(session_key).await?;
				Ok(None)
			}
			other => Ok(other),
		}
	}

	pub async fn delete(&self, session_key: &str) -> Result<(), SessionError> {
		sqlx::query("DELETE FROM auth_session WHERE session_key = ?1")
			.bind(session_key)
			.execute(self.db.pool())
			.await?;
		Ok(())
	}

	/// Remove every expired session, returning how many were deleted.
	pub async fn cleanup_expired(&self) -> Result<u64, SessionError> {
		let result = sqlx::query("DELETE FROM auth_session WHERE expire_date <= ?1")
			.bind(Utc::now().timestamp_millis())
			.execute(self.db.pool())
			.await?;
		Ok(result.rows_affected())
	}

	/// Replace the pending flash message of a session.
	pub async fn set_flash(&self, session_key: &str, message: &str) -> Result<(), SessionError> {
		sqlx::query("UPDATE auth_session SET flash = ?1 WHERE session_key = ?2")
			.bind(message)
			.bind(session_key)
			.execute(self.db.pool())
			.await?;
		Ok(())
	}

	/// Pop the pending flash message, if any.
	pub async fn take_flash(&self, session_key: &str) -> Result<Option<String>, SessionError> {
		let mut tx = self.db.pool().begin().await?;

		let flash: Option<Option<String>> =
			sqlx::query_scalar("SELECT flash FROM auth_session WHERE session_key = ?1")
				.bind(session_key)
				.fetch_optional(&mut *tx)
				.await?;
		let flash = flash.flatten();

		if flash.is_some() {
			sqlx::query("UPDATE auth_session SET flash = NULL WHERE session_key = ?1")
				.bind(session_key)
				.execute(&mut *tx)
				.await?;
		}
		tx.commit().await?;

		Ok(flash)
	}

	/// `Set-Cookie` value carrying `session_key`.
	pub fn session_cookie(&self, session_key: &str) -> String {
		Cookie::build((self.config.cookie_name.clone(), session_key.to_string()))
			.path("/")
			.http_only(true)
			.same_site(SameSite::Lax)
			.secure(self.config.secure)
			.max_age(cookie::time::Duration::seconds(self.config.max_age.num_seconds()))
			.build()
			.to_string()
	}

	/// `Set-Cookie` value that makes the browser drop the session cookie.
	pub fn removal_cookie(&self) -> String {
		Cookie::build((self.config.cookie_name.clone(), String::new()))
			.path("/")
			.http_only(true)
			.same_site(SameSite::Lax)
			.max_age(cookie::time::Duration::ZERO)
			.build()
			.to_string()
	}
}
