//! User model

use booksblog_auth::PasswordHasher;
use booksblog_db::{DbResult, is_unique_violation};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::apps::accounts::errors::AccountError;

const SELECT_USER: &str =
	"SELECT id, username, email, first_name, last_name, password, date_joined FROM auth_user";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
	pub id: i64,
	pub username: String,
	pub email: String,
	pub first_name: String,
	pub last_name: String,
	/// Argon2 PHC string
	#[serde(skip_serializing)]
	pub password: String,
	pub date_joined: DateTime<Utc>,
}

/// Fields of a user about to be registered; `password` is the raw password.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
	pub username: String,
	pub email: String,
	pub first_name: String,
	pub last_name: String,
	pub password: String,
}

impl User {
	/// Register a user, hashing the password.
	pub async fn create(
		pool: &SqlitePool,
		hasher: &dyn PasswordHasher,
		new_user: &NewUser,
	) -> Result<User, AccountError> {
		let password = hasher
			.hash(&new_user.password)
			.map_err(|e| AccountError::Hashing(e.to_string()))?;
		let date_joined = Utc::now();

		let id: i64 = sqlx::query_scalar(
			"INSERT INTO auth_user (username, email, first_name, last_name, password, date_joined) \
			 VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING id",
		)
		.bind(&new_user.username)
		.bind(&new_user.email)
		.bind(&new_user.first_name)
		.bind(&new_user.last_name)
		.bind(&password)
		.bind(date_joined)
		.fetch_one(pool)
		.await
		.map_err(|e| {
			if is_unique_violation(&e) {
				AccountError::UsernameTaken
			} else {
				AccountError::Database(e.into())
			}
		})?;

		tracing::info!(user_id = id, username = %new_user.username, "user registered");

		Ok(User {
			id,
			username: new_user.username.clone(),
			email: new_user.email.clone(),
			first_name: new_user.first_name.clone(),
			last_name: new_user.last_name.clone(),
			password,
			date_joined,
		})
	}

	pub async fn get(pool: &SqlitePool, id: i64) -> DbResult<Option<User>> {
		let user = sqlx::query_as::<_, User>(&format!("{} WHERE id = ?1", SELECT_USER))
			.bind(id)
			.fetch_optional(pool)
			.await?;
		Ok(user)
	}

	pub async fn get_by_username(pool: &SqlitePool, username: &str) -> DbResult<Option<User>> {
		let user = sqlx::query_as::<_, User>(&format!("{} WHERE username = ?1", SELECT_USER))
			.bind(username)
			.fetch_optional(pool)
			.await?;
		Ok(user)
	}

	/// The user with `username` if `password` matches.
	pub async fn authenticate(
		pool: &SqlitePool,
		hasher: &dyn PasswordHasher,
		username: &str,
		password: &str,
	) -> Result<User, AccountError> {
		let Some(user) = Self::get_by_username(pool, username).await? else {
			return Err(AccountError::InvalidCredentials);
		};

		let valid = hasher
			.verify(password, &user.password)
			.map_err(|e| AccountError::Hashing(e.to_string()))?;
		if !valid {
			tracing::info!(username, "rejected login");
			return Err(AccountError::InvalidCredentials);
		}

		Ok(user)
	}
}
