//! Accounts errors

use booksblog_core::exception::Error;
use booksblog_db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountError {
	#[error("A user with that username already exists.")]
	UsernameTaken,

	#[error("Please enter a correct username and password.")]
	InvalidCredentials,

	#[error("Password hashing failed: {0}")]
	Hashing(String),

	#[error(transparent)]
	Database(#[from] DbError),
}

impl From<AccountError> for Error {
	fn from(err: AccountError) -> Self {
		match err {
			AccountError::UsernameTaken => Error::Conflict(err.to_string()),
			AccountError::InvalidCredentials => Error::Authentication(err.to_string()),
			AccountError::Hashing(message) => Error::Internal(message),
			AccountError::Database(e) => e.into(),
		}
	}
}

/// Follow graph failures.
#[derive(Debug, Error)]
pub enum FollowError {
	#[error("You cannot follow yourself.")]
	SelfFollow,

	#[error("You are already following this user.")]
	AlreadyFollowing,

	#[error("You cannot unfollow yourself.")]
	SelfUnfollow,

	#[error("The user does not exist.")]
	UnknownUser(String),

	#[error(transparent)]
	Database(#[from] DbError),
}

impl From<FollowError> for Error {
	fn from(err: FollowError) -> Self {
		match err {
			FollowError::SelfFollow => Error::Validation(err.to_string()),
			FollowError::AlreadyFollowing => Error::Conflict(err.to_string()),
			FollowError::SelfUnfollow => Error::PermissionDenied(err.to_string()),
			FollowError::UnknownUser(username) => {
				Error::NotFound(format!("No user named {}", username))
			}
			FollowError::Database(e) => e.into(),
		}
	}
}
