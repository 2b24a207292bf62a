//! Blog errors

use booksblog_core::exception::Error;
use booksblog_db::DbError;
use booksblog_storages::{ImageError, StorageError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
	/// The acting user did not create the ticket or write the review
	#[error("Only the author of this {0} can change it.")]
	NotOwner(&'static str),

	#[error("You have already reviewed this ticket.")]
	DuplicateReview,

	#[error("No {0} matches the given query.")]
	NotFound(&'static str),

	#[error(transparent)]
	Image(#[from] ImageError),

	#[error(transparent)]
	Storage(#[from] StorageError),

	#[error(transparent)]
	Database(#[from] DbError),
}

impl From<sqlx::Error> for ContentError {
	fn from(err: sqlx::Error) -> Self {
		ContentError::Database(err.into())
	}
}

impl From<ContentError> for Error {
	fn from(err: ContentError) -> Self {
		match err {
			ContentError::NotOwner(_) => Error::PermissionDenied(err.to_string()),
			ContentError::DuplicateReview => Error::Conflict(err.to_string()),
			ContentError::NotFound(_) => Error::NotFound(err.to_string()),
			ContentError::Image(e) => e.into(),
			ContentError::Storage(e) => e.into(),
			ContentError::Database(e) => e.into(),
		}
	}
}
