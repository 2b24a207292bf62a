//! Framework error type and its mapping onto HTTP status codes.

use http::StatusCode;
use thiserror::Error;

/// Error returned by handlers, middleware and the layers below them.
///
/// Each variant maps onto exactly one HTTP status, see [`Error::status_code`].
#[derive(Debug, Error)]
pub enum Error {
	/// Malformed request (bad body, bad header, unparsable parameter)
	#[error("HTTP error: {0}")]
	Http(String),

	/// Submitted data failed validation
	#[error("Validation error: {0}")]
	Validation(String),

	/// Uploaded file could not be processed
	#[error("Invalid upload: {0}")]
	InvalidUpload(String),

	/// No authenticated user on a route that needs one
	#[error("Authentication required")]
	NotAuthenticated,

	/// Credentials could not be verified or hashed
	#[error("Authentication error: {0}")]
	Authentication(String),

	/// Authenticated user is not allowed to perform the action
	#[error("Permission denied: {0}")]
	PermissionDenied(String),

	/// Resource does not exist
	#[error("Not found: {0}")]
	NotFound(String),

	/// Route exists but not for this method
	#[error("Method not allowed: {0}")]
	MethodNotAllowed(String),

	/// Uniqueness or state conflict
	#[error("Conflict: {0}")]
	Conflict(String),

	#[error("Database error: {0}")]
	Database(String),

	#[error("Storage error: {0}")]
	Storage(String),

	#[error("Template error: {0}")]
	Template(String),

	#[error("Configuration error: {0}")]
	ImproperlyConfigured(String),

	#[error("Internal server error: {0}")]
	Internal(String),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl Error {
	/// HTTP status a response for this error should carry.
	pub fn status_code(&self) -> StatusCode {
		match self {
			Error::Http(_) | Error::Validation(_) | Error::InvalidUpload(_) => {
				StatusCode::BAD_REQUEST
			}
			Error::NotAuthenticated | Error::Authentication(_) => StatusCode::UNAUTHORIZED,
			Error::PermissionDenied(_) => StatusCode::FORBIDDEN,
			Error::NotFound(_) => StatusCode::NOT_FOUND,
			Error::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
			Error::Conflict(_) => StatusCode::CONFLICT,
			Error::Database(_)
			| Error::Storage(_)
			| Error::Template(_)
			| Error::ImproperlyConfigured(_)
			| Error::Internal(_)
			| Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// True for failures caused by the server rather than the client.
	pub fn is_server_error(&self) -> bool {
		self.status_code().is_server_error()
	}
}

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Error::Http("bad".into()), StatusCode::BAD_REQUEST)]
	#[case(Error::InvalidUpload("not an image".into()), StatusCode::BAD_REQUEST)]
	#[case(Error::NotAuthenticated, StatusCode::UNAUTHORIZED)]
	#[case(Error::PermissionDenied("self".into()), StatusCode::FORBIDDEN)]
	#[case(Error::NotFound("ticket 4".into()), StatusCode::NOT_FOUND)]
	#[case(Error::MethodNotAllowed("PUT".into()), StatusCode::METHOD_NOT_ALLOWED)]
	#[case(Error::Database("locked".into()), StatusCode::INTERNAL_SERVER_ERROR)]
	fn test_status_code_mapping(#[case] error: Error, #[case] expected: StatusCode) {
		assert_eq!(error.status_code(), expected);
	}

	#[rstest]
	fn test_server_error_classification() {
		assert!(Error::Storage("disk full".into()).is_server_error());
		assert!(!Error::NotFound("x".into()).is_server_error());
	}

	#[rstest]
	fn test_display_includes_detail() {
		let err = Error::NotFound("Ticket 12".to_string());
		assert_eq!(err.to_string(), "Not found: Ticket 12");
	}
}
