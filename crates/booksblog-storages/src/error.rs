//! Storage error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
	#[error("File not found: {0}")]
	NotFound(String),

	/// Empty, absolute or parent-relative names
	#[error("Invalid file name: {0}")]
	InvalidName(String),

	#[error("Configuration error: {0}")]
	ConfigError(String),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl From<StorageError> for booksblog_core::Error {
	fn from(err: StorageError) -> Self {
		match err {
			StorageError::NotFound(name) => booksblog_core::Error::NotFound(name),
			StorageError::InvalidName(name) => booksblog_core::Error::NotFound(name),
			other => booksblog_core::Error::Storage(other.to_string()),
		}
	}
}
