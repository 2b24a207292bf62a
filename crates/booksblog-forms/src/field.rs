use thiserror::Error;

/// Why a single field failed to clean.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
	/// Missing or blank required value; carries the field name
	#[error("This field is required.")]
	Required(String),

	#[error("{0}")]
	Validation(String),
}

pub type FieldResult<T> = Result<T, FieldError>;
