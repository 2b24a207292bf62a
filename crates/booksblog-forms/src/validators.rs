//! Account field validators

use crate::field::{FieldError, FieldResult};
use regex::Regex;
use std::sync::LazyLock;

// Letters, digits and @/./+/-/_ only.
static USERNAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[\w.@+-]+$").expect("USERNAME_REGEX: invalid regex pattern")
});

// One @, non-empty local part, dotted domain without spaces.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("EMAIL_REGEX: invalid regex pattern")
});

#[derive(Debug, Clone, Default)]
pub struct UsernameValidator;

impl UsernameValidator {
	pub fn new() -> Self {
		Self
	}

	pub fn validate(&self, value: &str) -> FieldResult<()> {
		if USERNAME_REGEX.is_match(value) {
			Ok(())
		} else {
			Err(FieldError::Validation(
				"Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
					.to_string(),
			))
		}
	}
}

#[derive(Debug, Clone, Default)]
pub struct EmailValidator;

impl EmailValidator {
	pub fn new() -> Self {
		Self
	}

	pub fn validate(&self, value: &str) -> FieldResult<()> {
		if EMAIL_REGEX.is_match(value) {
			Ok(())
		} else {
			Err(FieldError::Validation("Enter a valid email address.".to_string()))
		}
	}
}
