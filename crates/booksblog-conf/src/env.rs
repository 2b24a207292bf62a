//! Typed access to prefixed environment variables

use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvError {
	#[error("Failed to parse environment variable '{key}' (value length: {value_len}): {error}")]
	ParseError {
		key: String,
		/// Length of the original value, never the value itself
		value_len: usize,
		error: String,
	},

	#[error("Environment variable '{0}' is not valid unicode")]
	NotUnicode(String),
}

/// Environment variable reader with an optional prefix.
#[derive(Debug, Clone, Default)]
pub struct Env {
	pub prefix: Option<String>,
}

impl Env {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	/// Full variable name for `key`, e.g. `BOOKSBLOG_DEBUG` for `DEBUG`.
	pub fn key_name(&self, key: &str) -> String {
		match &self.prefix {
			Some(prefix) => format!("{}{}", prefix, key),
			None => key.to_string(),
		}
	}

	/// Raw value, `None` when unset.
	pub fn str(&self, key: &str) -> Result<Option<String>, EnvError> {
		let full_key = self.key_name(key);
		match env::var(&full_key) {
			Ok(value) => Ok(Some(value)),
			Err(env::VarError::NotPresent) => Ok(None),
			Err(env::VarError::NotUnicode(_)) => Err(EnvError::NotUnicode(full_key)),
		}
	}

	pub fn bool(&self, key: &str) -> Result<Option<bool>, EnvError> {
		self.parse_with(key, parse_bool)
	}

	/// Any `FromStr` value, e.g. integers or socket addresses.
	pub fn parse<T>(&self, key: &str) -> Result<Option<T>, EnvError>
	where
		T: FromStr,
		T::Err: std::fmt::Display,
	{
		self.parse_with(key, |value| value.trim().parse::<T>().map_err(|e| e.to_string()))
	}

	fn parse_with<T>(
		&self,
		key: &str,
		parse: impl FnOnce(&str) -> Result<T, String>,
	) -> Result<Option<T>, EnvError> {
		let Some(value) = self.str(key)? else {
			return Ok(None);
		};
		parse(&value).map(Some).map_err(|error| EnvError::ParseError {
			key: self.key_name(key),
			value_len: value.len(),
			error,
		})
	}
}

/// Accepts `true/false`, `yes/no`, `on/off` and `1/0`, case-insensitively.
pub fn parse_bool(value: &str) -> Result<bool, String> {
	match value.trim().to_ascii_lowercase().as_str() {
		"true" | "yes" | "on" | "1" => Ok(true),
		"false" | "no" | "off" | "0" | "" => Ok(false),
		_ => Err(format!("'{}' is not a boolean", value)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serial_test::serial;

	#[rstest]
	#[case("true", true)]
	#[case("YES", true)]
	#[case("on", true)]
	#[case("1", true)]
	#[case("false", false)]
	#[case("Off", false)]
	#[case("0", false)]
	fn test_parse_bool(#[case] input: &str, #[case] expected: bool) {
		assert_eq!(parse_bool(input), Ok(expected));
	}

	#[rstest]
	fn test_parse_bool_rejects_garbage() {
		assert!(parse_bool("maybe").is_err());
	}

	#[rstest]
	#[serial]
	fn test_prefixed_lookup() {
		// SAFETY: serialized with every other test touching the environment.
		unsafe {
			env::set_var("ENVTEST_PAGE", "42");
			env::set_var("ENVTEST_FLAG", "yes");
		}

		let env = Env::new().with_prefix("ENVTEST_");
		assert_eq!(env.parse::<u32>("PAGE").unwrap(), Some(42));
		assert_eq!(env.bool("FLAG").unwrap(), Some(true));
		assert_eq!(env.str("MISSING").unwrap(), None);

		// SAFETY: see above.
		unsafe {
			env::remove_var("ENVTEST_PAGE");
			env::remove_var("ENVTEST_FLAG");
		}
	}

	#[rstest]
	#[serial]
	fn test_parse_error_hides_value() {
		// SAFETY: serialized with every other test touching the environment.
		unsafe {
			env::set_var("ENVTEST_SECRET_NUMBER", "hunter2");
		}

		let err = Env::new()
			.with_prefix("ENVTEST_")
			.parse::<u32>("SECRET_NUMBER")
			.unwrap_err();
		let message = err.to_string();
		assert!(message.contains("ENVTEST_SECRET_NUMBER"));
		assert!(message.contains("value length: 7"));
		assert!(!message.contains("hunter2"));

		// SAFETY: see above.
		unsafe {
			env::remove_var("ENVTEST_SECRET_NUMBER");
		}
	}
}
