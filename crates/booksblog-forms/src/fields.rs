//! Typed form fields.
//!
//! Each field cleans the raw submitted value (`None` when the input was not
//! submitted at all) into a typed value.

use crate::field::{FieldError, FieldResult};

/// Text input with optional length bounds, counted in characters.
#[derive(Debug, Clone)]
pub struct CharField {
	pub name: String,
	pub required: bool,
	pub max_length: Option<usize>,
	pub min_length: Option<usize>,
	pub strip: bool,
}

impl CharField {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			required: false,
			max_length: None,
			min_length: None,
			strip: true,
		}
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn with_max_length(mut self, max_length: usize) -> Self {
		self.max_length = Some(max_length);
		self
	}

	pub fn with_min_length(mut self, min_length: usize) -> Self {
		self.min_length = Some(min_length);
		self
	}

	pub fn no_strip(mut self) -> Self {
		self.strip = false;
		self
	}

	pub fn clean(&self, value: Option<&str>) -> FieldResult<String> {
		let value = value.map(|v| if self.strip { v.trim() } else { v }).unwrap_or("");
		if value.is_empty() {
			if self.required {
				return Err(FieldError::Required(self.name.clone()));
			}
			return Ok(String::new());
		}

		let char_count = value.chars().count();
		if let Some(max_length) = self.max_length
			&& char_count > max_length
		{
			return Err(FieldError::Validation(format!(
				"Ensure this value has at most {} characters (it has {}).",
				max_length, char_count
			)));
		}

		if let Some(min_length) = self.min_length
			&& char_count < min_length
		{
			return Err(FieldError::Validation(format!(
				"Ensure this value has at least {} characters (it has {}).",
				min_length, char_count
			)));
		}

		Ok(value.to_string())
	}
}

/// Whole number with optional inclusive bounds.
#[derive(Debug, Clone)]
pub struct IntegerField {
	pub name: String,
	pub min_value: Option<i64>,
	pub max_value: Option<i64>,
}

impl IntegerField {
	/// Integer fields are always required.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			min_value: None,
			max_value: None,
		}
	}

	pub fn with_range(mut self, min: i64, max: i64) -> Self {
		self.min_value = Some(min);
		self.max_value = Some(max);
		self
	}

	pub fn clean(&self, value: Option<&str>) -> FieldResult<i64> {
		let raw = value.map(str::trim).unwrap_or("");
		if raw.is_empty() {
			return Err(FieldError::Required(self.name.clone()));
		}

		let number: i64 = raw
			.parse()
			.map_err(|_| FieldError::Validation("Enter a whole number.".to_string()))?;

		if let Some(min) = self.min_value
			&& number < min
		{
			return Err(FieldError::Validation(format!(
				"Ensure this value is greater than or equal to {}.",
				min
			)));
		}
		if let Some(max) = self.max_value
			&& number > max
		{
			return Err(FieldError::Validation(format!(
				"Ensure this value is less than or equal to {}.",
				max
			)));
		}

		Ok(number)
	}
}

/// Checkbox.
#[derive(Debug, Clone)]
pub struct BooleanField {
	pub name: String,
	/// A required checkbox must be ticked
	pub required: bool,
}

impl BooleanField {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			required: false,
		}
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn clean(&self, value: Option<&str>) -> FieldResult<bool> {
		let checked = matches!(
			value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
			Some("on" | "true" | "1" | "yes")
		);
		if self.required && !checked {
			return Err(FieldError::Required(self.name.clone()));
		}
		Ok(checked)
	}
}

/// One value out of a fixed set.
#[derive(Debug, Clone)]
pub struct ChoiceField {
	pub name: String,
	pub choices: Vec<(String, String)>,
}

impl ChoiceField {
	/// `choices` are `(value, label)` pairs.
	pub fn new(name: impl Into<String>, choices: &[(&str, &str)]) -> Self {
		Self {
			name: name.into(),
			choices: choices
				.iter()
				.map(|(value, label)| (value.to_string(), label.to_string()))
				.collect(),
		}
	}

	pub fn clean(&self, value: Option<&str>) -> FieldResult<String> {
		let raw = value.map(str::trim).unwrap_or("");
		if raw.is_empty() {
			return Err(FieldError::Required(self.name.clone()));
		}
		if self.choices.iter().any(|(v, _)| v == raw) {
			Ok(raw.to_string())
		} else {
			Err(FieldError::Validation(format!(
				"Select a valid choice. {} is not one of the available choices.",
				raw
			)))
		}
	}
}
