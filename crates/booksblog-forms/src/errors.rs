//! Collected validation errors of a whole form.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::field::FieldResult;

/// Field errors keyed by field name, plus errors about the form as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
	fields: BTreeMap<String, Vec<String>>,
	non_field: Vec<String>,
}

impl FormErrors {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
		self.fields
			.entry(field.into())
			.or_default()
			.push(message.into());
	}

	pub fn add_non_field(&mut self, message: impl Into<String>) {
		self.non_field.push(message.into());
	}

	/// Record the error of `result` under `field`, returning the cleaned value on success.
	pub fn capture<T>(&mut self, field: &str, result: FieldResult<T>) -> Option<T> {
		match result {
			Ok(value) => Some(value),
			Err(err) => {
				self.add(field, err.to_string());
				None
			}
		}
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty() && self.non_field.is_empty()
	}

	pub fn has_field(&self, field: &str) -> bool {
		self.fields.contains_key(field)
	}

	pub fn field(&self, field: &str) -> &[String] {
		self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn non_field(&self) -> &[String] {
		&self.non_field
	}

	/// `Ok(value)` when nothing was recorded, otherwise the errors.
	pub fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
		if self.is_empty() { Ok(value) } else { Err(self) }
	}
}

impl std::fmt::Display for FormErrors {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut parts: Vec<String> = self
			.fields
			.iter()
			.flat_map(|(name, messages)| messages.iter().map(move |m| format!("{}: {}", name, m)))
			.collect();
		parts.extend(self.non_field.iter().cloned());
		write!(f, "{}", parts.join("; "))
	}
}
