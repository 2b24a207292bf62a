//! Path patterns with `{name}` placeholders.

use booksblog_core::exception::{Error, Result};
use regex::Regex;
use std::collections::HashMap;

/// A compiled route path such as `/review/{review_id}/edit/`.
#[derive(Debug, Clone)]
pub struct PathPattern {
	regex: Regex,
	param_names: Vec<String>,
}

impl PathPattern {
	/// Compile `pattern`. Placeholder names must be identifiers and unique.
	pub fn new(pattern: impl Into<String>) -> Result<Self> {
		let pattern = pattern.into();
		if !pattern.starts_with('/') {
			return Err(Error::ImproperlyConfigured(format!(
				"Path pattern must start with '/': {}",
				pattern
			)));
		}

		let mut regex_src = String::from("^");
		let mut param_names = Vec::new();
		let mut rest = pattern.as_str();

		while let Some(open) = rest.find('{') {
			regex_src.push_str(&regex::escape(&rest[..open]));
			let close = rest[open..].find('}').ok_or_else(|| {
				Error::ImproperlyConfigured(format!("Unclosed placeholder in {}", pattern))
			})? + open;
			let name = &rest[open + 1..close];

			let valid = !name.is_empty()
				&& name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
				&& !name.starts_with(|c: char| c.is_ascii_digit());
			if !valid || param_names.iter().any(|n| n == name) {
				return Err(Error::ImproperlyConfigured(format!(
					"Invalid placeholder '{}' in {}",
					name, pattern
				)));
			}

			regex_src.push_str(&format!("(?P<{}>[^/]+)", name));
			param_names.push(name.to_string());
			rest = &rest[close + 1..];
		}
		regex_src.push_str(&regex::escape(rest));
		regex_src.push('$');

		let regex = Regex::new(&regex_src)
			.map_err(|e| Error::ImproperlyConfigured(format!("Bad pattern {}: {}", pattern, e)))?;

		Ok(Self { regex, param_names })
	}

	/// Captured parameters when `path` matches the whole pattern.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		let captures = self.regex.captures(path)?;
		Some(
			self.param_names
				.iter()
				.filter_map(|name| {
					captures
						.name(name)
						.map(|m| (name.clone(), m.as_str().to_string()))
				})
				.collect(),
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/home/", "/home/", true)]
	#[case("/home/", "/home", false)]
	#[case("/ticket/{ticket_id}/edit/", "/ticket/12/edit/", true)]
	#[case("/ticket/{ticket_id}/edit/", "/ticket/12/13/edit/", false)]
	#[case("/ticket/{ticket_id}/edit/", "/ticket//edit/", false)]
	fn test_matching(#[case] pattern: &str, #[case] path: &str, #[case] expected: bool) {
		let pattern = PathPattern::new(pattern).unwrap();
		assert_eq!(pattern.matches(path).is_some(), expected);
	}

	#[rstest]
	fn test_captures_parameters() {
		let pattern = PathPattern::new("/media/{dir}/{file}").unwrap();
		let params = pattern.matches("/media/tickets/a.png").unwrap();

		assert_eq!(params.get("dir").map(String::as_str), Some("tickets"));
		assert_eq!(params.get("file").map(String::as_str), Some("a.png"));
	}

	#[rstest]
	fn test_literal_segments_are_escaped() {
		let pattern = PathPattern::new("/a.b/").unwrap();
		assert!(pattern.matches("/a.b/").is_some());
		assert!(pattern.matches("/axb/").is_none());
	}

	#[rstest]
	#[case("home/")]
	#[case("/ticket/{id/")]
	#[case("/ticket/{1id}/")]
	#[case("/x/{id}/{id}/")]
	fn test_invalid_patterns(#[case] pattern: &str) {
		assert!(PathPattern::new(pattern).is_err());
	}
}
