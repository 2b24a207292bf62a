//! Tera-based page rendering
//!
//! Templates are registered once at startup from raw strings (typically
//! `include_str!`) and rendered with any `Serialize` context. Templates
//! whose name ends in `.html` are auto-escaped.
//!
//! # Examples
//!
//! ```rust
//! use booksblog_template::TeraRenderer;
//! use serde_json::json;
//!
//! let renderer = TeraRenderer::from_raw_templates(&[
//!     ("base.html", "<title>{% block title %}{% endblock %}</title>"),
//!     ("home.html", "{% extends \"base.html\" %}{% block title %}{{ name }}{% endblock %}"),
//! ])
//! .unwrap();
//!
//! let html = renderer.render_template("home.html", &json!({ "name": "<b>Feed</b>" })).unwrap();
//! assert_eq!(html, "<title>&lt;b&gt;Feed&lt;&#x2F;b&gt;</title>");
//! ```

use booksblog_http::Response;
use serde::Serialize;
use std::error::Error as _;
use tera::{Context, Tera};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
	#[error("Failed to load templates: {0}")]
	Load(String),

	#[error("Failed to create context: {0}")]
	Context(String),

	#[error("Failed to render {name}: {message}")]
	Render { name: String, message: String },
}

impl From<TemplateError> for booksblog_core::Error {
	fn from(err: TemplateError) -> Self {
		booksblog_core::Error::Template(err.to_string())
	}
}

/// Tera error with its causes, which carry the useful part of the message.
fn describe(err: &tera::Error) -> String {
	let mut message = err.to_string();
	let mut source = err.source();
	while let Some(cause) = source {
		message.push_str(": ");
		message.push_str(&cause.to_string());
		source = cause.source();
	}
	message
}

pub struct TeraRenderer {
	tera: Tera,
}

impl TeraRenderer {
	/// Register `(name, source)` pairs. Inheritance between them is resolved here.
	pub fn from_raw_templates(templates: &[(&str, &str)]) -> Result<Self, TemplateError> {
		let mut tera = Tera::default();
		tera.add_raw_templates(templates.iter().copied())
			.map_err(|e| TemplateError::Load(describe(&e)))?;
		Ok(Self { tera })
	}

	pub fn has_template(&self, name: &str) -> bool {
		self.tera.get_template_names().any(|n| n == name)
	}

	pub fn render_template<T: Serialize>(
		&self,
		template_name: &str,
		context: &T,
	) -> Result<String, TemplateError> {
		let ctx =
			Context::from_serialize(context).map_err(|e| TemplateError::Context(describe(&e)))?;

		self.tera
			.render(template_name, &ctx)
			.map_err(|e| TemplateError::Render {
				name: template_name.to_string(),
				message: describe(&e),
			})
	}

	/// Render into a `200 OK` HTML response.
	pub fn render_response<T: Serialize>(
		&self,
		template_name: &str,
		context: &T,
	) -> booksblog_core::Result<Response> {
		let html = self.render_template(template_name, context)?;
		Ok(Response::html(html))
	}
}

impl std::fmt::Debug for TeraRenderer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let names: Vec<&str> = self.tera.get_template_names().collect();
		f.debug_struct("TeraRenderer").field("templates", &names).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_render_response() {
		let renderer =
			TeraRenderer::from_raw_templates(&[("hello.html", "Hello {{ name }}!")]).unwrap();

		let response = renderer
			.render_response("hello.html", &json!({ "name": "Alice" }))
			.unwrap();

		assert_eq!(response.text(), "Hello Alice!");
		assert!(renderer.has_template("hello.html"));
	}

	#[rstest]
	fn test_missing_variable_is_a_render_error() {
		let renderer =
			TeraRenderer::from_raw_templates(&[("hello.html", "Hello {{ name }}!")]).unwrap();

		let result = renderer.render_template("hello.html", &json!({}));
		assert!(matches!(result, Err(TemplateError::Render { .. })));
	}

	#[rstest]
	fn test_broken_template_fails_to_load() {
		let result = TeraRenderer::from_raw_templates(&[("bad.html", "{% if %}")]);
		assert!(matches!(result, Err(TemplateError::Load(_))));
	}

	#[rstest]
	fn test_non_object_context_is_rejected() {
		let renderer = TeraRenderer::from_raw_templates(&[("a.html", "x")]).unwrap();
		assert!(matches!(
			renderer.render_template("a.html", &json!([1, 2])),
			Err(TemplateError::Context(_))
		));
	}
}
