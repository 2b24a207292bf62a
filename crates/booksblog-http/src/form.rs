//! Submitted HTML form bodies.
//!
//! [`FormData`] holds the text fields and uploaded files of a request body
//! encoded either as `application/x-www-form-urlencoded` or as
//! `multipart/form-data`. Typed validation happens in the forms crate;
//! this module only decodes.

use bytes::Bytes;
use futures::future::ready;
use futures::stream::once;
use std::collections::HashMap;

use crate::{Error, Result};

/// Upper bound for a form body, uploads included.
pub const MAX_FORM_BODY_SIZE: usize = 10 * 1024 * 1024;

/// A file sent through a `multipart/form-data` file input.
#[derive(Debug, Clone)]
pub struct UploadedFile {
	pub field_name: String,
	pub file_name: String,
	pub content_type: Option<String>,
	pub data: Bytes,
}

impl UploadedFile {
	/// Extension of the client-side file name, lowercased.
	pub fn extension(&self) -> Option<String> {
		self.file_name
			.rsplit_once('.')
			.map(|(_, ext)| ext.to_ascii_lowercase())
			.filter(|ext| !ext.is_empty())
	}
}

/// Decoded form fields and files.
#[derive(Debug, Clone, Default)]
pub struct FormData {
	fields: HashMap<String, Vec<String>>,
	files: HashMap<String, UploadedFile>,
}

impl FormData {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a text value; repeated names keep every value in order.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.fields
			.entry(name.into())
			.or_default()
			.push(value.into());
	}

	pub fn insert_file(&mut self, file: UploadedFile) {
		self.files.insert(file.field_name.clone(), file);
	}

	/// First value submitted for `name`.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.fields
			.get(name)
			.and_then(|values| values.first())
			.map(String::as_str)
	}

	pub fn get_all(&self, name: &str) -> &[String] {
		self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn contains(&self, name: &str) -> bool {
		self.fields.contains_key(name)
	}

	/// Checkbox semantics: present with a truthy value.
	///
	/// ```
	/// use booksblog_http::FormData;
	///
	/// let form = FormData::from_urlencoded(b"image-clear=on&confirm_delete=false").unwrap();
	/// assert!(form.is_checked("image-clear"));
	/// assert!(!form.is_checked("confirm_delete"));
	/// assert!(!form.is_checked("missing"));
	/// ```
	pub fn is_checked(&self, name: &str) -> bool {
		matches!(
			self.get(name).map(|v| v.trim().to_ascii_lowercase()).as_deref(),
			Some("on" | "true" | "1" | "yes")
		)
	}

	/// Uploaded file for `name`. Empty file inputs are never recorded.
	pub fn file(&self, name: &str) -> Option<&UploadedFile> {
		self.files.get(name)
	}

	/// Decode an `application/x-www-form-urlencoded` body.
	pub fn from_urlencoded(body: &[u8]) -> Result<Self> {
		if body.len() > MAX_FORM_BODY_SIZE {
			return Err(Error::Http(format!(
				"Form body too large: {} bytes exceeds {} bytes",
				body.len(),
				MAX_FORM_BODY_SIZE
			)));
		}

		let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
			.map_err(|e| Error::Http(format!("Failed to parse form body: {}", e)))?;

		let mut form = Self::new();
		for (name, value) in pairs {
			form.insert(name, value);
		}
		Ok(form)
	}

	/// Decode a `multipart/form-data` body. `content_type` must carry the boundary.
	pub async fn from_multipart(content_type: &str, body: Bytes) -> Result<Self> {
		let boundary = multer::parse_boundary(content_type)
			.map_err(|e| Error::Http(format!("Failed to parse boundary: {}", e)))?;

		if body.len() > MAX_FORM_BODY_SIZE {
			return Err(Error::Http(format!(
				"Form body too large: {} bytes exceeds {} bytes",
				body.len(),
				MAX_FORM_BODY_SIZE
			)));
		}

		let stream = once(ready(Ok::<_, std::io::Error>(body)));
		let mut multipart = multer::Multipart::new(stream, boundary);
		let mut form = Self::new();

		while let Some(field) = multipart
			.next_field()
			.await
			.map_err(|e| Error::Http(format!("Failed to read multipart field: {}", e)))?
		{
			let name = field
				.name()
				.ok_or_else(|| Error::Http("Field name missing".to_string()))?
				.to_string();

			match field.file_name().map(str::to_string) {
				Some(file_name) => {
					let content_type = field.content_type().map(|m| m.to_string());
					let data = field.bytes().await.map_err(|e| {
						Error::Http(format!("Failed to read file field: {}", e))
					})?;
					// Browsers submit untouched file inputs as an empty part.
					if file_name.is_empty() && data.is_empty() {
						continue;
					}
					form.insert_file(UploadedFile {
						field_name: name,
						file_name,
						content_type,
						data,
					});
				}
				None => {
					let text = field.text().await.map_err(|e| {
						Error::Http(format!("Failed to read text field: {}", e))
					})?;
					form.insert(name, text);
				}
			}
		}

		tracing::debug!(
			fields = form.fields.len(),
			files = form.files.len(),
			"parsed multipart form"
		);
		Ok(form)
	}
}
