//! Storage configuration.

use std::path::PathBuf;

/// Settings for [`LocalStorage`](crate::LocalStorage).
#[derive(Debug, Clone)]
pub struct LocalConfig {
	/// Directory files are stored under
	pub base_path: PathBuf,
	/// URL prefix files are served from, e.g. `/media/`
	pub base_url: String,
}

impl LocalConfig {
	pub fn new(base_path: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
		Self {
			base_path: base_path.into(),
			base_url: base_url.into(),
		}
	}
}
