//! Local file system storage backend implementation.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::config::LocalConfig;
use crate::{Result, StorageBackend, StorageError};

/// Stores files below a base directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
	base_path: PathBuf,
	base_url: String,
}

impl LocalStorage {
	/// Use an existing directory.
	pub fn new(config: LocalConfig) -> Result<Self> {
		if !config.base_path.exists() {
			return Err(StorageError::ConfigError(format!(
				"Base path does not exist: {}",
				config.base_path.display()
			)));
		}

		if !config.base_path.is_dir() {
			return Err(StorageError::ConfigError(format!(
				"Base path is not a directory: {}",
				config.base_path.display()
			)));
		}

		Ok(Self {
			base_path: config.base_path,
			base_url: normalize_base_url(&config.base_url),
		})
	}

	/// Like [`new`](Self::new), creating the directory first when missing.
	pub async fn create(config: LocalConfig) -> Result<Self> {
		fs::create_dir_all(&config.base_path).await?;
		Self::new(config)
	}

	pub fn base_path(&self) -> &Path {
		&self.base_path
	}

	/// Resolve `name` below the base directory, refusing anything that could escape it.
	fn get_path(&self, name: &str) -> Result<PathBuf> {
		let relative = Path::new(name);
		let safe = !name.is_empty()
			&& relative
				.components()
				.all(|component| matches!(component, Component::Normal(_)));
		if !safe {
			return Err(StorageError::InvalidName(name.to_string()));
		}
		Ok(self.base_path.join(relative))
	}
}

fn normalize_base_url(base_url: &str) -> String {
	if base_url.ends_with('/') {
		base_url.to_string()
	} else {
		format!("{}/", base_url)
	}
}

#[async_trait]
impl StorageBackend for LocalStorage {
	async fn save(&self, name: &str, content: &[u8]) -> Result<String> {
		let path = self.get_path(name)?;

		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).await?;
		}

		fs::write(&path, content).await?;
		tracing::debug!(name, bytes = content.len(), "stored file");

		Ok(name.to_string())
	}

	async fn open(&self, name: &str) -> Result<Vec<u8>> {
		let path = self.get_path(name)?;

		if !path.is_file() {
			return Err(StorageError::NotFound(name.to_string()));
		}

		Ok(fs::read(&path).await?)
	}

	async fn delete(&self, name: &str) -> Result<()> {
		let path = self.get_path(name)?;

		if !path.is_file() {
			return Err(StorageError::NotFound(name.to_string()));
		}

		fs::remove_file(&path).await?;
		Ok(())
	}

	async fn exists(&self, name: &str) -> Result<bool> {
		let path = self.get_path(name)?;
		Ok(path.is_file())
	}

	fn url(&self, name: &str) -> String {
		format!("{}{}", self.base_url, name.trim_start_matches('/'))
	}

	async fn size(&self, name: &str) -> Result<u64> {
		let path = self.get_path(name)?;

		if !path.is_file() {
			return Err(StorageError::NotFound(name.to_string()));
		}

		Ok(fs::metadata(&path).await?.len())
	}
}
