//! Storage backend trait definition.

use crate::Result;
use async_trait::async_trait;

/// File storage addressed by `/`-separated relative names.
#[async_trait]
pub trait StorageBackend: Send + Sync {
	/// Store `content` under `name`, replacing any existing file. Returns the stored name.
	async fn save(&self, name: &str, content: &[u8]) -> Result<String>;

	async fn open(&self, name: &str) -> Result<Vec<u8>>;

	async fn delete(&self, name: &str) -> Result<()>;

	async fn exists(&self, name: &str) -> Result<bool>;

	/// Public URL under which `name` is served.
	fn url(&self, name: &str) -> String;

	async fn size(&self, name: &str) -> Result<u64>;
}
