//! Media storage for booksblog.
//!
//! - [`StorageBackend`]: async file storage addressed by relative names
//! - [`LocalStorage`]: the filesystem implementation used for uploads
//! - [`ImageNormalizer`]: shrinks uploaded images to fit a bounding box
//!
//! ## Example
//!
//! ```rust,no_run
//! use booksblog_storages::{ImageNormalizer, LocalConfig, LocalStorage, StorageBackend};
//!
//! # async fn example(upload: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let storage = LocalStorage::create(LocalConfig::new("media", "/media/")).await?;
//! let image = ImageNormalizer::new(800, 800).normalize(&upload)?;
//!
//! let name = format!("tickets/cover.{}", image.extension());
//! storage.save(&name, &image.data).await?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod local;
pub mod normalize;

pub use backend::StorageBackend;
pub use config::LocalConfig;
pub use error::{Result, StorageError};
pub use local::LocalStorage;
pub use normalize::{ImageError, ImageNormalizer, NormalizedImage};
