//! Shared application state handed to every view.

use booksblog_auth::{Argon2Hasher, DatabaseSessionBackend, PasswordHasher, SessionConfig};
use booksblog_conf::Settings;
use booksblog_core::exception::{Error, Result};
use booksblog_db::{DatabaseConfig, DatabaseConnection};
use booksblog_storages::{ImageNormalizer, LocalConfig, LocalStorage, StorageBackend};
use booksblog_template::TeraRenderer;
use std::sync::Arc;

use super::templates;

/// Everything a view needs besides the request.
///
/// Built once at startup and shared as `Arc<AppContext>`. All members are
/// immutable or internally synchronized.
pub struct AppContext {
	pub settings: Settings,
	pub db: DatabaseConnection,
	pub sessions: DatabaseSessionBackend,
	pub storage: Arc<dyn StorageBackend>,
	pub templates: TeraRenderer,
	pub hasher: Arc<dyn PasswordHasher>,
	pub normalizer: ImageNormalizer,
}

impl AppContext {
	/// Connect the database and media storage named by `settings`.
	pub async fn from_settings(settings: Settings) -> Result<Self> {
		let db = DatabaseConnection::connect(&DatabaseConfig::new(&settings.database_url)).await?;
		let storage = LocalStorage::create(LocalConfig::new(
			&settings.media_root,
			&settings.media_url,
		))
		.await?;
		Self::new(settings, db, Arc::new(storage))
	}

	pub fn new(
		settings: Settings,
		db: DatabaseConnection,
		storage: Arc<dyn StorageBackend>,
	) -> Result<Self> {
		let sessions = DatabaseSessionBackend::new(db.clone(), session_config(&settings)?);
		let normalizer = ImageNormalizer::new(settings.image_max_width, settings.image_max_height);

		Ok(Self {
			templates: templates::renderer()?,
			hasher: Arc::new(Argon2Hasher::new()),
			settings,
			db,
			sessions,
			storage,
			normalizer,
		})
	}
}

fn session_config(settings: &Settings) -> Result<SessionConfig> {
	let max_age = chrono::Duration::try_seconds(settings.session_age_secs).ok_or_else(|| {
		Error::ImproperlyConfigured(format!(
			"session_age_secs {} is out of range",
			settings.session_age_secs
		))
	})?;
	Ok(SessionConfig {
		cookie_name: settings.session_cookie_name.clone(),
		max_age,
		..SessionConfig::default()
	})
}

impl std::fmt::Debug for AppContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AppContext")
			.field("settings", &self.settings)
			.field("db", &self.db)
			.field("templates", &self.templates)
			.field("normalizer", &self.normalizer)
			.finish_non_exhaustive()
	}
}
