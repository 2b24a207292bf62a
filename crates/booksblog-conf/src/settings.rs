//! Settings struct and its layered loading

use crate::env::{Env, EnvError};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit settings file.
pub const SETTINGS_FILE_VAR: &str = "BOOKSBLOG_SETTINGS_FILE";

/// Ten years.
pub const MAX_SESSION_AGE_SECS: i64 = 10 * 365 * 24 * 60 * 60;

const ENV_PREFIX: &str = "BOOKSBLOG_";
const DEFAULT_SETTINGS_FILE: &str = "booksblog.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("Failed to read settings file {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Invalid settings file {path}: {source}")]
	Toml {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error(transparent)]
	Env(#[from] EnvError),

	#[error("Invalid setting {name}: {reason}")]
	Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
	/// Serves `/media/` and shows error details when set
	pub debug: bool,
	pub bind_address: SocketAddr,
	pub database_url: String,
	pub media_root: PathBuf,
	pub media_url: String,
	pub session_cookie_name: String,
	pub session_age_secs: i64,
	pub feed_page_size: u32,
	pub image_max_width: u32,
	pub image_max_height: u32,
	/// `EnvFilter` directive used when `RUST_LOG` is unset
	pub log_filter: String,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			debug: true,
			bind_address: SocketAddr::from(([127, 0, 0, 1], 8000)),
			database_url: "sqlite:db.sqlite3".to_string(),
			media_root: PathBuf::from("media"),
			media_url: "/media/".to_string(),
			session_cookie_name: "sessionid".to_string(),
			session_age_secs: 60 * 60 * 24 * 14,
			feed_page_size: 20,
			image_max_width: 800,
			image_max_height: 800,
			log_filter: "info".to_string(),
		}
	}
}

impl Settings {
	/// Defaults, then the settings file, then `BOOKSBLOG_*` variables.
	///
	/// The file is `$BOOKSBLOG_SETTINGS_FILE` when set (it must exist),
	/// otherwise `booksblog.toml` in the working directory if there is one.
	pub fn load() -> Result<Self, SettingsError> {
		let env = Env::new().with_prefix(ENV_PREFIX);

		let mut settings = match env.str("SETTINGS_FILE")? {
			Some(path) => Self::from_file(path)?,
			None if Path::new(DEFAULT_SETTINGS_FILE).is_file() => {
				Self::from_file(DEFAULT_SETTINGS_FILE)?
			}
			None => Self::default(),
		};

		settings.apply_env(&env)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Defaults overlaid with the keys present in a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let settings = toml::from_str(&content).map_err(|source| SettingsError::Toml {
			path: path.to_path_buf(),
			source,
		})?;
		tracing::debug!(path = %path.display(), "loaded settings file");
		Ok(settings)
	}

	/// Override fields from environment variables named `<prefix><FIELD>`.
	pub fn apply_env(&mut self, env: &Env) -> Result<(), SettingsError> {
		if let Some(value) = env.bool("DEBUG")? {
			self.debug = value;
		}
		if let Some(value) = env.parse("BIND_ADDRESS")? {
			self.bind_address = value;
		}
		if let Some(value) = env.str("DATABASE_URL")? {
			self.database_url = value;
		}
		if let Some(value) = env.str("MEDIA_ROOT")? {
			self.media_root = PathBuf::from(value);
		}
		if let Some(value) = env.str("MEDIA_URL")? {
			self.media_url = value;
		}
		if let Some(value) = env.str("SESSION_COOKIE_NAME")? {
			self.session_cookie_name = value;
		}
		if let Some(value) = env.parse("SESSION_AGE_SECS")? {
			self.session_age_secs = value;
		}
		if let Some(value) = env.parse("FEED_PAGE_SIZE")? {
			self.feed_page_size = value;
		}
		if let Some(value) = env.parse("IMAGE_MAX_WIDTH")? {
			self.image_max_width = value;
		}
		if let Some(value) = env.parse("IMAGE_MAX_HEIGHT")? {
			self.image_max_height = value;
		}
		if let Some(value) = env.str("LOG_FILTER")? {
			self.log_filter = value;
		}
		Ok(())
	}

	pub fn validate(&self) -> Result<(), SettingsError> {
		fn invalid(name: &'static str, reason: &str) -> SettingsError {
			SettingsError::Invalid {
				name,
				reason: reason.to_string(),
			}
		}

		if self.database_url.trim().is_empty() {
			return Err(invalid("database_url", "must not be empty"));
		}
		if !self.media_url.starts_with('/') || !self.media_url.ends_with('/') {
			return Err(invalid("media_url", "must start and end with '/'"));
		}
		if self.session_cookie_name.is_empty()
			|| !self
				.session_cookie_name
				.chars()
				.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
		{
			return Err(invalid(
				"session_cookie_name",
				"must be a non-empty token of letters, digits, '_' or '-'",
			));
		}
		if self.session_age_secs <= 0 || self.session_age_secs > MAX_SESSION_AGE_SECS {
			return Err(invalid(
				"session_age_secs",
				"must be positive and at most ten years",
			));
		}
		if self.feed_page_size == 0 {
			return Err(invalid("feed_page_size", "must be positive"));
		}
		if self.image_max_width == 0 || self.image_max_height == 0 {
			return Err(invalid("image_max_width/image_max_height", "must be positive"));
		}
		Ok(())
	}
}
