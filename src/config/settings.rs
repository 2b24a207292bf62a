//! Settings entry point

use booksblog_conf::{Settings, SettingsError};

/// Load settings from defaults, `booksblog.toml` (or `$BOOKSBLOG_SETTINGS_FILE`)
/// and `BOOKSBLOG_*` environment variables, in increasing priority.
pub fn get_settings() -> Result<Settings, SettingsError> {
	let settings = Settings::load()?;
	tracing::debug!(
		debug = settings.debug,
		database_url = %settings.database_url,
		media_root = %settings.media_root.display(),
		"settings loaded"
	);
	Ok(settings)
}
