//! Project settings.
//!
//! [`Settings::load`] starts from built-in defaults, overlays an optional
//! TOML file and finally `BOOKSBLOG_*` environment variables:
//!
//! ```toml
//! debug = false
//! bind_address = "0.0.0.0:8000"
//! database_url = "sqlite:/var/lib/booksblog/db.sqlite3"
//! media_root = "/var/lib/booksblog/media"
//! ```
//!
//! ```bash
//! BOOKSBLOG_DEBUG=false BOOKSBLOG_FEED_PAGE_SIZE=50 manage runserver
//! ```

pub mod env;
pub mod settings;

pub use env::{Env, EnvError, parse_bool};
pub use settings::{MAX_SESSION_AGE_SECS, SETTINGS_FILE_VAR, Settings, SettingsError};
