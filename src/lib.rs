//! # booksblog
//!
//! A book review community. Users post *tickets* (a book they reviewed, or
//! a request for reviews), answer tickets with *reviews* rated 0 to 5,
//! follow each other and read a feed merging everything posted by the
//! people they follow.
//!
//! The workspace follows a Django-like layout: member crates under
//! `crates/` provide the framework pieces (HTTP types, routing, sessions,
//! forms, storage, templates, settings) and this crate wires the two apps,
//! `accounts` and `blog`, on top of them.
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use booksblog::config::{AppContext, build_application};
//! use booksblog::conf::Settings;
//! use booksblog::server::{HttpServer, ShutdownCoordinator};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load()?;
//! let ctx = Arc::new(AppContext::from_settings(settings).await?);
//! ctx.db.migrate().await?;
//!
//! let listener = tokio::net::TcpListener::bind(ctx.settings.bind_address).await?;
//! let server = HttpServer::new(build_application(ctx.clone())?);
//! server.listen_with_shutdown(listener, ShutdownCoordinator::new()).await?;
//! # Ok(())
//! # }
//! ```

pub mod apps;
pub mod config;
pub mod shortcuts;

#[cfg(test)]
pub mod test_utils;

pub use booksblog_core::exception::{Error, Result};

pub mod conf {
	//! Settings
	pub use booksblog_conf::*;
}

pub mod http {
	//! Request, response, handler and middleware types
	pub use booksblog_http::*;
}

pub mod urls {
	//! Routing
	pub use booksblog_urls::*;
}

pub mod server {
	//! HTTP server and its middleware
	pub use booksblog_server::*;
}

pub mod db {
	//! Database connection and migrations
	pub use booksblog_db::*;
}

pub mod auth {
	//! Password hashing and sessions
	pub use booksblog_auth::*;
}

pub mod forms {
	//! Form fields and error collection
	pub use booksblog_forms::*;
}

pub mod storages {
	//! File storage and image normalization
	pub use booksblog_storages::*;
}

pub mod template {
	//! Template rendering
	pub use booksblog_template::*;
}
