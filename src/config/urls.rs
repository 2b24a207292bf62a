//! URL configuration for the booksblog project
//!
//! `url_patterns` mounts every app's routes; `build_application` wraps the
//! router in the middleware stack.

use booksblog_auth::SessionMiddleware;
use booksblog_core::exception::Result;
use booksblog_http::{Handler, Method, MiddlewareChain};
use booksblog_server::LoggingMiddleware;
use booksblog_urls::{DefaultRouter, Route, Router};
use std::sync::Arc;

use super::context::AppContext;
use super::views;
use crate::apps;
use crate::shortcuts::view;

pub fn url_patterns(ctx: &Arc<AppContext>) -> Result<DefaultRouter> {
	let mut router = DefaultRouter::new();

	router.mount("/", apps::accounts::urls::url_patterns(ctx))?;
	router.mount("/", apps::blog::urls::url_patterns(ctx))?;

	// Uploaded images are served by the front web server outside debug.
	if ctx.settings.debug {
		router.add_route(
			Route::new(
				format!("{}tickets/{{file_name}}", ctx.settings.media_url),
				view(ctx, views::serve_media),
			)
			.with_name("media")
			.with_methods([Method::GET]),
		)?;
	}

	Ok(router)
}

/// Router behind request logging (outermost) and session loading.
pub fn build_application(ctx: Arc<AppContext>) -> Result<Arc<dyn Handler>> {
	let router = url_patterns(&ctx)?;

	let chain = MiddlewareChain::new(Arc::new(router))
		.with_middleware(Arc::new(LoggingMiddleware::new()))
		.with_middleware(Arc::new(SessionMiddleware::new(ctx.sessions.clone())));

	Ok(Arc::new(chain))
}
