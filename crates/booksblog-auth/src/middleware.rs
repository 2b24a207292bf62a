use async_trait::async_trait;
use booksblog_core::exception::Result;
use booksblog_http::{AuthState, Handler, Middleware, Request, Response};
use std::sync::Arc;

use crate::sessions::DatabaseSessionBackend;

/// Resolves the session cookie into an [`AuthState`] extension.
///
/// Requests without a cookie, or with a cookie naming an unknown or expired
/// session, continue anonymously; in the latter case the stale cookie is
/// cleared on the way out.
pub struct SessionMiddleware {
	backend: DatabaseSessionBackend,
}

impl SessionMiddleware {
	pub fn new(backend: DatabaseSessionBackend) -> Self {
		Self { backend }
	}
}

#[async_trait]
impl Middleware for SessionMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let Some(session_key) = request.cookie(&self.backend.config().cookie_name) else {
			return next.handle(request).await;
		};

		match self.backend.load(&session_key).await? {
			Some(session) => {
				request
					.extensions
					.insert(AuthState::authenticated(session.user_id, session.session_key));
				next.handle(request).await
			}
			None => {
				tracing::debug!("ignoring stale session cookie");
				let response = next.handle(request).await?;
				if response.headers.contains_key("set-cookie") {
					return Ok(response);
				}
				Ok(response.with_cookie(self.backend.removal_cookie()))
			}
		}
	}
}
