//! View decorators for authentication

use booksblog_core::exception::Result;
use booksblog_http::{AuthState, Handler, Request, Response, handler_fn};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::future::Future;
use std::sync::Arc;

use super::models::User;
use crate::config::AppContext;

pub const LOGIN_URL: &str = "/";
pub const LOGIN_REDIRECT_URL: &str = "/home/";

// Characters kept readable in the `next` query value.
const NEXT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'/')
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'~');

/// The user of the session attached by the session middleware.
pub async fn current_user(ctx: &AppContext, request: &Request) -> Result<Option<User>> {
	let Some(state) = AuthState::from_request(request) else {
		return Ok(None);
	};
	Ok(User::get(ctx.db.pool(), state.user_id).await?)
}

/// Bind a view that needs a logged-in user.
///
/// Anonymous requests are redirected to the login page with the requested
/// path in `next`; the view receives the resolved [`User`].
pub fn login_required<F, Fut>(ctx: &Arc<AppContext>, view: F) -> Arc<dyn Handler>
where
	F: Fn(Arc<AppContext>, Request, User) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<Response>> + Send + 'static,
{
	let ctx = ctx.clone();
	let view = Arc::new(view);
	handler_fn(move |request: Request| {
		let ctx = ctx.clone();
		let view = view.clone();
		async move {
			match current_user(&ctx, &request).await? {
				Some(user) => (*view)(ctx, request, user).await,
				None => Ok(redirect_to_login(&request)),
			}
		}
	})
}

/// `302` to the login page, remembering where the user was going.
pub fn redirect_to_login(request: &Request) -> Response {
	let next = utf8_percent_encode(&request.full_path(), NEXT_ENCODE_SET).to_string();
	Response::redirect(format!("{}?next={}", LOGIN_URL, next))
}

/// Where to go after login: `next` when it stays on this site, else the feed.
pub fn success_url(next: Option<&str>) -> String {
	match next {
		Some(next) if is_safe_next(next) => next.to_string(),
		_ => LOGIN_REDIRECT_URL.to_string(),
	}
}

/// A local absolute path: starts with a single `/` and has no backslash.
pub fn is_safe_next(next: &str) -> bool {
	next.starts_with('/') && !next.starts_with("//") && !next.contains('\\')
}
