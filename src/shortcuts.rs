//! Shortcuts used by views: binding views to the application context,
//! rendering pages and redirecting.

use booksblog_core::exception::{Error, Result};
use booksblog_http::{AuthState, FormData, Handler, Request, Response, handler_fn};
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;

use crate::apps::accounts::models::User;
use crate::config::AppContext;

/// Bind a view function to the application context.
///
/// ```rust,ignore
/// Route::new("/signup/", view(ctx, views::signup))
/// ```
pub fn view<F, Fut>(ctx: &Arc<AppContext>, view: F) -> Arc<dyn Handler>
where
	F: Fn(Arc<AppContext>, Request) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<Response>> + Send + 'static,
{
	let ctx = ctx.clone();
	handler_fn(move |request| view(ctx.clone(), request))
}

/// `302 Found` to `location`.
pub fn redirect(location: &str) -> Response {
	Response::redirect(location)
}

/// Render `template_name` as a full page.
///
/// Besides `context` (which must be a JSON object), every page sees
/// `user` (when logged in), `media_url`, and `flash`, the pending session
/// message, which is consumed by this render.
pub async fn render(
	ctx: &AppContext,
	request: &Request,
	user: Option<&User>,
	template_name: &str,
	context: Value,
) -> Result<Response> {
	let Value::Object(mut context) = context else {
		return Err(Error::Template(format!(
			"Context of {} must be an object",
			template_name
		)));
	};

	context.insert(
		"media_url".to_string(),
		Value::String(ctx.settings.media_url.clone()),
	);

	if let Some(user) = user {
		let user = serde_json::to_value(user).map_err(|e| Error::Internal(e.to_string()))?;
		context.insert("user".to_string(), user);
	}

	if let Some(state) = AuthState::from_request(request)
		&& let Some(flash) = ctx.sessions.take_flash(&state.session_key).await?
	{
		context.insert("flash".to_string(), Value::String(flash));
	}

	ctx.templates
		.render_response(template_name, &Value::Object(context))
}

/// Submitted values of `fields`, for redisplaying a rejected form.
pub fn form_values(data: &FormData, fields: &[&str]) -> Value {
	let values: Map<String, Value> = fields
		.iter()
		.filter_map(|field| {
			data.get(field)
				.map(|value| (field.to_string(), Value::String(value.to_string())))
		})
		.collect();
	Value::Object(values)
}

/// 1-based `?page=` number; missing or invalid values mean the first page.
pub fn page_number(request: &Request) -> usize {
	request
		.query("page")
		.and_then(|page| page.trim().parse::<usize>().ok())
		.filter(|page| *page >= 1)
		.unwrap_or(1)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/home/", 1)]
	#[case("/home/?page=3", 3)]
	#[case("/home/?page=0", 1)]
	#[case("/home/?page=-2", 1)]
	#[case("/home/?page=abc", 1)]
	fn test_page_number(#[case] uri: &str, #[case] expected: usize) {
		let request = Request::builder().uri(uri).build().unwrap();
		assert_eq!(page_number(&request), expected);
	}

	#[rstest]
	fn test_form_values_keeps_submitted_fields_only() {
		let mut data = FormData::new();
		data.insert("title", "Dune");
		data.insert("password", "secret");

		let values = form_values(&data, &["title", "description"]);

		assert_eq!(values, serde_json::json!({ "title": "Dune" }));
	}

	#[rstest]
	fn test_redirect() {
		let response = redirect("/posts/");
		assert_eq!(response.status.as_u16(), 302);
		assert_eq!(response.location(), Some("/posts/"));
	}
}
