//! URL configuration for the blog app

use booksblog_http::Method;
use booksblog_urls::Route;
use std::sync::Arc;

use super::views;
use crate::apps::accounts::login_required;
use crate::config::AppContext;

pub fn url_patterns(ctx: &Arc<AppContext>) -> Vec<Route> {
	let form = [Method::GET, Method::POST];

	vec![
		Route::new("/home/", login_required(ctx, views::home))
			.with_name("home")
			.with_methods([Method::GET]),
		Route::new("/posts/", login_required(ctx, views::posts))
			.with_name("posts")
			.with_methods([Method::GET]),
		Route::new("/ticket/create/", login_required(ctx, views::ticket_create))
			.with_name("ticket_create")
			.with_methods(form.clone()),
		Route::new("/ticket/request/", login_required(ctx, views::ticket_request))
			.with_name("ticket_request")
			.with_methods(form.clone()),
		Route::new(
			"/ticket_review/create/",
			login_required(ctx, views::ticket_and_review_create),
		)
		.with_name("ticket_and_review_create")
		.with_methods(form.clone()),
		Route::new("/ticket/{ticket_id}/edit/", login_required(ctx, views::ticket_edit))
			.with_name("ticket_edit")
			.with_methods(form.clone()),
		Route::new("/ticket/{ticket_id}/delete/", login_required(ctx, views::ticket_delete))
			.with_name("ticket_delete")
			.with_methods(form.clone()),
		Route::new("/review/{ticket_id}/create/", login_required(ctx, views::review_create))
			.with_name("review_create")
			.with_methods(form.clone()),
		Route::new("/review/{review_id}/edit/", login_required(ctx, views::review_edit))
			.with_name("review_edit")
			.with_methods(form.clone()),
		Route::new("/review/{review_id}/delete/", login_required(ctx, views::review_delete))
			.with_name("review_delete")
			.with_methods(form),
	]
}
