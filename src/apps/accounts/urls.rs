//! URL configuration for the accounts app

use booksblog_http::Method;
use booksblog_urls::Route;
use std::sync::Arc;

use super::decorators::login_required;
use super::views;
use crate::config::AppContext;
use crate::shortcuts::view;

pub fn url_patterns(ctx: &Arc<AppContext>) -> Vec<Route> {
	vec![
		Route::new("/", view(ctx, views::login))
			.with_name("login")
			.with_methods([Method::GET, Method::POST]),
		Route::new("/signup/", view(ctx, views::signup))
			.with_name("signup")
			.with_methods([Method::GET, Method::POST]),
		Route::new("/logout/", view(ctx, views::logout))
			.with_name("logout")
			.with_methods([Method::GET, Method::POST]),
		Route::new("/subscribe/", login_required(ctx, views::subscribe))
			.with_name("subscribe")
			.with_methods([Method::GET, Method::POST]),
		Route::new("/unsubscribe/", login_required(ctx, views::unsubscribe))
			.with_name("unsubscribe")
			.with_methods([Method::POST]),
	]
}
