use async_trait::async_trait;
use booksblog_core::exception::{Error, Result};
use booksblog_http::{Handler, Request, Response, StatusCode};
use std::sync::Arc;

use crate::pattern::PathPattern;
use crate::route::Route;

/// Router trait - composes routes together
pub trait Router: Send + Sync {
	fn add_route(&mut self, route: Route) -> Result<()>;

	/// Add every route of `routes` with `prefix` prepended to its path
	fn mount(&mut self, prefix: &str, routes: Vec<Route>) -> Result<()>;

	/// Dispatch a request to the first matching route
	fn route(&self, request: Request)
	-> impl std::future::Future<Output = Result<Response>> + Send;
}

/// Ordered list of routes, first match wins.
///
/// - no route matches: [`Error::NotFound`]
/// - a route matches but not for the method: [`Error::MethodNotAllowed`]
/// - no match, but the path with a trailing slash would match: 301 to that path
#[derive(Default)]
pub struct DefaultRouter {
	routes: Vec<(PathPattern, Route)>,
}

impl DefaultRouter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn routes(&self) -> impl Iterator<Item = &Route> {
		self.routes.iter().map(|(_, route)| route)
	}

	fn matching_routes(&self, path: &str) -> Vec<(&Route, std::collections::HashMap<String, String>)> {
		self.routes
			.iter()
			.filter_map(|(pattern, route)| pattern.matches(path).map(|params| (route, params)))
			.collect()
	}
}

impl Router for DefaultRouter {
	fn add_route(&mut self, route: Route) -> Result<()> {
		if let Some(name) = &route.name
			&& self.routes.iter().any(|(_, r)| r.name.as_ref() == Some(name))
		{
			return Err(Error::ImproperlyConfigured(format!(
				"Duplicate route name '{}'",
				name
			)));
		}
		let pattern = route.compile()?;
		self.routes.push((pattern, route));
		Ok(())
	}

	fn mount(&mut self, prefix: &str, routes: Vec<Route>) -> Result<()> {
		let prefix = prefix.trim_end_matches('/');
		for mut route in routes {
			route.path = if route.path.starts_with('/') {
				format!("{}{}", prefix, route.path)
			} else {
				format!("{}/{}", prefix, route.path)
			};
			self.add_route(route)?;
		}
		Ok(())
	}

	async fn route(&self, mut request: Request) -> Result<Response> {
		let path = request.path().to_string();
		let candidates = self.matching_routes(&path);

		if candidates.is_empty() {
			if !path.ends_with('/') && !self.matching_routes(&format!("{}/", path)).is_empty() {
				let mut location = format!("{}/", path);
				if let Some(query) = request.uri.query() {
					location = format!("{}?{}", location, query);
				}
				return Ok(Response::new(StatusCode::MOVED_PERMANENTLY).with_location(&location));
			}
			return Err(Error::NotFound(format!("No route found for {}", path)));
		}

		let Some((route, params)) = candidates
			.into_iter()
			.find(|(route, _)| route.allows(&request.method))
		else {
			return Err(Error::MethodNotAllowed(format!(
				"{} is not allowed on {}",
				request.method, path
			)));
		};

		tracing::debug!(
			route = route.name.as_deref().unwrap_or(route.path.as_str()),
			"dispatching request"
		);
		request.path_params = params;
		let handler: Arc<dyn Handler> = route.handler().clone();
		handler.handle(request).await
	}
}

#[async_trait]
impl Handler for DefaultRouter {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.route(request).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use booksblog_http::{Method, handler_fn};
	use rstest::{fixture, rstest};

	fn echo(tag: &'static str) -> Arc<dyn Handler> {
		handler_fn(move |request: Request| async move {
			let id = request
				.path_params
				.get("ticket_id")
				.cloned()
				.unwrap_or_default();
			Ok(Response::ok().with_body(format!("{}:{}", tag, id)))
		})
	}

	#[fixture]
	fn router() -> DefaultRouter {
		let mut router = DefaultRouter::new();
		router
			.add_route(
				Route::new("/home/", echo("home"))
					.with_methods([Method::GET])
					.with_name("home"),
			)
			.unwrap();
		router
			.add_route(
				Route::new("/ticket/{ticket_id}/edit/", echo("edit"))
					.with_methods([Method::GET, Method::POST])
					.with_name("ticket_edit"),
			)
			.unwrap();
		router
	}

	fn get(path: &str) -> Request {
		Request::builder().uri(path).build().unwrap()
	}

	#[rstest]
	#[tokio::test]
	async fn test_dispatch_sets_path_params(router: DefaultRouter) {
		let response = router.route(get("/ticket/5/edit/")).await.unwrap();
		assert_eq!(response.text(), "edit:5");
	}

	#[rstest]
	#[tokio::test]
	async fn test_unknown_path_is_not_found(router: DefaultRouter) {
		let result = router.route(get("/nope/")).await;
		assert!(matches!(result, Err(Error::NotFound(_))));
	}

	#[rstest]
	#[tokio::test]
	async fn test_wrong_method_is_not_allowed(router: DefaultRouter) {
		let request = Request::builder()
			.method(Method::DELETE)
			.uri("/home/")
			.build()
			.unwrap();

		let result = router.route(request).await;
		assert!(matches!(result, Err(Error::MethodNotAllowed(_))));
	}

	#[rstest]
	#[tokio::test]
	async fn test_missing_trailing_slash_redirects(router: DefaultRouter) {
		let response = router.route(get("/home?page=2")).await.unwrap();

		assert_eq!(response.status, StatusCode::MOVED_PERMANENTLY);
		assert_eq!(response.location(), Some("/home/?page=2"));
	}

	#[rstest]
	fn test_duplicate_names_rejected(mut router: DefaultRouter) {
		let result = router.add_route(Route::new("/other/", echo("x")).with_name("home"));
		assert!(result.is_err());
	}

	#[rstest]
	#[tokio::test]
	async fn test_mount_prefixes_paths() {
		let mut router = DefaultRouter::new();
		router
			.mount("/media/", vec![Route::new("/{ticket_id}", echo("media"))])
			.unwrap();

		let response = router.route(get("/media/a.png")).await.unwrap();
		assert_eq!(response.text(), "media:a.png");
	}
}
