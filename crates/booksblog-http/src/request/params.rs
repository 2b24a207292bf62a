use super::Request;
use crate::{Error, Result};
use cookie::Cookie;
use hyper::Uri;
use std::collections::HashMap;
use std::str::FromStr;

impl Request {
	/// Parse and URL-decode query parameters from URI
	pub(super) fn parse_query_params(uri: &Uri) -> HashMap<String, String> {
		uri.query()
			.and_then(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok())
			.map(|pairs| pairs.into_iter().collect())
			.unwrap_or_default()
	}

	/// Get the request path
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Path plus query string, as sent by the client.
	///
	/// ```
	/// use booksblog_http::Request;
	///
	/// let request = Request::builder().uri("/posts/?page=2").build().unwrap();
	/// assert_eq!(request.full_path(), "/posts/?page=2");
	/// ```
	pub fn full_path(&self) -> String {
		match self.uri.query() {
			Some(query) => format!("{}?{}", self.uri.path(), query),
			None => self.uri.path().to_string(),
		}
	}

	/// Get a decoded query parameter
	pub fn query(&self, name: &str) -> Option<&str> {
		self.query_params.get(name).map(String::as_str)
	}

	/// Set a path parameter (used by the router for path variable extraction)
	pub fn set_path_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.path_params.insert(key.into(), value.into());
	}

	/// Parse a path parameter captured by the router.
	///
	/// A missing parameter or one that does not parse as `T` is reported as
	/// [`Error::NotFound`]: the URL simply does not name an existing resource.
	///
	/// ```
	/// use booksblog_http::Request;
	///
	/// let mut request = Request::builder().uri("/ticket/12/edit/").build().unwrap();
	/// request.set_path_param("ticket_id", "12");
	///
	/// let id: i64 = request.path_param("ticket_id").unwrap();
	/// assert_eq!(id, 12);
	/// ```
	pub fn path_param<T: FromStr>(&self, name: &str) -> Result<T> {
		self.path_params
			.get(name)
			.and_then(|raw| raw.parse::<T>().ok())
			.ok_or_else(|| {
				Error::NotFound(format!("No resource matches {} in {}", name, self.path()))
			})
	}

	/// Value of the cookie `name` from the `Cookie` headers.
	pub fn cookie(&self, name: &str) -> Option<String> {
		self.headers
			.get_all(hyper::header::COOKIE)
			.iter()
			.filter_map(|value| value.to_str().ok())
			.flat_map(Cookie::split_parse)
			.filter_map(|parsed| parsed.ok())
			.find(|c| c.name() == name)
			.map(|c| c.value().to_string())
	}
}
