use bytes::Bytes;
use hyper::header::{CONTENT_TYPE, HeaderName, HeaderValue, LOCATION, SET_COOKIE};
use hyper::{HeaderMap, StatusCode};
use std::borrow::Cow;

/// HTTP Response representation
#[derive(Debug)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create a new Response with the given status code
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	/// Create a Response with HTTP 200 OK status
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	pub fn forbidden() -> Self {
		Self::new(StatusCode::FORBIDDEN)
	}

	/// 302 Found pointing at `location`.
	///
	/// # Examples
	///
	/// ```
	/// use booksblog_http::{Response, StatusCode};
	///
	/// let response = Response::redirect("/home/");
	/// assert_eq!(response.status, StatusCode::FOUND);
	/// assert_eq!(response.location(), Some("/home/"));
	/// ```
	pub fn redirect(location: impl AsRef<str>) -> Self {
		Self::new(StatusCode::FOUND).with_location(location.as_ref())
	}

	/// 200 OK with an HTML body.
	pub fn html(body: impl Into<Bytes>) -> Self {
		Self::ok()
			.with_typed_header(
				CONTENT_TYPE,
				HeaderValue::from_static("text/html; charset=utf-8"),
			)
			.with_body(body)
	}

	/// Set the response body
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Insert a header, silently skipping invalid names or values.
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let Ok(header_name) = HeaderName::from_bytes(name.as_bytes())
			&& let Ok(header_value) = HeaderValue::from_str(value)
		{
			self.headers.insert(header_name, header_value);
		}
		self
	}

	pub fn with_typed_header(mut self, key: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(key, value);
		self
	}

	pub fn with_location(mut self, location: &str) -> Self {
		if let Ok(value) = HeaderValue::from_str(location) {
			self.headers.insert(LOCATION, value);
		}
		self
	}

	/// Append a `Set-Cookie` header. Several cookies may be set on one response.
	pub fn with_cookie(mut self, set_cookie: impl AsRef<str>) -> Self {
		if let Ok(value) = HeaderValue::from_str(set_cookie.as_ref()) {
			self.headers.append(SET_COOKIE, value);
		}
		self
	}

	/// Value of the `Location` header.
	pub fn location(&self) -> Option<&str> {
		self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
	}

	/// Body decoded as UTF-8, lossily.
	pub fn text(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.body)
	}
}

impl From<crate::Error> for Response {
	fn from(error: crate::Error) -> Self {
		let status = error.status_code();
		// Server-side details stay in the logs.
		let message = if status.is_server_error() {
			status
				.canonical_reason()
				.unwrap_or("Internal Server Error")
				.to_string()
		} else {
			error.to_string()
		};

		Response::new(status)
			.with_typed_header(
				CONTENT_TYPE,
				HeaderValue::from_static("text/plain; charset=utf-8"),
			)
			.with_body(message)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Error;
	use rstest::rstest;

	#[rstest]
	fn test_html_sets_content_type() {
		let response = Response::html("<p>hi</p>");

		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(
			response.headers.get(CONTENT_TYPE).unwrap(),
			"text/html; charset=utf-8"
		);
		assert_eq!(response.text(), "<p>hi</p>");
	}

	#[rstest]
	fn test_multiple_cookies_are_appended() {
		let response = Response::ok()
			.with_cookie("a=1; Path=/")
			.with_cookie("b=2; Path=/");

		assert_eq!(response.headers.get_all(SET_COOKIE).iter().count(), 2);
	}

	#[rstest]
	fn test_from_client_error_keeps_message() {
		let response = Response::from(Error::PermissionDenied(
			"You cannot unfollow yourself".into(),
		));

		assert_eq!(response.status, StatusCode::FORBIDDEN);
		assert!(response.text().contains("You cannot unfollow yourself"));
	}

	#[rstest]
	fn test_from_server_error_hides_detail() {
		let response = Response::from(Error::Database("disk I/O error at page 3".into()));

		assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
		assert!(!response.text().contains("page 3"));
	}
}
