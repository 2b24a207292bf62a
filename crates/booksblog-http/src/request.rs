//! Buffered HTTP request.

mod params;

use bytes::Bytes;
use hyper::{HeaderMap, Method, Uri, Version};
use std::collections::HashMap;
use std::net::SocketAddr;

use crate::extensions::Extensions;
use crate::form::FormData;
use crate::{Error, Result};

/// An HTTP request with its body fully read into memory.
#[derive(Debug)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	body: Bytes,
	/// Parameters captured by the router from the path pattern
	pub path_params: HashMap<String, String>,
	/// URL-decoded query string parameters
	pub query_params: HashMap<String, String>,
	pub remote_addr: Option<SocketAddr>,
	pub extensions: Extensions,
}

impl Request {
	/// Create a request from already-parsed parts, as the server does.
	pub fn new(method: Method, uri: Uri, version: Version, headers: HeaderMap, body: Bytes) -> Self {
		let query_params = Self::parse_query_params(&uri);
		Self {
			method,
			uri,
			version,
			headers,
			body,
			path_params: HashMap::new(),
			query_params,
			remote_addr: None,
			extensions: Extensions::new(),
		}
	}

	/// Starts building a request. Method defaults to GET and URI to `/`.
	///
	/// # Examples
	///
	/// ```
	/// use booksblog_http::{Method, Request};
	///
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/subscribe/?tab=following")
	///     .header("content-type", "application/x-www-form-urlencoded")
	///     .body("username=alice")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.path(), "/subscribe/");
	/// assert_eq!(request.query("tab"), Some("following"));
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	pub fn body(&self) -> &Bytes {
		&self.body
	}

	/// Value of the `Content-Type` header, if present and valid UTF-8.
	pub fn content_type(&self) -> Option<&str> {
		self.headers
			.get(hyper::header::CONTENT_TYPE)
			.and_then(|v| v.to_str().ok())
	}

	/// Parses the body as a submitted HTML form.
	///
	/// Both `application/x-www-form-urlencoded` and `multipart/form-data` are
	/// accepted. A request without a body yields an empty form.
	pub async fn form(&self) -> Result<FormData> {
		let content_type = self.content_type().unwrap_or("");
		if content_type.starts_with("multipart/form-data") {
			FormData::from_multipart(content_type, self.body.clone()).await
		} else if self.body.is_empty()
			|| content_type.is_empty()
			|| content_type.starts_with("application/x-www-form-urlencoded")
		{
			FormData::from_urlencoded(&self.body)
		} else {
			Err(Error::Http(format!(
				"Unsupported form content type: {}",
				content_type
			)))
		}
	}
}

/// Builder for [`Request`].
#[derive(Debug)]
pub struct RequestBuilder {
	method: Method,
	uri: String,
	version: Version,
	headers: Vec<(String, String)>,
	body: Bytes,
	remote_addr: Option<SocketAddr>,
}

impl Default for RequestBuilder {
	fn default() -> Self {
		Self {
			method: Method::GET,
			uri: "/".to_string(),
			version: Version::HTTP_11,
			headers: Vec::new(),
			body: Bytes::new(),
			remote_addr: None,
		}
	}
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = uri.into();
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	/// Appends a header. Invalid names or values are rejected by [`build`](Self::build).
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	/// Appends every header of `headers`.
	pub fn headers(mut self, headers: HeaderMap) -> Self {
		for (name, value) in headers.iter() {
			if let Ok(value) = value.to_str() {
				self.headers.push((name.to_string(), value.to_string()));
			}
		}
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	pub fn remote_addr(mut self, addr: SocketAddr) -> Self {
		self.remote_addr = Some(addr);
		self
	}

	pub fn build(self) -> Result<Request> {
		let uri: Uri = self
			.uri
			.parse()
			.map_err(|e| Error::Http(format!("Invalid URI '{}': {}", self.uri, e)))?;

		let mut headers = HeaderMap::new();
		for (name, value) in self.headers {
			let name = hyper::header::HeaderName::from_bytes(name.as_bytes())
				.map_err(|e| Error::Http(format!("Invalid header name: {}", e)))?;
			let value = hyper::header::HeaderValue::from_str(&value)
				.map_err(|e| Error::Http(format!("Invalid header value: {}", e)))?;
			headers.append(name, value);
		}

		let mut request = Request::new(self.method, uri, self.version, headers, self.body);
		request.remote_addr = self.remote_addr;
		Ok(request)
	}
}
