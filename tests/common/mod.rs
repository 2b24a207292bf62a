//! Shared harness for the end-to-end tests.

use booksblog::conf::Settings;
use booksblog::config::{AppContext, build_application};
use booksblog::db::DatabaseConnection;
use booksblog::http::{Handler, Method, Request, Response};
use booksblog::server::into_response;
use booksblog::storages::{LocalConfig, LocalStorage};
use std::sync::Arc;
use tempfile::TempDir;

pub struct Site {
	app: Arc<dyn Handler>,
	_media: TempDir,
}

impl Site {
	pub async fn new() -> Self {
		let media = TempDir::new().expect("Failed to create temp dir");
		let settings = Settings {
			media_root: media.path().to_path_buf(),
			..Settings::default()
		};

		let db = DatabaseConnection::connect_in_memory().await.unwrap();
		db.migrate().await.unwrap();
		let storage = LocalStorage::new(LocalConfig::new(media.path(), &settings.media_url)).unwrap();
		let ctx = Arc::new(AppContext::new(settings, db, Arc::new(storage)).unwrap());
		let app = build_application(ctx).unwrap();

		Self {
			app,
			_media: media,
		}
	}

	/// A browser without a session.
	pub fn browser(&self) -> Browser<'_> {
		Browser {
			site: self,
			session: None,
		}
	}
}

/// Sends requests and keeps the session cookie between them.
pub struct Browser<'a> {
	site: &'a Site,
	session: Option<String>,
}

impl Browser<'_> {
	pub async fn get(&mut self, uri: &str) -> Response {
		let request = self.request(Method::GET, uri).build().unwrap();
		self.send(request).await
	}

	pub async fn post(&mut self, uri: &str, fields: &[(&str, &str)]) -> Response {
		let request = self
			.request(Method::POST, uri)
			.header("content-type", "application/x-www-form-urlencoded")
			.body(serde_urlencoded::to_string(fields).unwrap())
			.build()
			.unwrap();
		self.send(request).await
	}

	pub async fn signup(&mut self, username: &str) -> Response {
		let email = format!("{}@example.com", username);
		self.post(
			"/signup/",
			&[
				("username", username),
				("email", email.as_str()),
				("password1", "a long enough secret"),
				("password2", "a long enough secret"),
			],
		)
		.await
	}

	pub fn is_logged_in(&self) -> bool {
		self.session.is_some()
	}

	fn request(&self, method: Method, uri: &str) -> booksblog::http::RequestBuilder {
		let mut builder = Request::builder().method(method).uri(uri);
		if let Some(session) = &self.session {
			builder = builder.header("cookie", format!("sessionid={}", session));
		}
		builder
	}

	async fn send(&mut self, request: Request) -> Response {
		let response = into_response(self.site.app.handle(request).await);
		for value in response.headers.get_all("set-cookie") {
			let Some(pair) = value
				.to_str()
				.ok()
				.and_then(|cookie| cookie.split(';').next())
			else {
				continue;
			};
			if let Some(("sessionid", key)) = pair.split_once('=') {
				self.session = (!key.is_empty()).then(|| key.to_string());
			}
		}
		response
	}
}
