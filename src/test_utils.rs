//! Test fixtures: an application on an in-memory database with media in a
//! temporary directory, plus request helpers that go through the complete
//! middleware stack.

use booksblog_conf::Settings;
use booksblog_db::DatabaseConnection;
use booksblog_http::{Handler, Method, Request, Response};
use booksblog_server::into_response;
use booksblog_storages::{LocalConfig, LocalStorage};
use rstest::fixture;
use std::sync::Arc;
use tempfile::TempDir;

use crate::apps::accounts::models::{NewUser, User, UserFollows};
use crate::apps::blog::models::{NewReview, NewTicket, Review, Ticket, TicketType};
use crate::config::{AppContext, build_application};

pub const PASSWORD: &str = "correct horse";
pub const BOUNDARY: &str = "XTESTBOUNDARY";

pub struct TestApp {
	pub ctx: Arc<AppContext>,
	pub app: Arc<dyn Handler>,
	// Removed with the fixture.
	_media: TempDir,
}

#[fixture]
pub async fn test_app() -> TestApp {
	TestApp::with_settings(Settings::default()).await
}

impl TestApp {
	pub async fn with_settings(settings: Settings) -> Self {
		let media = TempDir::new().unwrap();
		let settings = Settings {
			media_root: media.path().to_path_buf(),
			..settings
		};

		let db = DatabaseConnection::connect_in_memory().await.unwrap();
		db.migrate().await.unwrap();
		let storage =
			LocalStorage::new(LocalConfig::new(media.path(), &settings.media_url)).unwrap();

		let ctx = Arc::new(AppContext::new(settings, db, Arc::new(storage)).unwrap());
		let app = build_application(ctx.clone()).unwrap();

		Self {
			ctx,
			app,
			_media: media,
		}
	}

	pub async fn create_user(&self, username: &str) -> User {
		let new_user = NewUser {
			username: username.to_string(),
			email: format!("{}@example.com", username),
			password: PASSWORD.to_string(),
			..NewUser::default()
		};
		User::create(self.ctx.db.pool(), self.ctx.hasher.as_ref(), &new_user)
			.await
			.unwrap()
	}

	/// Session key of a fresh session for `user`.
	pub async fn login(&self, user: &User) -> String {
		self.ctx.sessions.create(user.id).await.unwrap().session_key
	}

	pub async fn follow(&self, follower: &User, target: &User) {
		UserFollows::follow(self.ctx.db.pool(), follower, target)
			.await
			.unwrap();
	}

	pub async fn ticket(&self, creator: &User, title: &str) -> Ticket {
		let mut conn = self.ctx.db.acquire().await.unwrap();
		let new_ticket = NewTicket {
			title: title.to_string(),
			description: String::new(),
			image: "none.png".to_string(),
			ticket_type: TicketType::Request,
		};
		Ticket::insert(&mut *conn, creator, &new_ticket).await.unwrap()
	}

	pub async fn review(&self, author: &User, ticket: &Ticket, rating: i64) -> Review {
		let mut conn = self.ctx.db.acquire().await.unwrap();
		let new_review = NewReview {
			rating,
			headline: format!("{} on {}", author.username, ticket.title),
			body: String::new(),
		};
		Review::create(&mut *conn, ticket, author, &new_review)
			.await
			.unwrap()
	}

	pub async fn count(&self, table: &str) -> i64 {
		sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
			.fetch_one(self.ctx.db.pool())
			.await
			.unwrap()
	}

	pub async fn send(&self, request: Request) -> Response {
		into_response(self.app.handle(request).await)
	}

	pub async fn get(&self, uri: &str, session: Option<&str>) -> Response {
		let mut builder = Request::builder().uri(uri);
		if let Some(session) = session {
			builder = builder.header("cookie", format!("sessionid={}", session));
		}
		self.send(builder.build().unwrap()).await
	}

	pub async fn post(&self, uri: &str, session: Option<&str>, fields: &[(&str, &str)]) -> Response {
		let body = serde_urlencoded::to_string(fields).unwrap();
		let mut builder = Request::builder()
			.method(Method::POST)
			.uri(uri)
			.header("content-type", "application/x-www-form-urlencoded")
			.body(body);
		if let Some(session) = session {
			builder = builder.header("cookie", format!("sessionid={}", session));
		}
		self.send(builder.build().unwrap()).await
	}

	/// `multipart/form-data` POST with an optional `image` file part.
	pub async fn post_multipart(
		&self,
		uri: &str,
		session: &str,
		fields: &[(&str, &str)],
		image: Option<(&str, &[u8])>,
	) -> Response {
		let request = Request::builder()
			.method(Method::POST)
			.uri(uri)
			.header("cookie", format!("sessionid={}", session))
			.header(
				"content-type",
				format!("multipart/form-data; boundary={}", BOUNDARY),
			)
			.body(multipart_body(fields, image))
			.build()
			.unwrap();
		self.send(request).await
	}
}

pub fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
	let mut body = Vec::new();
	for (name, value) in fields {
		body.extend_from_slice(
			format!(
				"--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
				BOUNDARY, name, value
			)
			.as_bytes(),
		);
	}
	if let Some((file_name, data)) = image {
		body.extend_from_slice(
			format!(
				"--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
				BOUNDARY, file_name
			)
			.as_bytes(),
		);
		body.extend_from_slice(data);
		body.extend_from_slice(b"\r\n");
	}
	body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
	body
}

/// A solid-color PNG of the given size.
pub fn png(width: u32, height: u32) -> Vec<u8> {
	let buffer = ::image::ImageBuffer::from_pixel(width, height, ::image::Rgb([40u8, 90, 160]));
	let mut data = std::io::Cursor::new(Vec::new());
	::image::DynamicImage::ImageRgb8(buffer)
		.write_to(&mut data, ::image::ImageFormat::Png)
		.unwrap();
	data.into_inner()
}
