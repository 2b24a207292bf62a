//! Ticket model
//!
//! A ticket names a book (or article) and either carries its poster's own
//! review (`CREATED`) or asks followers for one (`REQUEST`).

use booksblog_db::DbResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqliteConnection;

use crate::apps::accounts::models::User;

const SELECT_TICKET: &str = "SELECT t.id, t.title, t.description, t.image, t.user_id, \
	t.uploader_id, t.time_created, t.ticket_type, u.username AS author \
	FROM blog_ticket t JOIN auth_user u ON u.id = t.user_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum TicketType {
	/// Posted together with the poster's own review
	Created,
	/// Asks others for a review
	Request,
}

impl TicketType {
	pub fn label(self) -> &'static str {
		match self {
			TicketType::Created => "Review",
			TicketType::Request => "Request",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Ticket {
	pub id: i64,
	pub title: String,
	pub description: String,
	/// Storage name of the picture, `none.png` when there is none
	pub image: String,
	/// Creator
	pub user_id: i64,
	pub uploader_id: i64,
	pub time_created: DateTime<Utc>,
	pub ticket_type: TicketType,
	/// Creator's username
	pub author: String,
}

#[derive(Debug, Clone)]
pub struct NewTicket {
	pub title: String,
	pub description: String,
	pub image: String,
	pub ticket_type: TicketType,
}

/// New values of the mutable ticket fields.
#[derive(Debug, Clone)]
pub struct TicketUpdate {
	pub title: String,
	pub description: String,
	pub image: String,
}

impl Ticket {
	/// Insert a ticket created (and uploaded) by `creator`.
	pub async fn insert(
		conn: &mut SqliteConnection,
		creator: &User,
		new_ticket: &NewTicket,
	) -> DbResult<Ticket> {
		let time_created = Utc::now();

		let id: i64 = sqlx::query_scalar(
			"INSERT INTO blog_ticket (title, description, image, user_id, uploader_id, time_created, ticket_type) \
			 VALUES (?1, ?2, ?3, ?4, ?4, ?5, ?6) RETURNING id",
		)
		.bind(&new_ticket.title)
		.bind(&new_ticket.description)
		.bind(&new_ticket.image)
		.bind(creator.id)
		.bind(time_created)
		.bind(new_ticket.ticket_type)
		.fetch_one(&mut *conn)
		.await?;

		tracing::info!(ticket_id = id, user = %creator.username, ticket_type = ?new_ticket.ticket_type, "ticket created");
		Ok(Ticket {
			id,
			title: new_ticket.title.clone(),
			description: new_ticket.description.clone(),
			image: new_ticket.image.clone(),
			user_id: creator.id,
			uploader_id: creator.id,
			time_created,
			ticket_type: new_ticket.ticket_type,
			author: creator.username.clone(),
		})
	}

	pub async fn get(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Ticket>> {
		let ticket = sqlx::query_as::<_, Ticket>(&format!("{} WHERE t.id = ?1", SELECT_TICKET))
			.bind(id)
			.fetch_optional(&mut *conn)
			.await?;
		Ok(ticket)
	}

	/// Tickets whose id is in `ids`, in no particular order.
	pub async fn get_many(conn: &mut SqliteConnection, ids: &[i64]) -> DbResult<Vec<Ticket>> {
		if ids.is_empty() {
			return Ok(Vec::new());
		}
		let ids = serde_json::Value::from(ids.to_vec()).to_string();
		let tickets = sqlx::query_as::<_, Ticket>(&format!(
			"{} WHERE t.id IN (SELECT value FROM json_each(?1))",
			SELECT_TICKET
		))
		.bind(ids)
		.fetch_all(&mut *conn)
		.await?;
		Ok(tickets)
	}

	/// Tickets by `user` or by anyone `user` follows.
	pub async fn visible_to(conn: &mut SqliteConnection, user: &User) -> DbResult<Vec<Ticket>> {
		Self::fetch_where(
			conn,
			"t.user_id = ?1 \
			 OR t.user_id IN (SELECT followed_user_id FROM auth_userfollows WHERE user_id = ?1)",
			user.id,
		)
		.await
	}

	pub async fn created_by(conn: &mut SqliteConnection, user: &User) -> DbResult<Vec<Ticket>> {
		Self::fetch_where(conn, "t.user_id = ?1", user.id).await
	}

	async fn fetch_where(
		conn: &mut SqliteConnection,
		condition: &str,
		user_id: i64,
	) -> DbResult<Vec<Ticket>> {
		let tickets =
			sqlx::query_as::<_, Ticket>(&format!("{} WHERE {}", SELECT_TICKET, condition))
				.bind(user_id)
				.fetch_all(&mut *conn)
				.await?;
		Ok(tickets)
	}

	/// Write the mutable fields. Type, creator and creation time never change.
	pub async fn update(&mut self, conn: &mut SqliteConnection, changes: TicketUpdate) -> DbResult<()> {
		sqlx::query("UPDATE blog_ticket SET title = ?1, description = ?2, image = ?3 WHERE id = ?4")
			.bind(&changes.title)
			.bind(&changes.description)
			.bind(&changes.image)
			.bind(self.id)
			.execute(&mut *conn)
			.await?;

		self.title = changes.title;
		self.description = changes.description;
		self.image = changes.image;
		tracing::info!(ticket_id = self.id, "ticket updated");
		Ok(())
	}

	/// Delete the ticket; its reviews go with it.
	pub async fn delete(&self, conn: &mut SqliteConnection) -> DbResult<()> {
		sqlx::query("DELETE FROM blog_ticket WHERE id = ?1")
			.bind(self.id)
			.execute(&mut *conn)
			.await?;
		tracing::info!(ticket_id = self.id, "ticket deleted");
		Ok(())
	}
}
