//! Review model

use booksblog_db::{DbResult, is_unique_violation};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqliteConnection;
use std::collections::HashSet;

use super::ticket::Ticket;
use crate::apps::accounts::models::User;
use crate::apps::blog::errors::ContentError;

const SELECT_REVIEW: &str = "SELECT r.id, r.ticket_id, r.rating, r.headline, r.body, \
	r.user_id, r.time_created, u.username AS author \
	FROM blog_review r JOIN auth_user u ON u.id = r.user_id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Review {
	pub id: i64,
	pub ticket_id: i64,
	/// 0 to 5 stars
	pub rating: i64,
	pub headline: String,
	pub body: String,
	/// Author
	pub user_id: i64,
	pub time_created: DateTime<Utc>,
	/// Author's username
	pub author: String,
}

/// Values of a review being written or edited.
#[derive(Debug, Clone)]
pub struct NewReview {
	pub rating: i64,
	pub headline: String,
	pub body: String,
}

impl Review {
	/// Review `ticket` as `author`. A user reviews a ticket at most once.
	pub async fn create(
		conn: &mut SqliteConnection,
		ticket: &Ticket,
		author: &User,
		new_review: &NewReview,
	) -> Result<Review, ContentError> {
		if Self::existing_for(conn, ticket.id, author.id).await?.is_some() {
			return Err(ContentError::DuplicateReview);
		}

		let time_created = Utc::now();
		let id: i64 = sqlx::query_scalar(
			"INSERT INTO blog_review (ticket_id, rating, headline, body, user_id, time_created) \
			 VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING id",
		)
		.bind(ticket.id)
		.bind(new_review.rating)
		.bind(&new_review.headline)
		.bind(&new_review.body)
		.bind(author.id)
		.bind(time_created)
		.fetch_one(&mut *conn)
		.await
		.map_err(|e| {
			if is_unique_violation(&e) {
				ContentError::DuplicateReview
			} else {
				e.into()
			}
		})?;

		tracing::info!(review_id = id, ticket_id = ticket.id, user = %author.username, "review created");
		Ok(Review {
			id,
			ticket_id: ticket.id,
			rating: new_review.rating,
			headline: new_review.headline.clone(),
			body: new_review.body.clone(),
			user_id: author.id,
			time_created,
			author: author.username.clone(),
		})
	}

	pub async fn get(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Review>> {
		let review = sqlx::query_as::<_, Review>(&format!("{} WHERE r.id = ?1", SELECT_REVIEW))
			.bind(id)
			.fetch_optional(&mut *conn)
			.await?;
		Ok(review)
	}

	/// The review `user_id` wrote for `ticket_id`, if any.
	pub async fn existing_for(
		conn: &mut SqliteConnection,
		ticket_id: i64,
		user_id: i64,
	) -> DbResult<Option<Review>> {
		let review = sqlx::query_as::<_, Review>(&format!(
			"{} WHERE r.ticket_id = ?1 AND r.user_id = ?2",
			SELECT_REVIEW
		))
		.bind(ticket_id)
		.bind(user_id)
		.fetch_optional(&mut *conn)
		.await?;
		Ok(review)
	}

	/// Reviews by `user`, by anyone `user` follows, or answering a ticket of `user`.
	pub async fn visible_to(conn: &mut SqliteConnection, user: &User) -> DbResult<Vec<Review>> {
		Self::fetch_where(
			conn,
			"r.user_id = ?1 \
			 OR r.user_id IN (SELECT followed_user_id FROM auth_userfollows WHERE user_id = ?1) \
			 OR r.ticket_id IN (SELECT id FROM blog_ticket WHERE user_id = ?1)",
			user.id,
		)
		.await
	}

	pub async fn written_by(conn: &mut SqliteConnection, user: &User) -> DbResult<Vec<Review>> {
		Self::fetch_where(conn, "r.user_id = ?1", user.id).await
	}

	async fn fetch_where(
		conn: &mut SqliteConnection,
		condition: &str,
		user_id: i64,
	) -> DbResult<Vec<Review>> {
		let reviews =
			sqlx::query_as::<_, Review>(&format!("{} WHERE {}", SELECT_REVIEW, condition))
				.bind(user_id)
				.fetch_all(&mut *conn)
				.await?;
		Ok(reviews)
	}

	/// Ids of every ticket `user` has reviewed.
	pub async fn reviewed_ticket_ids(
		conn: &mut SqliteConnection,
		user: &User,
	) -> DbResult<HashSet<i64>> {
		let ids: Vec<i64> = sqlx::query_scalar("SELECT ticket_id FROM blog_review WHERE user_id = ?1")
			.bind(user.id)
			.fetch_all(&mut *conn)
			.await?;
		Ok(ids.into_iter().collect())
	}

	/// Write rating, headline and body. Ticket, author and creation time never change.
	pub async fn update(&mut self, conn: &mut SqliteConnection, changes: NewReview) -> DbResult<()> {
		sqlx::query("UPDATE blog_review SET rating = ?1, headline = ?2, body = ?3 WHERE id = ?4")
			.bind(changes.rating)
			.bind(&changes.headline)
			.bind(&changes.body)
			.bind(self.id)
			.execute(&mut *conn)
			.await?;

		self.rating = changes.rating;
		self.headline = changes.headline;
		self.body = changes.body;
		tracing::info!(review_id = self.id, "review updated");
		Ok(())
	}

	pub async fn delete(&self, conn: &mut SqliteConnection) -> DbResult<()> {
		sqlx::query("DELETE FROM blog_review WHERE id = ?1")
			.bind(self.id)
			.execute(&mut *conn)
			.await?;
		tracing::info!(review_id = self.id, "review deleted");
		Ok(())
	}
}
