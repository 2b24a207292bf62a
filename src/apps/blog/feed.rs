//! Feed aggregation
//!
//! The feed of a user shows their own tickets and reviews, those of the
//! users they follow, and every review answering one of their tickets. The
//! own-posts page shows only what the user wrote. Both merge tickets and
//! reviews into one sequence, newest first.

use booksblog_db::DbResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqliteConnection;
use std::collections::HashMap;

use super::models::{Review, Ticket};
use crate::apps::accounts::models::User;

/// Which posts a page lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
	/// Own posts, posts of followed users and reviews of own tickets
	Feed,
	/// Own posts only
	OwnPosts,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketEntry {
	pub ticket: Ticket,
	/// The viewer already wrote a review for this ticket
	pub viewer_has_reviewed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewEntry {
	pub review: Review,
	/// The ticket the review answers
	pub ticket: Ticket,
}

/// One post of a feed page.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FeedItem {
	Ticket(TicketEntry),
	Review(ReviewEntry),
}

impl FeedItem {
	pub fn kind(&self) -> &'static str {
		match self {
			FeedItem::Ticket(_) => "ticket",
			FeedItem::Review(_) => "review",
		}
	}

	pub fn time_created(&self) -> DateTime<Utc> {
		match self {
			FeedItem::Ticket(entry) => entry.ticket.time_created,
			FeedItem::Review(entry) => entry.review.time_created,
		}
	}

	pub fn id(&self) -> i64 {
		match self {
			FeedItem::Ticket(entry) => entry.ticket.id,
			FeedItem::Review(entry) => entry.review.id,
		}
	}

	// Ties on time and id put the review first.
	fn sort_key(&self) -> (DateTime<Utc>, i64, u8) {
		let rank = match self {
			FeedItem::Ticket(_) => 0,
			FeedItem::Review(_) => 1,
		};
		(self.time_created(), self.id(), rank)
	}
}

/// Merge tickets and reviews, newest first.
pub fn merge(tickets: Vec<TicketEntry>, reviews: Vec<ReviewEntry>) -> Vec<FeedItem> {
	let mut items: Vec<FeedItem> = tickets
		.into_iter()
		.map(FeedItem::Ticket)
		.chain(reviews.into_iter().map(FeedItem::Review))
		.collect();
	items.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
	items
}

/// Every post of `scope` for `viewer`, newest first.
pub async fn load(
	conn: &mut SqliteConnection,
	viewer: &User,
	scope: Scope,
) -> DbResult<Vec<FeedItem>> {
	let (tickets, reviews) = match scope {
		Scope::Feed => (
			Ticket::visible_to(conn, viewer).await?,
			Review::visible_to(conn, viewer).await?,
		),
		Scope::OwnPosts => (
			Ticket::created_by(conn, viewer).await?,
			Review::written_by(conn, viewer).await?,
		),
	};
	let reviewed = Review::reviewed_ticket_ids(conn, viewer).await?;

	// Reviews may answer tickets that are not listed themselves.
	let mut quoted: HashMap<i64, Ticket> = tickets
		.iter()
		.map(|ticket| (ticket.id, ticket.clone()))
		.collect();
	let mut missing: Vec<i64> = reviews
		.iter()
		.map(|review| review.ticket_id)
		.filter(|id| !quoted.contains_key(id))
		.collect();
	missing.sort_unstable();
	missing.dedup();
	for ticket in Ticket::get_many(conn, &missing).await? {
		quoted.insert(ticket.id, ticket);
	}

	let tickets = tickets
		.into_iter()
		.map(|ticket| TicketEntry {
			viewer_has_reviewed: reviewed.contains(&ticket.id),
			ticket,
		})
		.collect();
	let reviews = reviews
		.into_iter()
		.filter_map(|review| {
			let ticket = quoted.get(&review.ticket_id)?.clone();
			Some(ReviewEntry { review, ticket })
		})
		.collect();

	let items = merge(tickets, reviews);
	tracing::debug!(viewer = %viewer.username, ?scope, items = items.len(), "feed loaded");
	Ok(items)
}

/// One page of a longer sequence.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
	pub items: Vec<T>,
	/// 1-based
	pub number: usize,
	pub has_previous: bool,
	pub has_next: bool,
}

/// Page `number` (1-based) of `items`, `per_page` items per page. Pages past
/// the end are empty.
pub fn paginate<T>(items: Vec<T>, number: usize, per_page: usize) -> Page<T> {
	let number = number.max(1);
	let per_page = per_page.max(1);
	let total = items.len();
	let start = (number - 1).saturating_mul(per_page);

	Page {
		items: items.into_iter().skip(start).take(per_page).collect(),
		number,
		has_previous: number > 1,
		has_next: total > number.saturating_mul(per_page),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::apps::blog::models::TicketType;
	use chrono::TimeZone;
	use rstest::rstest;

	fn at(second: u32) -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, second).unwrap()
	}

	fn ticket(id: i64, time_created: DateTime<Utc>) -> Ticket {
		Ticket {
			id,
			title: format!("Ticket {}", id),
			description: String::new(),
			image: "none.png".to_string(),
			user_id: 1,
			uploader_id: 1,
			time_created,
			ticket_type: TicketType::Request,
			author: "ann".to_string(),
		}
	}

	fn ticket_entry(id: i64, time_created: DateTime<Utc>) -> TicketEntry {
		TicketEntry {
			ticket: ticket(id, time_created),
			viewer_has_reviewed: false,
		}
	}

	fn review_entry(id: i64, time_created: DateTime<Utc>) -> ReviewEntry {
		ReviewEntry {
			review: Review {
				id,
				ticket_id: 1,
				rating: 4,
				headline: format!("Review {}", id),
				body: String::new(),
				user_id: 2,
				time_created,
				author: "bob".to_string(),
			},
			ticket: ticket(1, at(0)),
		}
	}

	fn keys(items: &[FeedItem]) -> Vec<(&'static str, i64)> {
		items.iter().map(|item| (item.kind(), item.id())).collect()
	}

	#[rstest]
	fn test_merge_newest_first() {
		let items = merge(
			vec![ticket_entry(1, at(10)), ticket_entry(3, at(30))],
			vec![review_entry(2, at(20))],
		);

		assert_eq!(keys(&items), vec![("ticket", 3), ("review", 2), ("ticket", 1)]);
	}

	#[rstest]
	fn test_merge_ignores_input_order() {
		let items = merge(
			vec![
				ticket_entry(2, at(2)),
				ticket_entry(3, at(1)),
				ticket_entry(1, at(3)),
			],
			Vec::new(),
		);

		assert_eq!(keys(&items), vec![("ticket", 1), ("ticket", 2), ("ticket", 3)]);
	}

	#[rstest]
	fn test_merge_ties_are_deterministic() {
		let items = merge(
			vec![ticket_entry(5, at(7)), ticket_entry(9, at(7))],
			vec![review_entry(5, at(7))],
		);

		assert_eq!(keys(&items), vec![("ticket", 9), ("review", 5), ("ticket", 5)]);
	}

	#[rstest]
	fn test_feed_item_serializes_with_kind() {
		let json = serde_json::to_value(FeedItem::Ticket(ticket_entry(1, at(0)))).unwrap();

		assert_eq!(json["kind"], "ticket");
		assert_eq!(json["ticket"]["title"], "Ticket 1");
		assert_eq!(json["ticket"]["ticket_type"], "REQUEST");
		assert_eq!(json["viewer_has_reviewed"], false);
	}

	#[rstest]
	#[case(1, 3, vec![1, 2, 3], false, true)]
	#[case(2, 3, vec![4, 5], true, false)]
	#[case(3, 3, vec![], true, false)]
	#[case(1, 10, vec![1, 2, 3, 4, 5], false, false)]
	fn test_paginate(
		#[case] number: usize,
		#[case] per_page: usize,
		#[case] expected: Vec<i32>,
		#[case] has_previous: bool,
		#[case] has_next: bool,
	) {
		let page = paginate(vec![1, 2, 3, 4, 5], number, per_page);

		assert_eq!(page.items, expected);
		assert_eq!(page.number, number);
		assert_eq!(page.has_previous, has_previous);
		assert_eq!(page.has_next, has_next);
	}
}
