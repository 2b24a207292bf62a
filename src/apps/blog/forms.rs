//! Blog forms

use booksblog_forms::{BooleanField, CharField, FormErrors, IntegerField};
use booksblog_http::FormData;

use super::models::NewReview;

/// Title, description and picture of a ticket.
///
/// The picture itself travels as the `image` file part and is handled by
/// the view; the form only records whether `image-clear` was ticked.
#[derive(Debug, Clone)]
pub struct TicketForm {
	pub title: String,
	pub description: String,
	pub clear_image: bool,
}

impl TicketForm {
	pub const FIELDS: &'static [&'static str] = &["title", "description"];

	pub fn validate(data: &FormData) -> Result<Self, FormErrors> {
		let mut errors = FormErrors::new();
		let form = Self::clean(data, &mut errors);
		match form {
			Some(form) if errors.is_empty() => Ok(form),
			_ => Err(errors),
		}
	}

	fn clean(data: &FormData, errors: &mut FormErrors) -> Option<Self> {
		let title = errors.capture(
			"title",
			CharField::new("title")
				.required()
				.with_max_length(128)
				.clean(data.get("title")),
		);
		let description = errors.capture(
			"description",
			CharField::new("description")
				.with_max_length(2048)
				.clean(data.get("description")),
		);

		Some(Self {
			title: title?,
			description: description?,
			clear_image: data.is_checked("image-clear"),
		})
	}
}

#[derive(Debug, Clone)]
pub struct ReviewForm {
	pub review: NewReview,
}

impl ReviewForm {
	pub const FIELDS: &'static [&'static str] = &["rating", "headline", "body"];

	pub fn validate(data: &FormData) -> Result<Self, FormErrors> {
		let mut errors = FormErrors::new();

		let rating = clean_rating(data, &mut errors);
		let headline = errors.capture(
			"headline",
			CharField::new("headline")
				.required()
				.with_max_length(128)
				.clean(data.get("headline")),
		);
		let body = clean_body(data, &mut errors);

		match (rating, headline, body) {
			(Some(rating), Some(headline), Some(body)) => Ok(Self {
				review: NewReview {
					rating,
					headline,
					body,
				},
			}),
			_ => Err(errors),
		}
	}
}

/// A new ticket and its poster's review, submitted together. The review
/// takes the ticket title as its headline.
#[derive(Debug, Clone)]
pub struct TicketAndReviewForm {
	pub ticket: TicketForm,
	pub review: NewReview,
}

impl TicketAndReviewForm {
	pub const FIELDS: &'static [&'static str] = &["title", "description", "rating", "body"];

	pub fn validate(data: &FormData) -> Result<Self, FormErrors> {
		let mut errors = FormErrors::new();

		let ticket = TicketForm::clean(data, &mut errors);
		let rating = clean_rating(data, &mut errors);
		let body = clean_body(data, &mut errors);

		match (ticket, rating, body) {
			(Some(ticket), Some(rating), Some(body)) if errors.is_empty() => Ok(Self {
				review: NewReview {
					rating,
					headline: ticket.title.clone(),
					body,
				},
				ticket,
			}),
			_ => Err(errors),
		}
	}
}

fn clean_rating(data: &FormData, errors: &mut FormErrors) -> Option<i64> {
	errors.capture(
		"rating",
		IntegerField::new("rating")
			.with_range(0, 5)
			.clean(data.get("rating")),
	)
}

fn clean_body(data: &FormData, errors: &mut FormErrors) -> Option<String> {
	errors.capture(
		"body",
		CharField::new("body")
			.with_max_length(1000)
			.clean(data.get("body")),
	)
}

/// Deletion confirmation: `confirm_delete` must be ticked.
#[derive(Debug, Clone)]
pub struct DeleteForm;

impl DeleteForm {
	pub fn validate(data: &FormData) -> Result<Self, FormErrors> {
		let mut errors = FormErrors::new();
		match errors.capture(
			"confirm_delete",
			BooleanField::new("confirm_delete")
				.required()
				.clean(data.get("confirm_delete")),
		) {
			Some(_) => Ok(Self),
			None => Err(errors),
		}
	}
}
