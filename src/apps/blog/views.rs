//! Blog views
//!
//! Every view here runs behind `login_required` and receives the current
//! user. Ownership failures redirect back to a listing instead of erroring.

use booksblog_core::exception::Result;
use booksblog_forms::FormErrors;
use booksblog_http::{Method, Request, Response};
use serde_json::json;
use std::sync::Arc;

use super::errors::ContentError;
use super::feed::{self, Scope, paginate};
use super::forms::{DeleteForm, ReviewForm, TicketAndReviewForm, TicketForm};
use super::images::{NO_IMAGE, discard, store_upload};
use super::models::{NewTicket, Review, Ticket, TicketType, TicketUpdate};
use super::permissions::ensure_owner;
use crate::apps::accounts::models::User;
use crate::config::AppContext;
use crate::shortcuts::{form_values, page_number, redirect, render};

pub const HOME_URL: &str = "/home/";
pub const POSTS_URL: &str = "/posts/";

/// The feed: own posts, posts of followed users, reviews of own tickets.
pub async fn home(ctx: Arc<AppContext>, request: Request, user: User) -> Result<Response> {
	feed_page(&ctx, &request, &user, Scope::Feed, "blog/home.html").await
}

/// The user's own tickets and reviews.
pub async fn posts(ctx: Arc<AppContext>, request: Request, user: User) -> Result<Response> {
	feed_page(&ctx, &request, &user, Scope::OwnPosts, "blog/posts.html").await
}

async fn feed_page(
	ctx: &AppContext,
	request: &Request,
	user: &User,
	scope: Scope,
	template_name: &str,
) -> Result<Response> {
	let items = {
		let mut conn = ctx.db.acquire().await?;
		feed::load(&mut *conn, user, scope).await?
	};
	let page = paginate(
		items,
		page_number(request),
		ctx.settings.feed_page_size as usize,
	);

	render(
		ctx,
		request,
		Some(user),
		template_name,
		json!({ "page": page, "own_posts": scope == Scope::OwnPosts }),
	)
	.await
}

pub async fn ticket_create(ctx: Arc<AppContext>, request: Request, user: User) -> Result<Response> {
	create_ticket(&ctx, &request, &user, TicketType::Created).await
}

/// A ticket asking followers for a review.
pub async fn ticket_request(ctx: Arc<AppContext>, request: Request, user: User) -> Result<Response> {
	create_ticket(&ctx, &request, &user, TicketType::Request).await
}

async fn create_ticket(
	ctx: &AppContext,
	request: &Request,
	user: &User,
	ticket_type: TicketType,
) -> Result<Response> {
	let mut errors = FormErrors::new();
	let mut values = json!({});

	if request.method == Method::POST {
		let data = request.form().await?;
		match TicketForm::validate(&data) {
			Ok(form) => {
				let image = match data.file("image") {
					Some(upload) => store_upload(ctx, upload).await?,
					None => NO_IMAGE.to_string(),
				};
				let new_ticket = NewTicket {
					title: form.title,
					description: form.description,
					image,
					ticket_type,
				};

				let inserted = {
					let mut conn = ctx.db.acquire().await?;
					Ticket::insert(&mut *conn, user, &new_ticket).await
				};
				if let Err(err) = inserted {
					discard(ctx, &new_ticket.image).await;
					return Err(err.into());
				}
				return Ok(redirect(HOME_URL));
			}
			Err(form_errors) => errors = form_errors,
		}
		values = form_values(&data, TicketForm::FIELDS);
	}

	render(
		ctx,
		request,
		Some(user),
		"blog/ticket_form.html",
		json!({
			"ticket_type": ticket_type,
			"label": ticket_type.label(),
			"values": values,
			"errors": errors,
		}),
	)
	.await
}

/// A ticket and the poster's own review of it, saved together or not at all.
pub async fn ticket_and_review_create(
	ctx: Arc<AppContext>,
	request: Request,
	user: User,
) -> Result<Response> {
	let mut errors = FormErrors::new();
	let mut values = json!({});

	if request.method == Method::POST {
		let data = request.form().await?;
		match TicketAndReviewForm::validate(&data) {
			Ok(form) => {
				let image = match data.file("image") {
					Some(upload) => store_upload(&ctx, upload).await?,
					None => NO_IMAGE.to_string(),
				};
				if let Err(err) = insert_ticket_and_review(&ctx, &user, form, &image).await {
					discard(&ctx, &image).await;
					return Err(err.into());
				}
				return Ok(redirect(HOME_URL));
			}
			Err(form_errors) => errors = form_errors,
		}
		values = form_values(&data, TicketAndReviewForm::FIELDS);
	}

	render(
		&ctx,
		&request,
		Some(&user),
		"blog/ticket_and_review_create.html",
		json!({ "values": values, "errors": errors }),
	)
	.await
}

async fn insert_ticket_and_review(
	ctx: &AppContext,
	user: &User,
	form: TicketAndReviewForm,
	image: &str,
) -> std::result::Result<(), ContentError> {
	let new_ticket = NewTicket {
		title: form.ticket.title,
		description: form.ticket.description,
		image: image.to_string(),
		ticket_type: TicketType::Created,
	};

	let mut tx = ctx.db.begin().await?;
	let ticket = Ticket::insert(&mut *tx, user, &new_ticket).await?;
	Review::create(&mut *tx, &ticket, user, &form.review).await?;
	tx.commit().await?;
	Ok(())
}

/// Edit title, description and picture. Only the creator may.
pub async fn ticket_edit(ctx: Arc<AppContext>, request: Request, user: User) -> Result<Response> {
	let mut ticket = ticket_or_404(&ctx, &request).await?;
	if let Err(err) = ensure_owner(&user, &ticket) {
		return Ok(deny(err, &user, HOME_URL));
	}

	let mut errors = FormErrors::new();
	let mut values = json!({ "title": ticket.title, "description": ticket.description });

	if request.method == Method::POST {
		let data = request.form().await?;
		match TicketForm::validate(&data) {
			Ok(form) => {
				let previous = ticket.image.clone();
				let image = if form.clear_image {
					NO_IMAGE.to_string()
				} else if let Some(upload) = data.file("image") {
					store_upload(&ctx, upload).await?
				} else {
					previous.clone()
				};
				let changes = TicketUpdate {
					title: form.title,
					description: form.description,
					image: image.clone(),
				};

				let updated = {
					let mut conn = ctx.db.acquire().await?;
					ticket.update(&mut *conn, changes).await
				};
				if let Err(err) = updated {
					if image != previous {
						discard(&ctx, &image).await;
					}
					return Err(err.into());
				}
				if image != previous {
					discard(&ctx, &previous).await;
				}
				return Ok(redirect(POSTS_URL));
			}
			Err(form_errors) => errors = form_errors,
		}
		values = form_values(&data, TicketForm::FIELDS);
	}

	render(
		&ctx,
		&request,
		Some(&user),
		"blog/ticket_edit.html",
		json!({ "ticket": ticket, "values": values, "errors": errors }),
	)
	.await
}

/// Delete a ticket and its reviews once `confirm_delete` is ticked.
pub async fn ticket_delete(ctx: Arc<AppContext>, request: Request, user: User) -> Result<Response> {
	let ticket = ticket_or_404(&ctx, &request).await?;
	if let Err(err) = ensure_owner(&user, &ticket) {
		return Ok(deny(err, &user, POSTS_URL));
	}

	let mut errors = FormErrors::new();
	if request.method == Method::POST {
		let data = request.form().await?;
		match DeleteForm::validate(&data) {
			Ok(_) => {
				{
					let mut conn = ctx.db.acquire().await?;
					ticket.delete(&mut *conn).await?;
				}
				discard(&ctx, &ticket.image).await;
				return Ok(redirect(POSTS_URL));
			}
			Err(form_errors) => errors = form_errors,
		}
	}

	render(
		&ctx,
		&request,
		Some(&user),
		"blog/ticket_delete.html",
		json!({ "ticket": ticket, "errors": errors }),
	)
	.await
}

/// Review someone's ticket. A ticket the user already reviewed sends them
/// back to the feed.
pub async fn review_create(ctx: Arc<AppContext>, request: Request, user: User) -> Result<Response> {
	let ticket = ticket_or_404(&ctx, &request).await?;
	let existing = {
		let mut conn = ctx.db.acquire().await?;
		Review::existing_for(&mut *conn, ticket.id, user.id).await?
	};
	if existing.is_some() {
		return Ok(redirect(HOME_URL));
	}

	let mut errors = FormErrors::new();
	let mut values = json!({});

	if request.method == Method::POST {
		let data = request.form().await?;
		match ReviewForm::validate(&data) {
			Ok(form) => {
				let created = {
					let mut conn = ctx.db.acquire().await?;
					Review::create(&mut *conn, &ticket, &user, &form.review).await
				};
				return match created {
					Ok(_) | Err(ContentError::DuplicateReview) => Ok(redirect(HOME_URL)),
					Err(err) => Err(err.into()),
				};
			}
			Err(form_errors) => errors = form_errors,
		}
		values = form_values(&data, ReviewForm::FIELDS);
	}

	render(
		&ctx,
		&request,
		Some(&user),
		"blog/review_create.html",
		json!({ "ticket": ticket, "values": values, "errors": errors }),
	)
	.await
}

/// Edit rating, headline and body. Only the author may.
pub async fn review_edit(ctx: Arc<AppContext>, request: Request, user: User) -> Result<Response> {
	let (mut review, ticket) = review_or_404(&ctx, &request).await?;
	if let Err(err) = ensure_owner(&user, &review) {
		return Ok(deny(err, &user, POSTS_URL));
	}

	let mut errors = FormErrors::new();
	let mut values = json!({
		"rating": review.rating.to_string(),
		"headline": review.headline,
		"body": review.body,
	});

	if request.method == Method::POST {
		let data = request.form().await?;
		match ReviewForm::validate(&data) {
			Ok(form) => {
				let mut conn = ctx.db.acquire().await?;
				review.update(&mut *conn, form.review).await?;
				return Ok(redirect(POSTS_URL));
			}
			Err(form_errors) => errors = form_errors,
		}
		values = form_values(&data, ReviewForm::FIELDS);
	}

	render(
		&ctx,
		&request,
		Some(&user),
		"blog/review_edit.html",
		json!({ "review": review, "ticket": ticket, "values": values, "errors": errors }),
	)
	.await
}

/// Delete a review once `confirm_delete` is ticked.
pub async fn review_delete(ctx: Arc<AppContext>, request: Request, user: User) -> Result<Response> {
	let (review, ticket) = review_or_404(&ctx, &request).await?;
	if let Err(err) = ensure_owner(&user, &review) {
		return Ok(deny(err, &user, POSTS_URL));
	}

	let mut errors = FormErrors::new();
	if request.method == Method::POST {
		let data = request.form().await?;
		match DeleteForm::validate(&data) {
			Ok(_) => {
				let mut conn = ctx.db.acquire().await?;
				review.delete(&mut *conn).await?;
				return Ok(redirect(POSTS_URL));
			}
			Err(form_errors) => errors = form_errors,
		}
	}

	render(
		&ctx,
		&request,
		Some(&user),
		"blog/review_delete.html",
		json!({ "review": review, "ticket": ticket, "errors": errors }),
	)
	.await
}

async fn ticket_or_404(ctx: &AppContext, request: &Request) -> Result<Ticket> {
	let id: i64 = request.path_param("ticket_id")?;
	let mut conn = ctx.db.acquire().await?;
	let ticket = Ticket::get(&mut *conn, id)
		.await?
		.ok_or(ContentError::NotFound("ticket"))?;
	Ok(ticket)
}

/// The review named by `review_id` and the ticket it answers.
async fn review_or_404(ctx: &AppContext, request: &Request) -> Result<(Review, Ticket)> {
	let id: i64 = request.path_param("review_id")?;
	let mut conn = ctx.db.acquire().await?;
	let review = Review::get(&mut *conn, id)
		.await?
		.ok_or(ContentError::NotFound("review"))?;
	let ticket = Ticket::get(&mut *conn, review.ticket_id)
		.await?
		.ok_or(ContentError::NotFound("ticket"))?;
	Ok((review, ticket))
}

fn deny(err: ContentError, user: &User, location: &str) -> Response {
	tracing::warn!(user = %user.username, error = %err, "ownership check failed");
	redirect(location)
}
