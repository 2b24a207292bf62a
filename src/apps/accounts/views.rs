//! Accounts views: login, signup, logout and the follow graph pages

use booksblog_core::exception::Result;
use booksblog_forms::FormErrors;
use booksblog_http::{AuthState, Method, Request, Response};
use serde_json::json;
use std::sync::Arc;

use super::decorators::{LOGIN_REDIRECT_URL, LOGIN_URL, current_user, success_url};
use super::errors::{AccountError, FollowError};
use super::forms::{FollowForm, LoginForm, SignupForm};
use super::models::{User, UserFollows};
use crate::config::AppContext;
use crate::shortcuts::{form_values, redirect, render};

pub const SUBSCRIBE_URL: &str = "/subscribe/";

/// Login page. Already authenticated users go straight to their feed.
pub async fn login(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	if current_user(&ctx, &request).await?.is_some() {
		return Ok(redirect(LOGIN_REDIRECT_URL));
	}

	if request.method != Method::POST {
		let next = request.query("next").unwrap_or_default().to_string();
		return render_login(&ctx, &request, next, json!({}), FormErrors::new()).await;
	}

	let data = request.form().await?;
	let next = data.get("next").unwrap_or_default().to_string();

	let errors = match LoginForm::validate(&data) {
		Ok(form) => {
			match User::authenticate(
				ctx.db.pool(),
				ctx.hasher.as_ref(),
				&form.username,
				&form.password,
			)
			.await
			{
				Ok(user) => {
					let location = success_url(Some(next.as_str()).filter(|n| !n.is_empty()));
					return start_session(&ctx, &user, &location).await;
				}
				Err(err @ AccountError::InvalidCredentials) => {
					let mut errors = FormErrors::new();
					errors.add_non_field(err.to_string());
					errors
				}
				Err(err) => return Err(err.into()),
			}
		}
		Err(errors) => errors,
	};

	render_login(&ctx, &request, next, form_values(&data, &["username"]), errors).await
}

async fn render_login(
	ctx: &AppContext,
	request: &Request,
	next: String,
	values: serde_json::Value,
	errors: FormErrors,
) -> Result<Response> {
	render(
		ctx,
		request,
		None,
		"accounts/login.html",
		json!({ "next": next, "values": values, "errors": errors }),
	)
	.await
}

/// Registration page. A new account is logged in right away.
pub async fn signup(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	if request.method != Method::POST {
		return render(
			&ctx,
			&request,
			None,
			"accounts/signup.html",
			json!({ "values": {}, "errors": FormErrors::new() }),
		)
		.await;
	}

	let data = request.form().await?;
	let errors = match SignupForm::validate(&data) {
		Ok(form) => match User::create(ctx.db.pool(), ctx.hasher.as_ref(), &form.user).await {
			Ok(user) => return start_session(&ctx, &user, LOGIN_REDIRECT_URL).await,
			Err(err @ AccountError::UsernameTaken) => {
				let mut errors = FormErrors::new();
				errors.add("username", err.to_string());
				errors
			}
			Err(err) => return Err(err.into()),
		},
		Err(errors) => errors,
	};

	render(
		&ctx,
		&request,
		None,
		"accounts/signup.html",
		json!({ "values": form_values(&data, SignupForm::FIELDS), "errors": errors }),
	)
	.await
}

async fn start_session(ctx: &AppContext, user: &User, location: &str) -> Result<Response> {
	let session = ctx.sessions.create(user.id).await?;
	tracing::info!(user_id = user.id, username = %user.username, "user logged in");
	Ok(redirect(location).with_cookie(ctx.sessions.session_cookie(&session.session_key)))
}

pub async fn logout(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	if let Some(state) = AuthState::from_request(&request) {
		ctx.sessions.delete(&state.session_key).await?;
		tracing::info!(user_id = state.user_id, "user logged out");
	}
	Ok(redirect(LOGIN_URL).with_cookie(ctx.sessions.removal_cookie()))
}

/// Follow a user by name, listing who the user follows and is followed by.
pub async fn subscribe(ctx: Arc<AppContext>, request: Request, user: User) -> Result<Response> {
	let mut errors = FormErrors::new();
	let mut values = json!({});

	if request.method == Method::POST {
		let data = request.form().await?;
		match FollowForm::validate(&data) {
			Ok(form) => match follow_by_username(&ctx, &user, &form.username).await {
				Ok(_) => return Ok(redirect(SUBSCRIBE_URL)),
				Err(
					err @ (FollowError::SelfFollow
					| FollowError::AlreadyFollowing
					| FollowError::UnknownUser(_)),
				) => errors.add("username", err.to_string()),
				Err(err) => return Err(err.into()),
			},
			Err(form_errors) => errors = form_errors,
		}
		values = form_values(&data, &["username"]);
	}

	let following = UserFollows::list_following(ctx.db.pool(), &user).await?;
	let followers = UserFollows::list_followers(ctx.db.pool(), &user).await?;

	render(
		&ctx,
		&request,
		Some(&user),
		"accounts/subscribe.html",
		json!({
			"values": values,
			"errors": errors,
			"following": following,
			"followers": followers,
		}),
	)
	.await
}

async fn follow_by_username(
	ctx: &AppContext,
	user: &User,
	username: &str,
) -> std::result::Result<UserFollows, FollowError> {
	let target = User::get_by_username(ctx.db.pool(), username)
		.await?
		.ok_or_else(|| FollowError::UnknownUser(username.to_string()))?;
	UserFollows::follow(ctx.db.pool(), user, &target).await
}

/// Stop following `unfollow_username`, reporting the outcome as a flash
/// message. Unfollowing oneself is refused with `403 Forbidden`.
pub async fn unsubscribe(ctx: Arc<AppContext>, request: Request, user: User) -> Result<Response> {
	let data = request.form().await?;
	let Some(username) = data
		.get("unfollow_username")
		.map(str::trim)
		.filter(|username| !username.is_empty())
	else {
		return Ok(redirect(SUBSCRIBE_URL));
	};

	let message = match unfollow_by_username(&ctx, &user, username).await {
		Ok(_) => format!("You unsubscribed from {}.", username),
		Err(err @ FollowError::SelfUnfollow) => {
			tracing::warn!(username = %user.username, "refused self-unsubscribe");
			return Ok(Response::forbidden().with_body(err.to_string()));
		}
		Err(err @ FollowError::UnknownUser(_)) => err.to_string(),
		Err(err) => return Err(err.into()),
	};

	if let Some(state) = AuthState::from_request(&request) {
		ctx.sessions.set_flash(&state.session_key, &message).await?;
	}
	Ok(redirect(SUBSCRIBE_URL))
}

async fn unfollow_by_username(
	ctx: &AppContext,
	user: &User,
	username: &str,
) -> std::result::Result<bool, FollowError> {
	let target = User::get_by_username(ctx.db.pool(), username)
		.await?
		.ok_or_else(|| FollowError::UnknownUser(username.to_string()))?;
	UserFollows::unfollow(ctx.db.pool(), user, &target).await
}
