//! Accounts forms

use booksblog_forms::{CharField, EmailValidator, FormErrors, UsernameValidator};
use booksblog_http::FormData;

use super::models::NewUser;

pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Registration form.
#[derive(Debug, Clone)]
pub struct SignupForm {
	pub user: NewUser,
}

impl SignupForm {
	pub const FIELDS: &'static [&'static str] = &["username", "email", "first_name", "last_name"];

	pub fn validate(data: &FormData) -> Result<Self, FormErrors> {
		let mut errors = FormErrors::new();

		let username = errors.capture(
			"username",
			CharField::new("username")
				.required()
				.with_max_length(150)
				.clean(data.get("username")),
		);
		if let Some(username) = &username
			&& let Err(err) = UsernameValidator::new().validate(username)
		{
			errors.add("username", err.to_string());
		}

		let email = errors.capture(
			"email",
			CharField::new("email")
				.required()
				.with_max_length(254)
				.clean(data.get("email")),
		);
		if let Some(email) = &email
			&& let Err(err) = EmailValidator::new().validate(email)
		{
			errors.add("email", err.to_string());
		}

		let first_name = errors.capture(
			"first_name",
			CharField::new("first_name")
				.with_max_length(150)
				.clean(data.get("first_name")),
		);
		let last_name = errors.capture(
			"last_name",
			CharField::new("last_name")
				.with_max_length(150)
				.clean(data.get("last_name")),
		);

		let password_field = CharField::new("password1")
			.required()
			.no_strip()
			.with_min_length(PASSWORD_MIN_LENGTH);
		let password1 = errors.capture("password1", password_field.clean(data.get("password1")));
		let password2 = errors.capture(
			"password2",
			CharField::new("password2")
				.required()
				.no_strip()
				.clean(data.get("password2")),
		);
		if let (Some(password1), Some(password2)) = (&password1, &password2)
			&& password1 != password2
		{
			errors.add("password2", "The two password fields didn't match.");
		}

		match (username, email, first_name, last_name, password1) {
			(Some(username), Some(email), Some(first_name), Some(last_name), Some(password))
				if errors.is_empty() =>
			{
				Ok(Self {
					user: NewUser {
						username,
						email,
						first_name,
						last_name,
						password,
					},
				})
			}
			_ => Err(errors),
		}
	}
}

#[derive(Debug, Clone)]
pub struct LoginForm {
	pub username: String,
	pub password: String,
}

impl LoginForm {
	pub fn validate(data: &FormData) -> Result<Self, FormErrors> {
		let mut errors = FormErrors::new();

		let username = errors.capture(
			"username",
			CharField::new("username").required().clean(data.get("username")),
		);
		let password = errors.capture(
			"password",
			CharField::new("password")
				.required()
				.no_strip()
				.clean(data.get("password")),
		);

		match (username, password) {
			(Some(username), Some(password)) => Ok(Self { username, password }),
			_ => Err(errors),
		}
	}
}

/// Subscribe form: the username to follow.
#[derive(Debug, Clone)]
pub struct FollowForm {
	pub username: String,
}

impl FollowForm {
	pub fn validate(data: &FormData) -> Result<Self, FormErrors> {
		let mut errors = FormErrors::new();
		let username = errors.capture(
			"username",
			CharField::new("username")
				.required()
				.with_max_length(150)
				.clean(data.get("username")),
		);
		match username {
			Some(username) => Ok(Self { username }),
			None => Err(errors),
		}
	}
}
