//! Authentication state stored in request extensions.

/// Identity attached to a request by the session middleware.
///
/// Handlers never read the session cookie themselves: the middleware loads
/// the session, and when it belongs to a user, inserts an `AuthState` into
/// [`Request::extensions`](crate::Request::extensions).
///
/// # Example
///
/// ```rust
/// use booksblog_http::{AuthState, Request};
///
/// let request = Request::builder().uri("/home/").build().unwrap();
/// request.extensions.insert(AuthState::authenticated(7, "abc"));
///
/// let state: Option<AuthState> = request.extensions.get();
/// assert_eq!(state.map(|s| s.user_id), Some(7));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
	/// Primary key of the authenticated user.
	pub user_id: i64,

	/// Key of the session the user was loaded from.
	pub session_key: String,
}

impl AuthState {
	/// Creates the state for a user loaded from `session_key`.
	pub fn authenticated(user_id: i64, session_key: impl Into<String>) -> Self {
		Self {
			user_id,
			session_key: session_key.into(),
		}
	}

	/// Reads the state the session middleware stored on `request`.
	pub fn from_request(request: &crate::Request) -> Option<Self> {
		request.extensions.get::<Self>()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Request;
	use rstest::rstest;

	#[rstest]
	fn test_authenticated() {
		let state = AuthState::authenticated(42, "key-1");

		assert_eq!(state.user_id, 42);
		assert_eq!(state.session_key, "key-1");
	}

	#[rstest]
	fn test_from_request() {
		let request = Request::builder().build().unwrap();
		assert_eq!(AuthState::from_request(&request), None);

		request.extensions.insert(AuthState::authenticated(3, "k"));
		assert_eq!(AuthState::from_request(&request).map(|s| s.user_id), Some(3));
	}
}
