//! Ownership checks for editing and deleting content

use super::errors::ContentError;
use super::models::{Review, Ticket};
use crate::apps::accounts::models::User;

/// Content that belongs to exactly one user.
pub trait Owned {
	/// Name used in messages, e.g. `ticket`
	const KIND: &'static str;

	fn owner_id(&self) -> i64;
}

impl Owned for Ticket {
	const KIND: &'static str = "ticket";

	fn owner_id(&self) -> i64 {
		self.user_id
	}
}

impl Owned for Review {
	const KIND: &'static str = "review";

	fn owner_id(&self) -> i64 {
		self.user_id
	}
}

/// `Ok` when `user` owns `record`, else [`ContentError::NotOwner`].
pub fn ensure_owner<T: Owned>(user: &User, record: &T) -> Result<(), ContentError> {
	if record.owner_id() == user.id {
		Ok(())
	} else {
		Err(ContentError::NotOwner(T::KIND))
	}
}
