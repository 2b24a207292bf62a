//! Accounts app: users, sessions (login, signup, logout) and the follow graph.

pub mod decorators;
pub mod errors;
pub mod forms;
pub mod models;
pub mod urls;
pub mod views;

#[cfg(test)]
mod tests;

pub use decorators::{current_user, login_required};
pub use errors::{AccountError, FollowError};
pub use models::{User, UserFollows};
