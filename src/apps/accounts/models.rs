//! Accounts models

pub mod follow;
pub mod user;

pub use follow::UserFollows;
pub use user::{NewUser, User};
