//! Authentication for booksblog.
//!
//! - [`hasher`]: argon2 password hashing behind the [`PasswordHasher`] trait
//! - [`sessions`]: sessions persisted in the `auth_session` table, with a
//!   single pending flash message each
//! - [`middleware`]: [`SessionMiddleware`] resolving the session cookie into an
//!   [`AuthState`](booksblog_http::AuthState) request extension

pub mod hasher;
pub mod middleware;
pub mod sessions;

pub use hasher::{Argon2Hasher, PasswordHasher};
pub use middleware::SessionMiddleware;
pub use sessions::{DatabaseSessionBackend, Session, SessionConfig, SessionError};
