//! Database access for booksblog.
//!
//! A thin layer over `sqlx`'s SQLite pool: connection setup with foreign
//! keys enforced, the embedded schema migrations, and the error type the
//! model code converts `sqlx` failures into.

pub mod connection;
pub mod error;

pub use connection::{DatabaseConfig, DatabaseConnection};
pub use error::{DbError, DbResult, is_unique_violation};

pub use sqlx;
