//! URL routing for booksblog.
//!
//! Routes are declared with Django-style paths where `{name}` captures one
//! path segment:
//!
//! ```rust
//! use booksblog_http::{Method, Response, handler_fn};
//! use booksblog_urls::{DefaultRouter, Route, Router};
//!
//! let mut router = DefaultRouter::new();
//! router.add_route(
//!     Route::new("/ticket/{ticket_id}/edit/", handler_fn(|_req| async { Ok(Response::ok()) }))
//!         .with_methods([Method::GET, Method::POST])
//!         .with_name("ticket_edit"),
//! ).unwrap();
//!
//! assert_eq!(router.routes().count(), 1);
//! ```

pub mod pattern;
pub mod route;
pub mod router;

pub use pattern::PathPattern;
pub use route::Route;
pub use router::{DefaultRouter, Router};
