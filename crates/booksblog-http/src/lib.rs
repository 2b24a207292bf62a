//! HTTP primitives for booksblog.
//!
//! - [`Request`] / [`Response`]: buffered request and response types
//! - [`Handler`] / [`Middleware`] / [`MiddlewareChain`]: request processing pipeline
//! - [`FormData`]: `application/x-www-form-urlencoded` and `multipart/form-data` bodies
//! - [`Extensions`]: typed per-request storage used by middleware
//! - [`AuthState`]: session identity placed in extensions by the auth layer

pub mod auth_state;
pub mod extensions;
pub mod form;
pub mod middleware;
pub mod request;
pub mod response;

pub use auth_state::AuthState;
pub use booksblog_core::exception::{Error, Result};
pub use extensions::Extensions;
pub use form::{FormData, UploadedFile};
pub use middleware::{FnHandler, Handler, Middleware, MiddlewareChain, handler_fn};
pub use request::{Request, RequestBuilder};
pub use response::Response;

pub use hyper::{HeaderMap, Method, StatusCode, Uri, Version};
