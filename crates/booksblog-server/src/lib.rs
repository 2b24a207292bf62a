//! HTTP server for booksblog.
//!
//! [`HttpServer`] accepts connections on a tokio `TcpListener`, serves each
//! connection with hyper's HTTP/1 implementation and hands every request to
//! a [`Handler`](booksblog_http::Handler), usually a router wrapped in a
//! middleware chain.

pub mod http;
pub mod logging;
pub mod shutdown;

pub use http::{HttpServer, into_response};
pub use logging::LoggingMiddleware;
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
