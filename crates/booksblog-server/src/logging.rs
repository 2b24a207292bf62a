use async_trait::async_trait;
use booksblog_core::exception::Result;
use booksblog_http::{Handler, Middleware, Request, Response};
use std::sync::Arc;
use std::time::Instant;

/// Logs method, path, status and duration of every request.
///
/// Handler errors are logged here and passed on unchanged; 5xx failures are
/// logged at `error`, the rest at `info`.
#[derive(Debug, Default)]
pub struct LoggingMiddleware;

impl LoggingMiddleware {
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl Middleware for LoggingMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let start = Instant::now();
		let method = request.method.to_string();
		let path = request.path().to_string();

		let result = next.handle(request).await;
		let elapsed_ms = start.elapsed().as_millis() as u64;

		match &result {
			Ok(response) => {
				tracing::info!(
					%method,
					%path,
					status = response.status.as_u16(),
					elapsed_ms,
					"request completed"
				);
			}
			Err(err) if err.is_server_error() => {
				tracing::error!(
					%method,
					%path,
					status = err.status_code().as_u16(),
					elapsed_ms,
					error = %err,
					"request failed"
				);
			}
			Err(err) => {
				tracing::info!(
					%method,
					%path,
					status = err.status_code().as_u16(),
					elapsed_ms,
					error = %err,
					"request rejected"
				);
			}
		}

		result
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use booksblog_core::Error;
	use booksblog_http::{MiddlewareChain, handler_fn};
	use rstest::rstest;

	#[rstest]
	#[tokio::test]
	async fn test_passes_response_through() {
		let chain = MiddlewareChain::new(handler_fn(|_req| async {
			Ok(Response::ok().with_body("feed"))
		}))
		.with_middleware(Arc::new(LoggingMiddleware::new()));

		let response = chain
			.handle(Request::builder().uri("/home/").build().unwrap())
			.await
			.unwrap();

		assert_eq!(response.text(), "feed");
	}

	#[rstest]
	#[tokio::test]
	async fn test_passes_error_through() {
		let chain = MiddlewareChain::new(handler_fn(|_req| async {
			Err(Error::NotFound("ticket 3".into()))
		}))
		.with_middleware(Arc::new(LoggingMiddleware::new()));

		let result = chain
			.handle(Request::builder().uri("/ticket/3/edit/").build().unwrap())
			.await;

		assert!(matches!(result, Err(Error::NotFound(_))));
	}
}
