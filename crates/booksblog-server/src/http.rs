use booksblog_core::exception::Result as CoreResult;
use booksblog_http::form::MAX_FORM_BODY_SIZE;
use booksblog_http::{Handler, Middleware, MiddlewareChain, Request, Response, StatusCode};
use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

use crate::shutdown::ShutdownCoordinator;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// HTTP/1 server dispatching to a handler through optional middleware.
pub struct HttpServer {
	handler: Arc<dyn Handler>,
	middlewares: Vec<Arc<dyn Middleware>>,
	max_body_size: usize,
}

impl HttpServer {
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			handler,
			middlewares: Vec::new(),
			max_body_size: MAX_FORM_BODY_SIZE,
		}
	}

	/// Largest request body read before answering 413 Payload Too Large.
	pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
		self.max_body_size = max_body_size;
		self
	}

	/// Wrap the handler; the first middleware added is the outermost.
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	fn build_handler(&self) -> Arc<dyn Handler> {
		if self.middlewares.is_empty() {
			return self.handler.clone();
		}

		let mut chain = MiddlewareChain::new(self.handler.clone());
		for middleware in &self.middlewares {
			chain.add_middleware(middleware.clone());
		}
		Arc::new(chain)
	}

	/// Serve until `coordinator` signals shutdown.
	///
	/// In-flight connections are dropped once the accept loop stops.
	pub async fn listen_with_shutdown(
		self,
		listener: TcpListener,
		coordinator: ShutdownCoordinator,
	) -> std::io::Result<()> {
		let addr = listener.local_addr()?;
		tracing::info!(%addr, "server listening on http://{}", addr);

		let handler = self.build_handler();
		let max_body_size = self.max_body_size;
		let mut shutdown_rx = coordinator.subscribe();

		loop {
			tokio::select! {
				result = listener.accept() => {
					let (stream, socket_addr) = match result {
						Ok(accepted) => accepted,
						Err(e) => {
							tracing::warn!(error = %e, "failed to accept connection");
							continue;
						}
					};
					let handler = handler.clone();
					let mut conn_shutdown = coordinator.subscribe();

					tokio::task::spawn(async move {
						tokio::select! {
							result = Self::handle_connection(stream, socket_addr, handler, max_body_size) => {
								if let Err(err) = result {
									tracing::debug!(error = %err, peer = %socket_addr, "connection error");
								}
							}
							_ = conn_shutdown.recv() => {}
						}
					});
				}
				_ = shutdown_rx.recv() => {
					tracing::info!("stopping server");
					break;
				}
			}
		}

		Ok(())
	}

	async fn handle_connection(
		stream: TcpStream,
		socket_addr: SocketAddr,
		handler: Arc<dyn Handler>,
		max_body_size: usize,
	) -> Result<(), hyper::Error> {
		let io = TokioIo::new(stream);
		let service = RequestService {
			handler,
			remote_addr: socket_addr,
			max_body_size,
		};

		http1::Builder::new().serve_connection(io, service).await
	}
}

/// Final conversion of a handler result into a response.
pub fn into_response(result: CoreResult<Response>) -> Response {
	match result {
		Ok(response) => response,
		Err(err) => {
			if err.is_server_error() {
				tracing::error!(error = %err, "unhandled server error");
			}
			Response::from(err)
		}
	}
}

struct RequestService {
	handler: Arc<dyn Handler>,
	remote_addr: SocketAddr,
	max_body_size: usize,
}

fn payload_too_large() -> Result<hyper::Response<Full<Bytes>>, BoxError> {
	Ok(hyper::Response::builder()
		.status(StatusCode::PAYLOAD_TOO_LARGE)
		.body(Full::new(Bytes::from_static(b"Request body too large")))?)
}

impl Service<hyper::Request<Incoming>> for RequestService {
	type Response = hyper::Response<Full<Bytes>>;
	type Error = BoxError;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

	fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
		let handler = self.handler.clone();
		let remote_addr = self.remote_addr;
		let max_body_size = self.max_body_size;

		Box::pin(async move {
			let declared = req
				.headers()
				.get(hyper::header::CONTENT_LENGTH)
				.and_then(|value| value.to_str().ok())
				.and_then(|value| value.parse::<u64>().ok());
			if declared.is_some_and(|len| len > max_body_size as u64) {
				tracing::warn!(peer = %remote_addr, content_length = ?declared, "request body too large");
				return payload_too_large();
			}

			let (parts, body) = req.into_parts();
			let body_bytes = match Limited::new(body, max_body_size).collect().await {
				Ok(collected) => collected.to_bytes(),
				Err(err) if err.is::<LengthLimitError>() => {
					tracing::warn!(peer = %remote_addr, "request body too large");
					return payload_too_large();
				}
				Err(err) => return Err(err),
			};

			let mut request = Request::new(
				parts.method,
				parts.uri,
				parts.version,
				parts.headers,
				body_bytes,
			);
			request.remote_addr = Some(remote_addr);

			let response = into_response(handler.handle(request).await);

			let mut hyper_response = hyper::Response::builder().status(response.status);
			for (key, value) in response.headers.iter() {
				hyper_response = hyper_response.header(key, value);
			}

			Ok(hyper_response.body(Full::new(response.body))?)
		})
	}
}
