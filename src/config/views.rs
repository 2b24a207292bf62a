//! Project-level views

use booksblog_core::exception::{Error, Result};
use booksblog_http::{Request, Response};
use booksblog_storages::StorageError;
use std::sync::Arc;

use super::context::AppContext;

/// Serve an uploaded ticket image from media storage.
pub async fn serve_media(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let file_name: String = request.path_param("file_name")?;
	let name = format!("tickets/{}", file_name);

	let data = match ctx.storage.open(&name).await {
		Ok(data) => data,
		Err(StorageError::NotFound(_) | StorageError::InvalidName(_)) => {
			return Err(Error::NotFound(format!("No media file {}", name)));
		}
		Err(err) => return Err(err.into()),
	};

	let content_type = mime_guess::from_path(&name).first_or_octet_stream();
	Ok(Response::ok()
		.with_header("content-type", content_type.essence_str())
		.with_body(data))
}
