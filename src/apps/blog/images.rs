//! Ticket pictures: normalization on upload and cleanup of replaced files

use booksblog_http::UploadedFile;
use uuid::Uuid;

use super::errors::ContentError;
use crate::config::AppContext;

/// Stored in place of a picture when a ticket has none.
pub const NO_IMAGE: &str = "none.png";

const UPLOAD_DIR: &str = "tickets";

/// Shrink `upload` into the configured box and store it under a fresh name.
///
/// Returns the storage name. Undecodable data fails with
/// [`ContentError::Image`] and nothing is written.
pub async fn store_upload(ctx: &AppContext, upload: &UploadedFile) -> Result<String, ContentError> {
	let image = ctx.normalizer.normalize(&upload.data)?;
	let name = format!("{}/{}.{}", UPLOAD_DIR, Uuid::new_v4().simple(), image.extension());
	let name = ctx.storage.save(&name, &image.data).await?;

	tracing::info!(
		name = %name,
		original = %upload.file_name,
		width = image.width,
		height = image.height,
		"ticket image stored"
	);
	Ok(name)
}

/// Remove a picture no ticket refers to anymore. Failures are only logged.
pub async fn discard(ctx: &AppContext, name: &str) {
	if name.is_empty() || name == NO_IMAGE {
		return;
	}
	if let Err(err) = ctx.storage.delete(name).await {
		tracing::warn!(name, error = %err, "could not remove ticket image");
	}
}
