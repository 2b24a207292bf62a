//! Image normalization for uploads.
//!
//! An uploaded image is decoded, shrunk so it fits inside a bounding box with
//! its aspect ratio kept, and re-encoded in its original format. Images that
//! already fit are stored byte-for-byte. Images are never enlarged.

use ::image::imageops::FilterType;
use ::image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
	/// Not an image, or an image format that cannot be read
	#[error("Upload a valid image. The file you uploaded was either not an image or a corrupted image: {0}")]
	Decode(String),

	#[error("Failed to encode image: {0}")]
	Encode(String),
}

impl From<ImageError> for booksblog_core::Error {
	fn from(err: ImageError) -> Self {
		match err {
			ImageError::Decode(_) => booksblog_core::Error::InvalidUpload(err.to_string()),
			ImageError::Encode(_) => booksblog_core::Error::Storage(err.to_string()),
		}
	}
}

/// Result of [`ImageNormalizer::normalize`].
#[derive(Debug, Clone)]
pub struct NormalizedImage {
	pub data: Vec<u8>,
	pub format: ImageFormat,
	pub width: u32,
	pub height: u32,
}

impl NormalizedImage {
	/// Canonical file extension of the format, e.g. `png` or `jpg`.
	pub fn extension(&self) -> &'static str {
		self.format.extensions_str().first().copied().unwrap_or("img")
	}
}

/// Shrinks images to fit `max_width` x `max_height`.
#[derive(Debug, Clone, Copy)]
pub struct ImageNormalizer {
	max_width: u32,
	max_height: u32,
}

impl ImageNormalizer {
	pub fn new(max_width: u32, max_height: u32) -> Self {
		Self {
			max_width: max_width.max(1),
			max_height: max_height.max(1),
		}
	}

	/// Dimensions of a `width` x `height` image after fitting it in the box.
	///
	/// ```
	/// use booksblog_storages::ImageNormalizer;
	///
	/// let normalizer = ImageNormalizer::new(800, 800);
	/// assert_eq!(normalizer.fit(1600, 800), (800, 400));
	/// assert_eq!(normalizer.fit(600, 3000), (160, 800));
	/// assert_eq!(normalizer.fit(300, 200), (300, 200));
	/// ```
	pub fn fit(&self, width: u32, height: u32) -> (u32, u32) {
		if width <= self.max_width && height <= self.max_height {
			return (width, height);
		}

		let (w, h) = (u64::from(width), u64::from(height));
		let (max_w, max_h) = (u64::from(self.max_width), u64::from(self.max_height));

		// Compare w/max_w against h/max_h without floating point.
		let (new_w, new_h) = if w * max_h >= h * max_w {
			(max_w, (h * max_w + w / 2) / w)
		} else {
			((w * max_h + h / 2) / h, max_h)
		};

		(new_w.max(1) as u32, new_h.max(1) as u32)
	}

	/// Decode `data` and shrink it to fit the box.
	pub fn normalize(&self, data: &[u8]) -> Result<NormalizedImage, ImageError> {
		let format =
			::image::guess_format(data).map_err(|e| ImageError::Decode(e.to_string()))?;
		let decoded = ::image::load_from_memory_with_format(data, format)
			.map_err(|e| ImageError::Decode(e.to_string()))?;

		let (width, height) = (decoded.width(), decoded.height());
		let (new_width, new_height) = self.fit(width, height);

		if (new_width, new_height) == (width, height) {
			return Ok(NormalizedImage {
				data: data.to_vec(),
				format,
				width,
				height,
			});
		}

		let resized = decoded.resize_exact(new_width, new_height, FilterType::Lanczos3);
		let data = encode(&resized, format)?;
		tracing::debug!(
			from_width = width,
			from_height = height,
			to_width = new_width,
			to_height = new_height,
			?format,
			"image downsized"
		);

		Ok(NormalizedImage {
			data,
			format,
			width: new_width,
			height: new_height,
		})
	}
}

fn encode(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, ImageError> {
	let mut buffer = Cursor::new(Vec::new());
	image
		.write_to(&mut buffer, format)
		.map_err(|e| ImageError::Encode(e.to_string()))?;
	Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
	use super::*;
	use ::image::{ImageBuffer, Rgb};
	use rstest::rstest;

	fn png(width: u32, height: u32) -> Vec<u8> {
		let buffer = ImageBuffer::from_pixel(width, height, Rgb([200u8, 30, 30]));
		encode(&DynamicImage::ImageRgb8(buffer), ImageFormat::Png).unwrap()
	}

	#[rstest]
	#[case((1600, 800), (800, 400))]
	#[case((800, 1600), (400, 800))]
	#[case((2000, 2000), (800, 800))]
	#[case((801, 10), (800, 10))]
	#[case((10000, 1), (800, 1))]
	#[case((800, 800), (800, 800))]
	#[case((1, 1), (1, 1))]
	fn test_fit(#[case] input: (u32, u32), #[case] expected: (u32, u32)) {
		assert_eq!(ImageNormalizer::new(800, 800).fit(input.0, input.1), expected);
	}

	#[rstest]
	fn test_large_image_is_downsized() {
		let normalized = ImageNormalizer::new(800, 800).normalize(&png(1600, 800)).unwrap();

		assert_eq!((normalized.width, normalized.height), (800, 400));
		assert_eq!(normalized.format, ImageFormat::Png);
		assert_eq!(normalized.extension(), "png");

		let reloaded = ::image::load_from_memory(&normalized.data).unwrap();
		assert_eq!((reloaded.width(), reloaded.height()), (800, 400));
	}

	#[rstest]
	fn test_small_image_is_kept_verbatim() {
		let original = png(120, 90);
		let normalized = ImageNormalizer::new(800, 800).normalize(&original).unwrap();

		assert_eq!((normalized.width, normalized.height), (120, 90));
		assert_eq!(normalized.data, original);
	}

	#[rstest]
	fn test_jpeg_stays_jpeg() {
		let buffer = ImageBuffer::from_pixel(1000, 500, Rgb([10u8, 20, 30]));
		let jpeg = encode(&DynamicImage::ImageRgb8(buffer), ImageFormat::Jpeg).unwrap();

		let normalized = ImageNormalizer::new(800, 800).normalize(&jpeg).unwrap();

		assert_eq!(normalized.format, ImageFormat::Jpeg);
		assert_eq!(normalized.extension(), "jpg");
		assert_eq!((normalized.width, normalized.height), (800, 400));
	}

	#[rstest]
	#[case(b"definitely not an image".as_slice())]
	#[case(b"\x89PNG\r\n\x1a\ntruncated".as_slice())]
	#[case(b"".as_slice())]
	fn test_undecodable_data_is_rejected(#[case] data: &[u8]) {
		let result = ImageNormalizer::new(800, 800).normalize(data);
		assert!(matches!(result, Err(ImageError::Decode(_))));
	}
}
