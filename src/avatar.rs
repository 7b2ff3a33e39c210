//! Avatar image pipeline: data URI codec and JPEG re-encoding.
//!
//! The cropper hands over a self-describing data URI. Before persistence the
//! image is decoded and re-encoded as JPEG at a fixed quality. Pixel
//! dimensions are preserved: this is recompression, not downscaling.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, GenericImageView, ImageEncoder};
use thiserror::Error;

/// Quality factor applied when re-encoding avatars, in `0.0..=1.0`
pub const DEFAULT_QUALITY: f32 = 0.7;

/// Errors from the avatar pipeline
#[derive(Error, Debug)]
pub enum AvatarError {
    #[error("Not a data URI (expected `data:<mime>;base64,<payload>`)")]
    InvalidDataUri,

    #[error("Base64 payload is malformed: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Image decode failed: {0}")]
    Decode(image::ImageError),

    #[error("JPEG encode failed: {0}")]
    Encode(image::ImageError),

    #[error("Avatar store write failed: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("Avatar task was cancelled")]
    Cancelled,
}

/// Split a `data:<mime>;base64,<payload>` string into its mime type and
/// decoded payload bytes.
pub fn parse_data_uri(uri: &str) -> Result<(String, Vec<u8>), AvatarError> {
    let rest = uri.strip_prefix("data:").ok_or(AvatarError::InvalidDataUri)?;
    let (header, payload) = rest.split_once(',').ok_or(AvatarError::InvalidDataUri)?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or(AvatarError::InvalidDataUri)?;
    let bytes = STANDARD.decode(payload)?;
    Ok((mime.to_string(), bytes))
}

/// Build a data URI from encoded image bytes
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Decode the image behind a data URI
pub fn decode_data_uri(uri: &str) -> Result<DynamicImage, AvatarError> {
    let (_, bytes) = parse_data_uri(uri)?;
    image::load_from_memory(&bytes).map_err(AvatarError::Decode)
}

/// Re-encode `source` (a data URI) as JPEG at `quality`, preserving pixel
/// dimensions, and return the result as a data URI.
///
/// Decode and encode are CPU-bound, so the work runs on the blocking pool.
pub async fn compress_image(source: String, quality: f32) -> Result<String, AvatarError> {
    tokio::task::spawn_blocking(move || compress_image_sync(&source, quality))
        .await
        .map_err(|_| AvatarError::Cancelled)?
}

fn compress_image_sync(source: &str, quality: f32) -> Result<String, AvatarError> {
    let img = decode_data_uri(source)?;
    let (width, height) = img.dimensions();

    // JPEG has no alpha channel; flatten to RGB before encoding
    let rgb = img.to_rgb8();
    let jpeg_quality = (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8;

    let mut buf = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buf, jpeg_quality)
        .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
        .map_err(AvatarError::Encode)?;

    tracing::debug!(
        "Re-encoded avatar: {}x{} at quality {} ({} bytes)",
        width,
        height,
        jpeg_quality,
        buf.get_ref().len()
    );

    Ok(to_data_uri("image/jpeg", buf.get_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_png_uri(width: u32, height: u32) -> String {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        to_data_uri("image/png", buf.get_ref())
    }

    #[test]
    fn data_uri_round_trip() {
        let uri = to_data_uri("image/png", &[1, 2, 3]);
        assert!(uri.starts_with("data:image/png;base64,"));
        let (mime, bytes) = parse_data_uri(&uri).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn rejects_non_data_uri() {
        assert!(matches!(
            parse_data_uri("https://example.com/avatar.png"),
            Err(AvatarError::InvalidDataUri)
        ));
        assert!(matches!(
            parse_data_uri("data:image/png,no-base64-marker"),
            Err(AvatarError::InvalidDataUri)
        ));
    }

    #[test]
    fn rejects_malformed_base64() {
        assert!(matches!(
            parse_data_uri("data:image/png;base64,@@@@"),
            Err(AvatarError::Base64(_))
        ));
    }

    #[tokio::test]
    async fn recompression_preserves_dimensions() {
        let source = sample_png_uri(48, 30);
        let result = compress_image(source, DEFAULT_QUALITY).await.unwrap();
        assert!(result.starts_with("data:image/jpeg;base64,"));
        let img = decode_data_uri(&result).unwrap();
        assert_eq!(img.dimensions(), (48, 30));
    }

    #[tokio::test]
    async fn alpha_sources_are_flattened() {
        let img = image::RgbaImage::from_pixel(12, 12, image::Rgba([200, 40, 40, 128]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        let source = to_data_uri("image/png", buf.get_ref());

        let result = compress_image(source, 0.9).await.unwrap();
        let img = decode_data_uri(&result).unwrap();
        assert_eq!(img.dimensions(), (12, 12));
    }

    #[tokio::test]
    async fn undecodable_payload_is_a_decode_error() {
        // Valid base64, not a valid image
        let source = to_data_uri("image/png", b"definitely not a PNG");
        let err = compress_image(source, DEFAULT_QUALITY).await.unwrap_err();
        assert!(matches!(err, AvatarError::Decode(_)));
    }

    #[tokio::test]
    async fn out_of_range_quality_is_clamped() {
        let source = sample_png_uri(8, 8);
        assert!(compress_image(source.clone(), 4.2).await.is_ok());
        assert!(compress_image(source, -1.0).await.is_ok());
    }
}
