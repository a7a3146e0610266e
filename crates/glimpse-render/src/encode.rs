#![forbid(unsafe_code)]

//! Image encoding for device upload and previews.
//!
//! JPEG is preferred for upload latency over the device's slow link;
//! the encoder steps quality down when the result exceeds the size cap.
//! PNG is used for previews, where fidelity beats size.

use std::fmt;
use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};

/// Default JPEG quality, tuned for the device's upload bandwidth.
pub const DEFAULT_JPEG_QUALITY: u8 = 50;

/// Hard cap on encoded upload size in bytes.
pub const MAX_IMAGE_SIZE: usize = 100 * 1024;

/// Quality floor for the step-down loop.
const MIN_JPEG_QUALITY: u8 = 20;

/// Encoding failure.
#[derive(Debug)]
pub struct EncodeError(image::ImageError);

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image encoding failed: {}", self.0)
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<image::ImageError> for EncodeError {
    fn from(err: image::ImageError) -> Self {
        Self(err)
    }
}

/// Encode to JPEG at the given quality, stepping quality down by 10
/// (to a floor of 20) while the result exceeds `max_size`.
pub fn encode_jpeg(
    img: &RgbImage,
    quality: u8,
    max_size: Option<usize>,
) -> Result<Vec<u8>, EncodeError> {
    let max_size = max_size.unwrap_or(MAX_IMAGE_SIZE);
    let mut quality = quality.clamp(1, 100);
    loop {
        let bytes = encode_jpeg_once(img, quality)?;
        if bytes.len() <= max_size || quality <= MIN_JPEG_QUALITY {
            if bytes.len() > max_size {
                tracing::warn!(
                    size = bytes.len(),
                    max = max_size,
                    "encoded image exceeds size cap even at minimum quality"
                );
            }
            return Ok(bytes);
        }
        quality = quality.saturating_sub(10).max(MIN_JPEG_QUALITY);
        tracing::debug!(quality, "image over size cap, reducing quality");
    }
}

fn encode_jpeg_once(img: &RgbImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, quality).write_image(
        img.as_raw(),
        img.width(),
        img.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(out.into_inner())
}

/// Encode to PNG (lossless, used for previews).
pub fn encode_png(img: &RgbImage) -> Result<Vec<u8>, EncodeError> {
    let mut out = Cursor::new(Vec::new());
    PngEncoder::new(&mut out).write_image(
        img.as_raw(),
        img.width(),
        img.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(out.into_inner())
}
