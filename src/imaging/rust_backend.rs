//! Pure Rust image backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` |
//! | Decode (JPEG, PNG) | `image::ImageReader`, then `to_rgb8` |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Encode → WebP (lossy) | `webp::Encoder` (libwebp) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//! | Write | `tempfile::NamedTempFile`, persisted without clobbering |
//!
//! The `image` crate's own WebP encoder is lossless only, so quality-driven
//! WebP goes through the `webp` crate.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{EncodeParams, OutputFormat};
use image::imageops::FilterType;
use image::{ImageEncoder, ImageReader, RgbImage};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Write `bytes` to `path` unless it already exists.
///
/// Goes through a temporary file in the target directory; the target either
/// appears complete or not at all.
fn write_new(path: &Path, bytes: &[u8]) -> Result<(), BackendError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist_noclobber(path).map_err(|e| e.error)?;
    Ok(())
}

fn save_webp(img: &RgbImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let encoder = webp::Encoder::from_rgb(img.as_raw(), img.width(), img.height());
    let encoded = encoder
        .encode_simple(false, quality as f32)
        .map_err(|e| BackendError::ProcessingFailed(format!("WebP encode failed: {e:?}")))?;
    write_new(path, &encoded)
}

fn save_jpeg(img: &RgbImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let mut encoded = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut encoded, quality as u8)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {e}")))?;
    write_new(path, &encoded)
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn decode(&self, path: &Path) -> Result<RgbImage, BackendError> {
        let img = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!(
                    "Failed to decode {}: {}",
                    path.display(),
                    e
                ))
            })?;
        Ok(img.to_rgb8())
    }

    fn resize(&self, img: &RgbImage, target: Dimensions) -> Result<RgbImage, BackendError> {
        if target.width == 0 || target.height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "Invalid target size {}x{}",
                target.width, target.height
            )));
        }
        Ok(image::imageops::resize(
            img,
            target.width,
            target.height,
            FilterType::Lanczos3,
        ))
    }

    fn encode(&self, img: &RgbImage, params: &EncodeParams) -> Result<(), BackendError> {
        let quality = params.quality.value();
        match params.format {
            OutputFormat::WebP => save_webp(img, &params.output, quality),
            OutputFormat::Jpeg => save_jpeg(img, &params.output, quality),
        }
    }
}
