//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the four operations the variant
//! generator needs: identify, decode, resize, and encode.
//!
//! Decoded images are always 8-bit RGB. Normalizing once at decode time means
//! every encoder sees the same color model regardless of whether the source
//! was a JPEG or a PNG with an alpha channel.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::EncodeParams;
use image::RgbImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<&RgbImage> for Dimensions {
    fn from(img: &RgbImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
        }
    }
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Get image dimensions without a full decode.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode an image and normalize it to 8-bit RGB.
    fn decode(&self, path: &Path) -> Result<RgbImage, BackendError>;

    /// Resample to exactly `target`, ignoring the source aspect ratio.
    fn resize(&self, img: &RgbImage, target: Dimensions) -> Result<RgbImage, BackendError>;

    /// Encode and write an image.
    fn encode(&self, img: &RgbImage, params: &EncodeParams) -> Result<(), BackendError>;
}
