//! Parameter types for image operations.
//!
//! These structs describe *what* to write, not *how*. They are the interface
//! between [`operations`](super::operations) (which decides which variants are
//! missing) and the [`backend`](super::backend) (which encodes pixels). This
//! separation allows swapping backends (e.g. a recording mock in tests)
//! without changing operation logic.

use std::fmt;
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Output encodings the generator writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossy WebP.
    WebP,
    /// Baseline JPEG.
    Jpeg,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::WebP => f.write_str("webp"),
            OutputFormat::Jpeg => f.write_str("jpeg"),
        }
    }
}

/// Parameters for encoding one in-memory image to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeParams {
    pub output: PathBuf,
    pub format: OutputFormat,
    pub quality: Quality,
}
