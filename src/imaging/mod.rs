//! Image processing — decode, resample, encode.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Decode** | `image::ImageReader`, normalized to RGB8 |
//! | **Resize 2x** | `image::imageops::resize`, Lanczos3 |
//! | **Encode** | `webp` (lossy WebP), `image` (JPEG) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing encode operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{HIGH_DENSITY_SCALE, double_dimensions};
pub use operations::{
    VariantConfig, VariantInfo, VariantReport, VariantStatus, create_variants, get_dimensions,
    plan_variants,
};
pub use params::{EncodeParams, OutputFormat, Quality};
pub use rust_backend::RustBackend;
