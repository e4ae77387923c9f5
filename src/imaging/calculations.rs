//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;

/// Scale factor of the high-density variants.
pub const HIGH_DENSITY_SCALE: u32 = 2;

/// Calculate the dimensions of the 2x variant.
///
/// Both edges are doubled unconditionally; returns `None` if either edge
/// would overflow `u32`.
///
/// ```
/// # use folio::imaging::{Dimensions, double_dimensions};
/// let dims = Dimensions { width: 640, height: 480 };
/// assert_eq!(
///     double_dimensions(dims),
///     Some(Dimensions { width: 1280, height: 960 })
/// );
/// ```
pub fn double_dimensions(source: Dimensions) -> Option<Dimensions> {
    Some(Dimensions {
        width: source.width.checked_mul(HIGH_DENSITY_SCALE)?,
        height: source.height.checked_mul(HIGH_DENSITY_SCALE)?,
    })
}
