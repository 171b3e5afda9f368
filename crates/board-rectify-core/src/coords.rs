//! Coordinate-space conversions.
//!
//! Annotations store corners as normalized screen coordinates with a
//! bottom-left origin. Rasters are addressed with a top-left origin. Each
//! conversion lives here so the vertical flip happens in exactly one place.

use nalgebra::Point2;

/// Flip a normalized point between bottom-left and top-left origin.
#[inline]
pub fn flip_vertical(p: Point2<f64>) -> Point2<f64> {
    Point2::new(p.x, 1.0 - p.y)
}

/// Scale a normalized top-left-origin point onto the pixel grid of a
/// `width` x `height` raster, rounding to the nearest pixel (ties to even).
#[inline]
pub fn normalized_to_pixel(p: Point2<f64>, width: usize, height: usize) -> Point2<f64> {
    let sx = width.saturating_sub(1) as f64;
    let sy = height.saturating_sub(1) as f64;
    Point2::new((p.x * sx).round_ties_even(), (p.y * sy).round_ties_even())
}
