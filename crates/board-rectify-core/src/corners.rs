use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{intersect_segments, RectifyError};

/// The four visible board corners of one image.
///
/// Annotations list corners as `[top_right, bottom_right, top_left, bottom_left]`.
/// Keeping them as named fields means a swapped pair cannot silently mirror
/// the rectified output.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardCorners {
    pub top_right: Point2<f64>,
    pub bottom_right: Point2<f64>,
    pub top_left: Point2<f64>,
    pub bottom_left: Point2<f64>,
}

impl BoardCorners {
    /// Build from points in annotation order (TR, BR, TL, BL).
    pub fn from_slice(points: &[Point2<f64>]) -> Result<Self, RectifyError> {
        match points {
            [tr, br, tl, bl] => Ok(Self {
                top_right: *tr,
                bottom_right: *br,
                top_left: *tl,
                bottom_left: *bl,
            }),
            _ => Err(RectifyError::InvalidCornerCount { got: points.len() }),
        }
    }

    /// Corners in annotation order (TR, BR, TL, BL).
    pub fn to_array(&self) -> [Point2<f64>; 4] {
        [
            self.top_right,
            self.bottom_right,
            self.top_left,
            self.bottom_left,
        ]
    }

    pub fn map(&self, mut f: impl FnMut(Point2<f64>) -> Point2<f64>) -> Self {
        Self {
            top_right: f(self.top_right),
            bottom_right: f(self.bottom_right),
            top_left: f(self.top_left),
            bottom_left: f(self.bottom_left),
        }
    }

    /// Destination corners of a `width` x `height` canvas, `(x, y)` pixel order.
    pub fn canvas(width: usize, height: usize) -> Self {
        let right = width.saturating_sub(1) as f64;
        let bottom = height.saturating_sub(1) as f64;
        Self {
            top_right: Point2::new(right, 0.0),
            bottom_right: Point2::new(right, bottom),
            top_left: Point2::new(0.0, 0.0),
            bottom_left: Point2::new(0.0, bottom),
        }
    }

    /// Crossing point of the diagonals TR–BL and BR–TL.
    ///
    /// `None` for a degenerate or self-intersecting (bow-tie) quadrilateral.
    pub fn diagonal_center(&self) -> Option<Point2<f64>> {
        intersect_segments(
            self.top_right,
            self.bottom_left,
            self.bottom_right,
            self.top_left,
        )
    }

    /// Push every corner away from `center` by `factor` of its current offset.
    ///
    /// `0.0` is the identity, positive values add a margin, negative values
    /// shrink the quad. No clamping to the image is done.
    pub fn grown(&self, center: Point2<f64>, factor: f64) -> Self {
        self.map(|c| center + (1.0 + factor) * (c - center))
    }
}
