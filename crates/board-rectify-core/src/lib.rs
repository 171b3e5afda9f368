//! Core geometry for unprojecting annotated board images.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete image codec: rasters are passed in as borrowed
//! interleaved `u8` buffers ([`ImageView`]) and come back as owned [`Image`]s.
//!
//! The pipeline implemented by [`rectify_board`]:
//! 1. intersect the two diagonals of the annotated quadrilateral,
//! 2. grow every corner away from that center by a configurable factor,
//! 3. convert the normalized corners to pixel coordinates,
//! 4. solve the 4-point homography onto a fixed output canvas,
//! 5. resample the source through its inverse with bilinear interpolation.
//!
//! ## Quickstart
//!
//! ```
//! use board_rectify_core::{rectify_board, BoardCorners, ImageView, RectifyParams};
//! use nalgebra::Point2;
//!
//! let data = vec![128u8; 64 * 48 * 3];
//! let view = ImageView::new(64, 48, 3, &data).unwrap();
//! let corners = BoardCorners {
//!     top_right: Point2::new(0.9, 0.1),
//!     bottom_right: Point2::new(0.9, 0.9),
//!     top_left: Point2::new(0.1, 0.1),
//!     bottom_left: Point2::new(0.1, 0.9),
//! };
//! let params = RectifyParams { canvas_width: 32, canvas_height: 32, ..Default::default() };
//! let board = rectify_board(&view, &corners, &params).unwrap();
//! assert_eq!(board.image.width, 32);
//! ```

mod coords;
mod corners;
mod error;
mod homography;
mod image;
mod logger;
mod rectify;
mod segment;

pub use coords::{flip_vertical, normalized_to_pixel};
pub use corners::BoardCorners;
pub use error::RectifyError;
pub use homography::{homography_from_4pt, perspective_transform, Homography};
pub use image::{sample_bilinear, warp_perspective, BorderMode, Image, ImageView};
pub use rectify::{
    rectify_board, RectifiedBoard, RectifyParams, DEFAULT_CANVAS_SIZE, DEFAULT_GROWTH_FACTOR,
};
pub use segment::{intersect_segments, SEGMENT_COINCIDENCE_TOL};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
