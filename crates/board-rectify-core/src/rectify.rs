use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    normalized_to_pixel, perspective_transform, warp_perspective, BoardCorners, BorderMode,
    Homography, Image, ImageView, RectifyError,
};

pub const DEFAULT_CANVAS_SIZE: usize = 416;
pub const DEFAULT_GROWTH_FACTOR: f64 = 0.1;

fn default_canvas_size() -> usize {
    DEFAULT_CANVAS_SIZE
}

fn default_growth_factor() -> f64 {
    DEFAULT_GROWTH_FACTOR
}

/// Parameters of the board rectification.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RectifyParams {
    /// Output canvas width in pixels.
    #[serde(default = "default_canvas_size")]
    pub canvas_width: usize,

    /// Output canvas height in pixels.
    #[serde(default = "default_canvas_size")]
    pub canvas_height: usize,

    /// Relative outward growth of the quad around its diagonal center.
    /// Keeps piece tops near the board edge inside the output.
    #[serde(default = "default_growth_factor")]
    pub growth_factor: f64,

    /// Sampling policy for canvas pixels that map outside the source raster.
    #[serde(default)]
    pub border: BorderMode,
}

impl Default for RectifyParams {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_SIZE,
            canvas_height: DEFAULT_CANVAS_SIZE,
            growth_factor: DEFAULT_GROWTH_FACTOR,
            border: BorderMode::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RectifiedBoard {
    pub image: Image,
    /// Source pixel -> canvas pixel.
    pub h_rect_from_img: Homography,
    /// Canvas pixel -> source pixel.
    pub h_img_from_rect: Homography,
    /// Diagonal intersection, normalized top-left-origin coordinates.
    pub center: Point2<f64>,
    /// Grown corners in source pixel coordinates.
    pub source_corners: BoardCorners,
}

/// Rectify the board delimited by `corners` into a fixed-size top-down view.
///
/// `corners` are normalized (`0..1`) with a top-left origin, i.e. already
/// passed through [`crate::flip_vertical`] if they came from an annotation.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(src, corners, params),
        fields(width = src.width, height = src.height, growth = params.growth_factor)
    )
)]
pub fn rectify_board(
    src: &ImageView<'_>,
    corners: &BoardCorners,
    params: &RectifyParams,
) -> Result<RectifiedBoard, RectifyError> {
    let (out_w, out_h) = (params.canvas_width, params.canvas_height);
    if out_w == 0 || out_h == 0 {
        return Err(RectifyError::InvalidCanvas {
            width: out_w,
            height: out_h,
        });
    }
    let src = ImageView::new(src.width, src.height, src.channels, src.data)?;

    let center = corners
        .diagonal_center()
        .ok_or(RectifyError::DegenerateQuadrilateral)?;

    let source_corners = corners
        .grown(center, params.growth_factor)
        .map(|p| normalized_to_pixel(p, src.width, src.height));
    let canvas = BoardCorners::canvas(out_w, out_h);

    let h_rect_from_img = perspective_transform(&source_corners, &canvas)?;
    let h_img_from_rect = h_rect_from_img
        .inverse()
        .ok_or(RectifyError::SingularTransform)?;

    log::debug!(
        "rectify: center=({:.4},{:.4}) corners={:?}",
        center.x,
        center.y,
        source_corners.to_array()
    );

    let image = warp_perspective(&src, h_img_from_rect, out_w, out_h, params.border);

    Ok(RectifiedBoard {
        image,
        h_rect_from_img,
        h_img_from_rect,
        center,
        source_corners,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: usize, height: usize, rgb: [u8; 3]) -> Vec<u8> {
        rgb.iter().copied().cycle().take(width * height * 3).collect()
    }

    fn centered_rect() -> BoardCorners {
        // Pixel positions on a 101 x 101 image: x 20..80, y 10..90.
        BoardCorners {
            top_right: Point2::new(0.8, 0.1),
            bottom_right: Point2::new(0.8, 0.9),
            top_left: Point2::new(0.2, 0.1),
            bottom_left: Point2::new(0.2, 0.9),
        }
    }

    fn params(growth_factor: f64) -> RectifyParams {
        RectifyParams {
            canvas_width: 64,
            canvas_height: 48,
            growth_factor,
            ..Default::default()
        }
    }

    fn assert_close(a: Point2<f64>, b: Point2<f64>, tol: f64) {
        assert!(
            (a - b).norm() < tol,
            "expected ({:.4},{:.4}) ~ ({:.4},{:.4}) within {}",
            a.x,
            a.y,
            b.x,
            b.y,
            tol
        );
    }

    #[test]
    fn axis_aligned_rect_maps_onto_canvas_corners() {
        let data = solid(101, 101, [10, 20, 30]);
        let view = ImageView::new(101, 101, 3, &data).unwrap();
        let board = rectify_board(&view, &centered_rect(), &params(0.0)).expect("rectify");

        let expected = BoardCorners {
            top_right: Point2::new(80.0, 10.0),
            bottom_right: Point2::new(80.0, 90.0),
            top_left: Point2::new(20.0, 10.0),
            bottom_left: Point2::new(20.0, 90.0),
        };
        let canvas = BoardCorners::canvas(64, 48);
        for (src, dst) in expected.to_array().into_iter().zip(canvas.to_array()) {
            assert_close(board.h_rect_from_img.apply(src), dst, 1.0);
        }
        assert_eq!((board.image.width, board.image.height), (64, 48));
    }

    #[test]
    fn canvas_corners_round_trip_to_source_corners() {
        let data = solid(640, 480, [0, 0, 0]);
        let view = ImageView::new(640, 480, 3, &data).unwrap();
        let corners = BoardCorners {
            top_right: Point2::new(0.78, 0.18),
            bottom_right: Point2::new(0.9, 0.85),
            top_left: Point2::new(0.25, 0.2),
            bottom_left: Point2::new(0.1, 0.8),
        };
        let board = rectify_board(&view, &corners, &RectifyParams::default()).expect("rectify");

        let canvas = BoardCorners::canvas(DEFAULT_CANVAS_SIZE, DEFAULT_CANVAS_SIZE);
        for (dst, src) in canvas
            .to_array()
            .into_iter()
            .zip(board.source_corners.to_array())
        {
            assert_close(board.h_img_from_rect.apply(dst), src, 1e-3);
        }
    }

    #[test]
    fn growth_zooms_out_around_center() {
        let data = solid(101, 101, [0, 0, 0]);
        let view = ImageView::new(101, 101, 3, &data).unwrap();
        let tight = rectify_board(&view, &centered_rect(), &params(0.0)).unwrap();
        let grown = rectify_board(&view, &centered_rect(), &params(0.2)).unwrap();

        let center_px = Point2::new(50.0, 50.0);
        for canvas_corner in BoardCorners::canvas(64, 48).to_array() {
            let d_tight = (tight.h_img_from_rect.apply(canvas_corner) - center_px).norm();
            let d_grown = (grown.h_img_from_rect.apply(canvas_corner) - center_px).norm();
            assert!(d_grown > d_tight, "{d_grown} <= {d_tight}");
        }
    }

    #[test]
    fn solid_image_keeps_color_inside_board() {
        let data = solid(100, 100, [200, 40, 90]);
        let view = ImageView::new(100, 100, 3, &data).unwrap();
        let board = rectify_board(&view, &centered_rect(), &params(0.0)).unwrap();
        assert_eq!(board.image.pixel(32, 24), &[200, 40, 90]);
    }

    #[test]
    fn large_growth_samples_border_fill() {
        let data = solid(100, 100, [255, 255, 255]);
        let view = ImageView::new(100, 100, 3, &data).unwrap();
        let mut p = params(3.0);
        p.border = BorderMode::Constant(0);
        let board = rectify_board(&view, &centered_rect(), &p).unwrap();
        assert_eq!(board.image.pixel(0, 0), &[0, 0, 0]);

        p.border = BorderMode::Replicate;
        let board = rectify_board(&view, &centered_rect(), &p).unwrap();
        assert_eq!(board.image.pixel(0, 0), &[255, 255, 255]);
    }

    #[test]
    fn bow_tie_is_degenerate() {
        let data = solid(10, 10, [0, 0, 0]);
        let view = ImageView::new(10, 10, 3, &data).unwrap();
        let mut corners = centered_rect();
        std::mem::swap(&mut corners.top_left, &mut corners.bottom_left);
        assert_eq!(
            rectify_board(&view, &corners, &params(0.0)).unwrap_err(),
            RectifyError::DegenerateQuadrilateral
        );
    }

    #[test]
    fn full_shrink_is_singular() {
        let data = solid(10, 10, [0, 0, 0]);
        let view = ImageView::new(10, 10, 3, &data).unwrap();
        assert_eq!(
            rectify_board(&view, &centered_rect(), &params(-1.0)).unwrap_err(),
            RectifyError::SingularTransform
        );
    }

    #[test]
    fn zero_canvas_is_rejected() {
        let data = solid(10, 10, [0, 0, 0]);
        let view = ImageView::new(10, 10, 3, &data).unwrap();
        let mut p = params(0.0);
        p.canvas_width = 0;
        assert_eq!(
            rectify_board(&view, &centered_rect(), &p).unwrap_err(),
            RectifyError::InvalidCanvas {
                width: 0,
                height: 48
            }
        );
    }

    #[test]
    fn params_fill_defaults_from_partial_json() {
        let p: RectifyParams = serde_json::from_str(r#"{ "growth_factor": 0.25 }"#).unwrap();
        assert_eq!(p.canvas_width, 416);
        assert_eq!(p.canvas_height, 416);
        assert_eq!(p.growth_factor, 0.25);
        assert_eq!(p.border, BorderMode::Constant(0));

        let p: RectifyParams = serde_json::from_str(r#"{ "border": "replicate" }"#).unwrap();
        assert_eq!(p.border, BorderMode::Replicate);
    }
}
