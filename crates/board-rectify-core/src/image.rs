use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{Homography, RectifyError};

/// Borrowed row-major interleaved raster.
#[derive(Clone, Copy, Debug)]
pub struct ImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: &'a [u8], // len = width * height * channels
}

impl<'a> ImageView<'a> {
    /// Wrap `data`, checking that its length matches the dimensions.
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        data: &'a [u8],
    ) -> Result<Self, RectifyError> {
        let expected = width * height * channels;
        if data.len() != expected || channels == 0 {
            return Err(RectifyError::InvalidImage {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: Vec<u8>,
}

impl Image {
    pub fn view(&self) -> ImageView<'_> {
        ImageView {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: &self.data,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let start = (y * self.width + x) * self.channels;
        &self.data[start..start + self.channels]
    }
}

/// What a sample outside the source raster reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderMode {
    /// Every channel reads this value (0 = black).
    Constant(u8),
    /// Clamp to the nearest edge pixel.
    Replicate,
}

impl Default for BorderMode {
    fn default() -> Self {
        BorderMode::Constant(0)
    }
}

#[inline]
fn get_channel(src: &ImageView<'_>, x: i64, y: i64, c: usize, border: BorderMode) -> u8 {
    let (w, h) = (src.width as i64, src.height as i64);
    let (x, y) = if x < 0 || y < 0 || x >= w || y >= h {
        match border {
            BorderMode::Constant(v) => return v,
            BorderMode::Replicate => (x.clamp(0, w - 1), y.clamp(0, h - 1)),
        }
    } else {
        (x, y)
    };
    src.data[(y as usize * src.width + x as usize) * src.channels + c]
}

/// Bilinear sample of channel `c` at sub-pixel position `(x, y)`.
#[inline]
pub fn sample_bilinear(src: &ImageView<'_>, x: f64, y: f64, c: usize, border: BorderMode) -> f32 {
    if src.width == 0 || src.height == 0 || !x.is_finite() || !y.is_finite() {
        return match border {
            BorderMode::Constant(v) => v as f32,
            BorderMode::Replicate => 0.0,
        };
    }

    // Beyond one pixel outside, every tap reads the border policy anyway.
    let x = x.clamp(-1.0, src.width as f64);
    let y = y.clamp(-1.0, src.height as f64);

    let x0 = x.floor();
    let y0 = y.floor();
    let fx = (x - x0) as f32;
    let fy = (y - y0) as f32;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let p00 = get_channel(src, x0, y0, c, border) as f32;
    let p10 = get_channel(src, x0 + 1, y0, c, border) as f32;
    let p01 = get_channel(src, x0, y0 + 1, c, border) as f32;
    let p11 = get_channel(src, x0 + 1, y0 + 1, c, border) as f32;

    let a = p00 + fx * (p10 - p00);
    let b = p01 + fx * (p11 - p01);
    a + fy * (b - a)
}

/// Warp into the output canvas: every integer output pixel is mapped to the
/// source via `h_img_from_rect` and sampled bilinearly.
pub fn warp_perspective(
    src: &ImageView<'_>,
    h_img_from_rect: Homography,
    out_w: usize,
    out_h: usize,
    border: BorderMode,
) -> Image {
    let channels = src.channels;
    let mut out = vec![0u8; out_w * out_h * channels];
    if out.is_empty() {
        return Image {
            width: out_w,
            height: out_h,
            channels,
            data: out,
        };
    }

    for (y, row) in out.chunks_exact_mut(out_w * channels).enumerate() {
        for (x, px) in row.chunks_exact_mut(channels).enumerate() {
            let pi = h_img_from_rect.apply(Point2::new(x as f64, y as f64));
            for (c, v) in px.iter_mut().enumerate() {
                *v = sample_bilinear(src, pi.x, pi.y, c, border)
                    .round()
                    .clamp(0.0, 255.0) as u8;
            }
        }
    }

    Image {
        width: out_w,
        height: out_h,
        channels,
        data: out,
    }
}
