//! Where samples are read from and where rectified images go.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::PathBuf,
};

use board_rectify_core::{rectify_board, BoardCorners, ImageView, RectifyError, RectifyParams};
use image::{codecs::jpeg::JpegEncoder, ImageReader, RgbImage};

use crate::{Annotation, SampleError};

/// One image together with its board corners (normalized, top-left origin).
#[derive(Clone, Debug)]
pub struct Sample {
    pub image: RgbImage,
    pub corners: BoardCorners,
}

/// Provides samples by index.
pub trait SampleSource {
    fn load(&self, index: usize) -> Result<Sample, SampleError>;
}

/// Receives rectified images by index. Returns where the image ended up.
pub trait SampleSink {
    fn store(&self, index: usize, image: &RgbImage) -> Result<PathBuf, SampleError>;
}

/// Borrow an `image::RgbImage` as a core view.
pub fn rgb_view(img: &RgbImage) -> ImageView<'_> {
    ImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        channels: 3,
        data: img.as_raw(),
    }
}

/// Rectify an RGB image and hand the result back as an `RgbImage`.
pub fn rectify_rgb(
    img: &RgbImage,
    corners: &BoardCorners,
    params: &RectifyParams,
) -> Result<RgbImage, RectifyError> {
    let board = rectify_board(&rgb_view(img), corners, params)?;
    let (width, height) = (board.image.width, board.image.height);
    let expected = width * height * 3;
    let got = board.image.data.len();
    RgbImage::from_raw(width as u32, height as u32, board.image.data)
        .ok_or(RectifyError::InvalidImage { expected, got })
}

/// Reads `{i}.jpg` and `{i}.json` from a directory.
#[derive(Clone, Debug)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn image_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{index}.jpg"))
    }

    pub fn annotation_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{index}.json"))
    }

    /// Number of leading indices `0, 1, ...` for which an image or an
    /// annotation exists.
    pub fn discover_count(&self) -> usize {
        (0..)
            .take_while(|&i| self.image_path(i).is_file() || self.annotation_path(i).is_file())
            .count()
    }
}

impl SampleSource for DirectorySource {
    fn load(&self, index: usize) -> Result<Sample, SampleError> {
        let annotation = Annotation::load_json(self.annotation_path(index))?;
        let corners = annotation.board_corners()?;

        let image_path = self.image_path(index);
        let image = ImageReader::open(&image_path)
            .and_then(ImageReader::with_guessed_format)
            .map_err(|e| SampleError::from_io(image_path.clone(), e))?
            .decode()
            .map_err(|e| SampleError::from_image(image_path.clone(), e))?
            .to_rgb8();

        Ok(Sample { image, corners })
    }
}

/// Writes `{i}_unwrapped.jpg` into a directory.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    jpeg_quality: u8,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>, jpeg_quality: u8) -> Self {
        Self {
            dir: dir.into(),
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    pub fn output_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{index}_unwrapped.jpg"))
    }
}

impl SampleSink for DirectorySink {
    fn store(&self, index: usize, image: &RgbImage) -> Result<PathBuf, SampleError> {
        fs::create_dir_all(&self.dir).map_err(|source| SampleError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.output_path(index);
        let file = File::create(&path).map_err(|source| SampleError::Io {
            path: path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        JpegEncoder::new_with_quality(&mut writer, self.jpeg_quality)
            .encode_image(image)
            .map_err(|source| SampleError::Image {
                path: path.clone(),
                source,
            })?;
        writer.flush().map_err(|source| SampleError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
