//! JSON sidecar written next to every rendered image.

use std::{fs, path::Path};

use board_rectify_core::{flip_vertical, BoardCorners, RectifyError};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::SampleError;

/// One image annotation.
///
/// Only `corners` is interpreted. Everything else (e.g. the `config` map of
/// cell name to piece type) is kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Board corners `[TR, BR, TL, BL]`, normalized, bottom-left origin.
    pub corners: Vec<[f64; 2]>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Annotation {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SampleError> {
        let path = path.as_ref();
        let raw =
            fs::read_to_string(path).map_err(|e| SampleError::from_io(path.to_path_buf(), e))?;
        serde_json::from_str(&raw).map_err(|source| SampleError::Annotation {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SampleError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| SampleError::Annotation {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| SampleError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Corners converted to a top-left origin, ready for rectification.
    pub fn board_corners(&self) -> Result<BoardCorners, RectifyError> {
        let points: Vec<Point2<f64>> = self
            .corners
            .iter()
            .map(|&[x, y]| flip_vertical(Point2::new(x, y)))
            .collect();
        BoardCorners::from_slice(&points)
    }
}
