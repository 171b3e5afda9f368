use std::path::PathBuf;

use board_rectify_core::RectifyError;
use serde::{Deserialize, Serialize};

/// Why one sample of a batch could not be processed.
#[derive(thiserror::Error, Debug)]
pub enum SampleError {
    #[error("missing input file {}", path.display())]
    MissingInput { path: PathBuf },

    #[error(transparent)]
    Rectify(#[from] RectifyError),

    #[error("i/o failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image codec failure on {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("malformed annotation {}: {source}", path.display())]
    Annotation {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Coarse failure category recorded in batch reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    MissingInput,
    InvalidCornerCount,
    DegenerateQuadrilateral,
    SingularTransform,
    IoFailure,
}

impl SampleError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SampleError::MissingInput { .. } => FailureKind::MissingInput,
            SampleError::Rectify(err) => match err {
                RectifyError::InvalidCornerCount { .. } => FailureKind::InvalidCornerCount,
                RectifyError::DegenerateQuadrilateral => FailureKind::DegenerateQuadrilateral,
                RectifyError::SingularTransform => FailureKind::SingularTransform,
                RectifyError::InvalidCanvas { .. } | RectifyError::InvalidImage { .. } => {
                    FailureKind::IoFailure
                }
            },
            SampleError::Io { .. } | SampleError::Image { .. } | SampleError::Annotation { .. } => {
                FailureKind::IoFailure
            }
        }
    }

    /// Map an open/read error, turning `NotFound` into [`SampleError::MissingInput`].
    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            SampleError::MissingInput { path }
        } else {
            SampleError::Io { path, source }
        }
    }

    /// Like [`SampleError::from_io`] for codec errors wrapping an i/o error.
    pub(crate) fn from_image(path: PathBuf, source: image::ImageError) -> Self {
        match source {
            image::ImageError::IoError(io) => Self::from_io(path, io),
            source => SampleError::Image { path, source },
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FailureKind::MissingInput => "MissingInput",
            FailureKind::InvalidCornerCount => "InvalidCornerCount",
            FailureKind::DegenerateQuadrilateral => "DegenerateQuadrilateral",
            FailureKind::SingularTransform => "SingularTransform",
            FailureKind::IoFailure => "IOFailure",
        };
        f.write_str(name)
    }
}
