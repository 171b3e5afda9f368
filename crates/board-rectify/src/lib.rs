//! Batch unprojection of rendered board images.
//!
//! Every sample is a pair of files in an input directory: `{i}.jpg` and a
//! `{i}.json` annotation holding the four board corners in normalized screen
//! coordinates (bottom-left origin, `[TR, BR, TL, BL]`). The batch runner
//! rectifies each board onto a fixed canvas and writes `{i}_unwrapped.jpg`.
//!
//! ## Quickstart
//!
//! ```no_run
//! use board_rectify::{BatchRunner, DirectorySink, DirectorySource, RectifyParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = DirectorySource::new("data");
//! let sink = DirectorySink::new("test", 95);
//! let count = source.discover_count();
//! let report = BatchRunner::new(RectifyParams::default()).run(&source, &sink, 0..count);
//! println!("{} ok, {} failed", report.processed.len(), report.failures.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `board_rectify::core`: geometry, homography and warping (no codecs).
//! - [`Annotation`]: the JSON sidecar, extra fields passed through untouched.
//! - [`SampleSource`] / [`SampleSink`]: where samples come from and go to.
//! - [`BatchRunner`]: per-index load, rectify, store with failure isolation.
//! - [`RunConfig`]: JSON run configuration used by the `board-rectify` binary.

pub use board_rectify_core as core;

pub use board_rectify_core::{BoardCorners, BorderMode, RectifyError, RectifyParams};

mod annotation;
mod batch;
mod config;
mod error;
mod source;

pub use annotation::Annotation;
pub use batch::{BatchFailure, BatchReport, BatchRunner, ProcessedSample};
pub use config::{ConfigError, RunConfig};
pub use error::{FailureKind, SampleError};
pub use source::{
    rectify_rgb, rgb_view, DirectorySink, DirectorySource, Sample, SampleSink, SampleSource,
};
