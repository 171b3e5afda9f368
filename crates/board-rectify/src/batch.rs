use std::{
    fs,
    path::{Path, PathBuf},
};

use board_rectify_core::RectifyParams;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{rectify_rgb, FailureKind, SampleError, SampleSink, SampleSource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedSample {
    pub index: usize,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub index: usize,
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of a batch run. Successes and failures are in index order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub processed: Vec<ProcessedSample>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.processed.len() + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }
}

/// Runs load -> rectify -> store over a range of sample indices.
///
/// A failing sample is logged and recorded; it never stops the run.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    params: RectifyParams,
}

impl BatchRunner {
    pub fn new(params: RectifyParams) -> Self {
        Self { params }
    }

    /// Process one index end to end.
    pub fn process<S, K>(&self, source: &S, sink: &K, index: usize) -> Result<PathBuf, SampleError>
    where
        S: SampleSource + ?Sized,
        K: SampleSink + ?Sized,
    {
        let sample = source.load(index)?;
        let rectified = rectify_rgb(&sample.image, &sample.corners, &self.params)?;
        sink.store(index, &rectified)
    }

    pub fn run<S, K, I>(&self, source: &S, sink: &K, indices: I) -> BatchReport
    where
        S: SampleSource + ?Sized,
        K: SampleSink + ?Sized,
        I: IntoIterator<Item = usize>,
    {
        self.run_with_progress(source, sink, indices, |_, _| {})
    }

    /// Like [`BatchRunner::run`], calling `progress(done, total)` after every
    /// index, whether it succeeded or not.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, source, sink, indices, progress))
    )]
    pub fn run_with_progress<S, K, I, P>(
        &self,
        source: &S,
        sink: &K,
        indices: I,
        mut progress: P,
    ) -> BatchReport
    where
        S: SampleSource + ?Sized,
        K: SampleSink + ?Sized,
        I: IntoIterator<Item = usize>,
        P: FnMut(usize, usize),
    {
        let indices: Vec<usize> = indices.into_iter().collect();
        let total = indices.len();
        let mut report = BatchReport::default();

        for (n, index) in indices.into_iter().enumerate() {
            match self.process(source, sink, index) {
                Ok(output) => {
                    log::info!("processed {index} ({}/{total})", n + 1);
                    report.processed.push(ProcessedSample { index, output });
                }
                Err(err) => {
                    let kind = err.kind();
                    log::warn!("skipping {index} ({}/{total}): {kind}: {err}", n + 1);
                    report.failures.push(BatchFailure {
                        index,
                        kind,
                        message: err.to_string(),
                    });
                }
            }
            progress(n + 1, total);
        }

        log::info!(
            "batch done: {} succeeded, {} failed",
            report.processed.len(),
            report.failures.len()
        );
        report
    }
}
