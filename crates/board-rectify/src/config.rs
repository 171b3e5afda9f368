//! JSON configuration for a batch run.

use std::{
    fs,
    path::{Path, PathBuf},
};

use board_rectify_core::RectifyParams;
use serde::{Deserialize, Serialize};

use crate::{DirectorySink, DirectorySource};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("jpeg quality must be in 1..=100, got {0}")]
    JpegQuality(u8),
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("test")
}

fn default_jpeg_quality() -> u8 {
    95
}

/// Configuration of one batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Number of indices to process. Discovered from the input directory
    /// when absent.
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub start: usize,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    #[serde(default)]
    pub report_path: Option<PathBuf>,
    #[serde(flatten)]
    pub rectify: RectifyParams,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            count: None,
            start: 0,
            jpeg_quality: default_jpeg_quality(),
            report_path: None,
            rectify: RectifyParams::default(),
        }
    }
}

impl RunConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::JpegQuality(self.jpeg_quality));
        }
        Ok(())
    }

    pub fn source(&self) -> DirectorySource {
        DirectorySource::new(&self.input_dir)
    }

    pub fn sink(&self) -> DirectorySink {
        DirectorySink::new(&self.output_dir, self.jpeg_quality)
    }

    /// Indices to process: `start..start + count`, with `count` discovered
    /// from the input directory when not configured.
    pub fn indices(&self, source: &DirectorySource) -> std::ops::Range<usize> {
        let end = match self.count {
            Some(count) => self.start.saturating_add(count),
            None => source.discover_count().max(self.start),
        };
        self.start..end
    }
}
