//! Debug bundle access
//!
//! Locates the metrics stream inside an extracted debug capture:
//!
//! - **duration**: Go-style duration string parsing for capture metadata
//!
//! A bundle is either a directory holding `metrics.json` (and usually
//! `index.json` with capture metadata) or a direct path to a metrics file.
//! The capture metadata is advisory: a missing or malformed `index.json`
//! only costs the expected-capture pre-sizing hint.

pub mod duration;

pub use duration::parse_go_duration;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::metrics::{MetricsError, Snapshot, SnapshotDecoder};

/// Metrics stream file inside a bundle directory
pub const METRICS_FILE: &str = "metrics.json";

/// Capture metadata file inside a bundle directory
pub const INDEX_FILE: &str = "index.json";

/// Capture metadata written by the agent alongside the bundle
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DebugIndex {
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub agent_version: String,
    /// Capture interval as a Go duration string, e.g. "30s"
    #[serde(default)]
    pub interval: String,
    /// Total capture window as a Go duration string, e.g. "2m2s"
    #[serde(default)]
    pub duration: String,
    /// Capture targets the agent recorded, e.g. ["metrics", "logs", "pprof"]
    #[serde(default)]
    pub targets: Vec<String>,
}

impl DebugIndex {
    /// Snapshot count the capture window implies: one per interval plus
    /// the initial capture
    pub fn expected_captures(&self) -> Option<usize> {
        let interval = parse_go_duration(&self.interval).ok()?;
        let duration = parse_go_duration(&self.duration).ok()?;
        if interval.is_zero() {
            return None;
        }
        Some((duration.as_secs_f64() / interval.as_secs_f64()) as usize + 1)
    }
}

/// An opened debug bundle
#[derive(Debug)]
pub struct Bundle {
    metrics_path: PathBuf,
    index: Option<DebugIndex>,
}

impl Bundle {
    /// Open a bundle directory or a direct metrics file path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BundleError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(BundleError::NotFound(path.to_path_buf()));
        }

        if path.is_dir() {
            let metrics_path = path.join(METRICS_FILE);
            if !metrics_path.is_file() {
                return Err(BundleError::MetricsFileMissing(path.to_path_buf()));
            }
            let index = read_debug_index(&path.join(INDEX_FILE));
            Ok(Self {
                metrics_path,
                index,
            })
        } else {
            Ok(Self {
                metrics_path: path.to_path_buf(),
                index: None,
            })
        }
    }

    /// Buffered reader over the raw metrics stream
    pub fn metrics_reader(&self) -> Result<BufReader<File>, BundleError> {
        Ok(BufReader::new(File::open(&self.metrics_path)?))
    }

    /// Decode every snapshot in the bundle, pre-sized from the capture
    /// metadata when available
    pub fn decode_snapshots(&self) -> Result<Vec<Snapshot>, BundleError> {
        let mut decoder = SnapshotDecoder::new(self.metrics_reader()?);
        if let Some(expected) = self.expected_captures() {
            decoder = decoder.with_expected_captures(expected);
        }
        Ok(decoder.decode_all()?)
    }

    /// Capture metadata, when the bundle carried a parseable `index.json`
    pub fn index(&self) -> Option<&DebugIndex> {
        self.index.as_ref()
    }

    /// Expected capture count derived from the metadata
    pub fn expected_captures(&self) -> Option<usize> {
        self.index.as_ref().and_then(DebugIndex::expected_captures)
    }

    /// Path of the metrics stream file
    pub fn metrics_path(&self) -> &Path {
        &self.metrics_path
    }
}

/// Best-effort read of capture metadata; malformed files are logged and
/// treated as absent
fn read_debug_index(path: &Path) -> Option<DebugIndex> {
    let file = File::open(path).ok()?;
    match serde_json::from_reader(BufReader::new(file)) {
        Ok(index) => Some(index),
        Err(err) => {
            tracing::warn!("Ignoring malformed {}: {}", path.display(), err);
            None
        }
    }
}

/// Errors that can occur while opening or reading a bundle
#[derive(Error, Debug)]
pub enum BundleError {
    /// Bundle path does not exist
    #[error("Bundle path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Directory exists but has no metrics stream
    #[error("No {} in bundle directory: {}", METRICS_FILE, .0.display())]
    MetricsFileMissing(PathBuf),

    /// Duration string in capture metadata failed to parse
    #[error("Invalid duration string: {0}")]
    InvalidDuration(String),

    /// I/O failure reading bundle files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metrics stream failed to decode
    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),
}
