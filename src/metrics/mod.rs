//! Debrief Metrics Pipeline
//!
//! This module turns a bundle's raw metrics stream into a queryable index:
//!
//! - **types**: Core data structures (Snapshot, record kinds, ScalarValue)
//! - **decoder**: Pull-style decoder over concatenated snapshot JSON
//! - **index**: Name → ordered observation mapping built from snapshots
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Ingest Path:
//!   metrics.json → SnapshotDecoder → [Snapshot] → MetricIndex
//!
//! Query Path:
//!   pattern → MetricIndex lookup → Observations → rendered table
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::fs::File;
//! use std::io::BufReader;
//! use debrief::metrics::{MetricIndex, SnapshotDecoder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let file = File::open("bundle/metrics.json")?;
//!     let mut decoder = SnapshotDecoder::new(BufReader::new(file));
//!     let snapshots = decoder.decode_all()?;
//!
//!     let index = MetricIndex::from_snapshots(&snapshots);
//!     for name in index.names() {
//!         println!("{}", name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod decoder;
pub mod error;
pub mod index;
pub mod types;

// Re-export commonly used types
pub use decoder::SnapshotDecoder;
pub use error::{MetricsError, MetricsResult};
pub use index::{MetricIndex, Observation};
pub use types::{
    parse_capture_time, GaugeRecord, MetricRecord, PointRecord, RecordKind, SampledRecord,
    ScalarValue, Snapshot,
};
