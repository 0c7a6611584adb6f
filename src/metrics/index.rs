//! Metric index built from a decoded snapshot sequence
//!
//! Maps metric name → ordered observation list for lookup during queries.
//!
//! # Usage
//! ```ignore
//! let index = MetricIndex::from_snapshots(&snapshots);
//! let observations = index.get("consul.raft.apply");
//! ```
//!
//! The index is built in a single pass and read-only afterward. Reloading
//! a bundle rebuilds the index rather than mutating it.

use std::collections::BTreeMap;

use crate::metrics::types::{ScalarValue, Snapshot};

/// A normalized (name, timestamp, value, labels) tuple derived from any
/// record kind
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Metric name the record was emitted under
    pub name: String,
    /// Capture timestamp, verbatim from the snapshot
    pub timestamp: String,
    /// Kind-appropriate scalar: gauge value, point value, counter count,
    /// sample mean
    pub value: ScalarValue,
    /// Sorted (key, value) label pairs; empty when absent or malformed
    pub labels: Vec<(String, String)>,
}

/// Read-only mapping from metric name to its chronological observations
///
/// Names iterate in sorted order so query output is stable across runs.
#[derive(Debug, Default, PartialEq)]
pub struct MetricIndex {
    /// name → observations in snapshot decode order
    series: BTreeMap<String, Vec<Observation>>,
    /// Snapshots consumed while building
    snapshot_count: usize,
}

impl MetricIndex {
    /// Build an index from a decoded snapshot sequence
    ///
    /// For each snapshot, in order, every record in each of the four
    /// collections (gauges, points, counters, samples, in that fixed order)
    /// appends exactly one observation under its name. Single pass, linear
    /// in total record count.
    pub fn from_snapshots(snapshots: &[Snapshot]) -> Self {
        let mut series: BTreeMap<String, Vec<Observation>> = BTreeMap::new();

        for snapshot in snapshots {
            for record in snapshot.records() {
                let observation = Observation {
                    name: record.name().to_string(),
                    timestamp: snapshot.timestamp.clone(),
                    value: record.scalar(),
                    labels: record.labels(),
                };
                series
                    .entry(observation.name.clone())
                    .or_default()
                    .push(observation);
            }
        }

        tracing::debug!(
            "Indexed {} metric names across {} snapshots",
            series.len(),
            snapshots.len()
        );

        Self {
            series,
            snapshot_count: snapshots.len(),
        }
    }

    /// Get the ordered observations for an exact metric name
    pub fn get(&self, name: &str) -> Option<&[Observation]> {
        self.series.get(name).map(|obs| obs.as_slice())
    }

    /// Check whether an exact metric name is indexed
    pub fn has_metric(&self, name: &str) -> bool {
        self.series.contains_key(name)
    }

    /// Iterate all indexed metric names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(|name| name.as_str())
    }

    /// Number of distinct metric names
    pub fn metric_count(&self) -> usize {
        self.series.len()
    }

    /// Total observations across all names
    pub fn observation_count(&self) -> usize {
        self.series.values().map(|obs| obs.len()).sum()
    }

    /// Number of snapshots the index was built from
    pub fn snapshot_count(&self) -> usize {
        self.snapshot_count
    }
}
