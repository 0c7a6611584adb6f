//! Core data types for decoded telemetry snapshots
//!
//! This module defines the shapes a debug bundle's `metrics.json` decodes
//! into:
//! - `Snapshot`: one capture instant with its four record collections
//! - `GaugeRecord` / `PointRecord` / `SampledRecord`: the raw record shapes
//! - `MetricRecord`: a closed sum type viewing any record uniformly
//! - `ScalarValue`: a metric value that stays an integer or a float
//!
//! Snapshots are immutable once decoded; the indexer flattens them into
//! observations and drops them.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::Value;

/// A single scalar metric value as it appears in a bundle.
///
/// Integers and floats are kept apart so raw values render without
/// fabricated decimals. Scaling thresholds treat both identically.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// A whole-number value (counter counts, most gauge readings)
    Int(i64),
    /// A floating-point value (means, rates, fractional gauges)
    Float(f64),
}

impl ScalarValue {
    /// Get the value as a float for threshold comparison and arithmetic
    pub fn as_f64(&self) -> f64 {
        match self {
            ScalarValue::Int(n) => *n as f64,
            ScalarValue::Float(f) => *f,
        }
    }

    /// True when the value carries no fractional part
    pub fn is_integral(&self) -> bool {
        match self {
            ScalarValue::Int(_) => true,
            ScalarValue::Float(f) => f.fract() == 0.0,
        }
    }
}

impl Default for ScalarValue {
    fn default() -> Self {
        ScalarValue::Int(0)
    }
}

impl std::fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarValue::Int(n) => write!(f, "{}", n),
            ScalarValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// One decoded capture instant: a bundle-native timestamp string plus the
/// four record collections
///
/// The timestamp is kept verbatim; it is only parsed when a rate needs
/// elapsed time (see [`parse_capture_time`]).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Snapshot {
    /// Capture time as written by the agent, e.g. "2023-10-23 15:03:40 +0000 UTC"
    pub timestamp: String,
    /// Point-in-time gauge readings
    #[serde(default)]
    pub gauges: Vec<GaugeRecord>,
    /// Single-sample point emissions
    #[serde(default)]
    pub points: Vec<PointRecord>,
    /// Counter aggregates for the capture interval
    #[serde(default)]
    pub counters: Vec<SampledRecord>,
    /// Timing/sample aggregates for the capture interval
    #[serde(default)]
    pub samples: Vec<SampledRecord>,
}

impl Snapshot {
    /// Total records across all four collections
    pub fn record_count(&self) -> usize {
        self.gauges.len() + self.points.len() + self.counters.len() + self.samples.len()
    }

    /// Iterate every record in the fixed kind order: gauges, points,
    /// counters, samples
    ///
    /// The order only matters when multiple kinds share a name; it keeps
    /// flattened output stable in that case.
    pub fn records(&self) -> impl Iterator<Item = MetricRecord<'_>> {
        self.gauges
            .iter()
            .map(MetricRecord::Gauge)
            .chain(self.points.iter().map(MetricRecord::Point))
            .chain(self.counters.iter().map(MetricRecord::Counter))
            .chain(self.samples.iter().map(MetricRecord::Sample))
    }
}

/// A point-in-time reading of one gauge
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GaugeRecord {
    pub name: String,
    #[serde(default)]
    pub value: ScalarValue,
    /// Raw label object; normalized lazily so malformed data never fails a decode
    #[serde(default)]
    pub labels: Option<Value>,
}

/// A single numeric sample without statistical summary
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PointRecord {
    pub name: String,
    #[serde(default)]
    pub value: ScalarValue,
    #[serde(default)]
    pub labels: Option<Value>,
}

/// The statistical shape shared by counters and samples
///
/// Counters use `count` as their representative scalar, samples use `mean`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SampledRecord {
    pub name: String,
    #[serde(default)]
    pub count: ScalarValue,
    #[serde(default)]
    pub rate: f64,
    #[serde(default)]
    pub sum: f64,
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
    #[serde(default)]
    pub mean: ScalarValue,
    #[serde(default)]
    pub stddev: f64,
    #[serde(default)]
    pub labels: Option<Value>,
}

/// The kind discriminant for summaries and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Gauge,
    Point,
    Counter,
    Sample,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Gauge => write!(f, "gauge"),
            RecordKind::Point => write!(f, "point"),
            RecordKind::Counter => write!(f, "counter"),
            RecordKind::Sample => write!(f, "sample"),
        }
    }
}

/// One record of any kind, viewed uniformly for flattening
#[derive(Debug, Clone, Copy)]
pub enum MetricRecord<'a> {
    Gauge(&'a GaugeRecord),
    Point(&'a PointRecord),
    Counter(&'a SampledRecord),
    Sample(&'a SampledRecord),
}

impl<'a> MetricRecord<'a> {
    /// The metric name this record was emitted under
    pub fn name(&self) -> &'a str {
        match self {
            MetricRecord::Gauge(g) => &g.name,
            MetricRecord::Point(p) => &p.name,
            MetricRecord::Counter(c) => &c.name,
            MetricRecord::Sample(s) => &s.name,
        }
    }

    /// The kind-appropriate representative scalar: gauge value, point value,
    /// counter count, sample mean
    pub fn scalar(&self) -> ScalarValue {
        match self {
            MetricRecord::Gauge(g) => g.value,
            MetricRecord::Point(p) => p.value,
            MetricRecord::Counter(c) => c.count,
            MetricRecord::Sample(s) => s.mean,
        }
    }

    /// The record kind
    pub fn kind(&self) -> RecordKind {
        match self {
            MetricRecord::Gauge(_) => RecordKind::Gauge,
            MetricRecord::Point(_) => RecordKind::Point,
            MetricRecord::Counter(_) => RecordKind::Counter,
            MetricRecord::Sample(_) => RecordKind::Sample,
        }
    }

    /// Normalize the raw label object into sorted (key, value) pairs
    ///
    /// Only string- and number-valued entries survive; anything else
    /// (null, arrays, nested objects, a non-object `Labels` field) becomes
    /// the empty list rather than an error.
    pub fn labels(&self) -> Vec<(String, String)> {
        let raw = match self {
            MetricRecord::Gauge(g) => g.labels.as_ref(),
            MetricRecord::Point(p) => p.labels.as_ref(),
            MetricRecord::Counter(c) => c.labels.as_ref(),
            MetricRecord::Sample(s) => s.labels.as_ref(),
        };
        normalize_labels(raw)
    }
}

/// Convert an arbitrary JSON `Labels` value into sorted (key, value) pairs
pub(crate) fn normalize_labels(raw: Option<&Value>) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = match raw {
        Some(Value::Object(map)) => map
            .iter()
            .filter_map(|(key, value)| match value {
                Value::String(s) => Some((key.clone(), s.clone())),
                Value::Number(n) => Some((key.clone(), n.to_string())),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    pairs.sort();
    pairs
}

/// Parse a bundle capture timestamp
///
/// Accepts the agent's native form ("2023-10-23 15:03:40 +0000 UTC",
/// optionally with fractional seconds) as well as RFC 3339. Returns `None`
/// for anything else; callers treat that as "no elapsed time available".
pub fn parse_capture_time(raw: &str) -> Option<DateTime<FixedOffset>> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed);
    }
    // chrono cannot parse trailing zone abbreviations ("UTC", "CEST"), so
    // strip one before matching on the numeric offset.
    let without_abbreviation = trimmed
        .trim_end_matches(|c: char| c.is_ascii_alphabetic())
        .trim_end();
    DateTime::parse_from_str(without_abbreviation, "%Y-%m-%d %H:%M:%S%.f %z").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_value_decoding() {
        let int: ScalarValue = serde_json::from_str("42").unwrap();
        assert_eq!(int, ScalarValue::Int(42));

        let float: ScalarValue = serde_json::from_str("42.5").unwrap();
        assert_eq!(float, ScalarValue::Float(42.5));

        assert_eq!(int.as_f64(), 42.0);
        assert!(int.is_integral());
        assert!(!float.is_integral());
        assert!(ScalarValue::Float(7.0).is_integral());
    }

    #[test]
    fn test_snapshot_decoding() {
        let raw = r#"{
            "Timestamp": "2023-10-23 15:03:40 +0000 UTC",
            "Gauges": [
                {"Name": "agent.memory.heap", "Value": 81920, "Labels": {"node": "agent-1"}}
            ],
            "Points": [
                {"Name": "agent.txn.latency", "Value": 1.25, "Labels": {}}
            ],
            "Counters": [
                {
                    "Name": "agent.rpc.request",
                    "Count": 5,
                    "Rate": 0.5,
                    "Sum": 5,
                    "Min": 1,
                    "Max": 1,
                    "Mean": 1,
                    "Stddev": 0,
                    "Labels": {}
                }
            ],
            "Samples": [
                {
                    "Name": "agent.raft.commitTime",
                    "Count": 2,
                    "Rate": 0.2,
                    "Sum": 3.4,
                    "Min": 1.1,
                    "Max": 2.3,
                    "Mean": 1.7,
                    "Stddev": 0.6,
                    "Labels": {}
                }
            ]
        }"#;

        let snapshot: Snapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.timestamp, "2023-10-23 15:03:40 +0000 UTC");
        assert_eq!(snapshot.record_count(), 4);
        assert_eq!(snapshot.gauges[0].value, ScalarValue::Int(81920));
        assert_eq!(snapshot.points[0].value, ScalarValue::Float(1.25));
        assert_eq!(snapshot.counters[0].count, ScalarValue::Int(5));
        assert_eq!(snapshot.samples[0].mean, ScalarValue::Float(1.7));
    }

    #[test]
    fn test_missing_collections_default_empty() {
        let snapshot: Snapshot =
            serde_json::from_str(r#"{"Timestamp": "2023-10-23 15:03:40 +0000 UTC"}"#).unwrap();
        assert_eq!(snapshot.record_count(), 0);
        assert_eq!(snapshot.records().count(), 0);
    }

    #[test]
    fn test_record_iteration_order() {
        let raw = r#"{
            "Timestamp": "t",
            "Gauges": [{"Name": "g", "Value": 1}],
            "Points": [{"Name": "p", "Value": 2}],
            "Counters": [{"Name": "c", "Count": 3}],
            "Samples": [{"Name": "s", "Mean": 4}]
        }"#;
        let snapshot: Snapshot = serde_json::from_str(raw).unwrap();

        let kinds: Vec<RecordKind> = snapshot.records().map(|r| r.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                RecordKind::Gauge,
                RecordKind::Point,
                RecordKind::Counter,
                RecordKind::Sample
            ]
        );

        let scalars: Vec<f64> = snapshot.records().map(|r| r.scalar().as_f64()).collect();
        assert_eq!(scalars, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_labels_normalized_and_sorted() {
        let raw = r#"{"Name": "g", "Value": 1, "Labels": {"zone": "us-1", "dc": "dc1", "port": 8300}}"#;
        let gauge: GaugeRecord = serde_json::from_str(raw).unwrap();
        let record = MetricRecord::Gauge(&gauge);

        assert_eq!(
            record.labels(),
            vec![
                ("dc".to_string(), "dc1".to_string()),
                ("port".to_string(), "8300".to_string()),
                ("zone".to_string(), "us-1".to_string()),
            ]
        );
    }

    #[test]
    fn test_malformed_labels_become_empty() {
        // Null, arrays, and non-scalar entry values all degrade to no labels.
        let null: GaugeRecord =
            serde_json::from_str(r#"{"Name": "g", "Value": 1, "Labels": null}"#).unwrap();
        assert!(MetricRecord::Gauge(&null).labels().is_empty());

        let array: GaugeRecord =
            serde_json::from_str(r#"{"Name": "g", "Value": 1, "Labels": ["a", "b"]}"#).unwrap();
        assert!(MetricRecord::Gauge(&array).labels().is_empty());

        let nested: GaugeRecord =
            serde_json::from_str(r#"{"Name": "g", "Value": 1, "Labels": {"ok": "yes", "bad": {"x": 1}}}"#)
                .unwrap();
        assert_eq!(
            MetricRecord::Gauge(&nested).labels(),
            vec![("ok".to_string(), "yes".to_string())]
        );

        let absent: GaugeRecord = serde_json::from_str(r#"{"Name": "g", "Value": 1}"#).unwrap();
        assert!(MetricRecord::Gauge(&absent).labels().is_empty());
    }

    #[test]
    fn test_parse_capture_time() {
        let native = parse_capture_time("2023-10-23 15:03:40 +0000 UTC").unwrap();
        let rfc3339 = parse_capture_time("2023-10-23T15:03:40+00:00").unwrap();
        assert_eq!(native, rfc3339);

        let fractional = parse_capture_time("2023-10-23 15:03:40.5 +0000 UTC").unwrap();
        assert!(fractional > native);

        assert!(parse_capture_time("not a timestamp").is_none());
        assert!(parse_capture_time("").is_none());
    }

    #[test]
    fn test_sampled_record_defaults() {
        let counter: SampledRecord = serde_json::from_str(r#"{"Name": "c"}"#).unwrap();
        assert_eq!(counter.count, ScalarValue::Int(0));
        assert_eq!(counter.mean, ScalarValue::Int(0));
        assert_eq!(counter.sum, 0.0);
    }
}
