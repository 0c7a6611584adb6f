//! # Debrief
//!
//! Agent debug-bundle metrics explorer - decodes the telemetry snapshots
//! captured in a debug bundle, indexes them by metric name, and answers
//! name and wildcard queries with unit-aware formatting.
//!
//! ## Features
//!
//! - **Streaming decode**: Pull-style decoder over concatenated snapshot JSON
//! - **Name index**: Metric name → chronological observations, built once per bundle
//! - **Loose queries**: Substring and `*` wildcard matching over metric names
//! - **Unit-aware output**: Time cascades, 1024-based byte sizes, percentages
//! - **Catalog integration**: Optional name validation and unit/type lookup
//!   from the agent's telemetry reference
//!
//! ## Modules
//!
//! - [`metrics`]: Snapshot decoding and the metric index
//! - [`query`]: Pattern resolution and table rendering
//! - [`units`]: Unit-aware value and rate formatting
//! - [`catalog`]: Telemetry reference fetch and parse
//! - [`bundle`]: Bundle access and capture metadata
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use debrief::bundle::Bundle;
//! use debrief::metrics::MetricIndex;
//! use debrief::query::{QueryEngine, QueryOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Open an extracted debug bundle
//!     let bundle = Bundle::open("./agent-debug-2023-10-23")?;
//!
//!     // Decode and index every captured snapshot
//!     let snapshots = bundle.decode_snapshots()?;
//!     let index = MetricIndex::from_snapshots(&snapshots);
//!
//!     // Query by name; substring and wildcard patterns both work
//!     let engine = QueryEngine::new(index);
//!     let table = engine.query("consul.raft.apply", QueryOptions::default())?;
//!     println!("{}", table);
//!
//!     Ok(())
//! }
//! ```

pub mod bundle;
pub mod catalog;
pub mod config;
pub mod metrics;
pub mod query;
pub mod units;

// Re-export top-level types for convenience
pub use bundle::{Bundle, BundleError, DebugIndex};

pub use catalog::{CatalogClient, CatalogEntry, CatalogError, TelemetryCatalog};

pub use config::{default_config_path, generate_default_config, Config, ConfigError};

pub use metrics::{
    MetricIndex, MetricsError, MetricsResult, Observation, ScalarValue, Snapshot, SnapshotDecoder,
};

pub use query::{
    QueryEngine, QueryError, QueryOptions, QueryResult, GC_PAUSE_METRIC, PROXY_METRIC_PREFIX,
};

pub use units::{format_value, rate, UnitClass, RATE_PLACEHOLDER};
