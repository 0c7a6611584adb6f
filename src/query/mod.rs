//! Debrief Query Engine
//!
//! Answers metric-name queries against a built index:
//!
//! - **engine**: Pattern resolution, catalog validation, unit/type lookup
//! - **render**: Column-aligned table output, nil rows, gc/min rates
//! - **error**: Error types
//!
//! # Query Semantics
//!
//! ```text
//! consul.raft.apply      substring containment over index names
//! consul.raft.*          glob, * matches any run of characters
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use debrief::query::{QueryEngine, QueryOptions};
//!
//! let engine = QueryEngine::new(index).with_catalog(catalog);
//! let table = engine.query("consul.raft.apply", QueryOptions::default())?;
//! println!("{}", table);
//! ```

pub mod engine;
pub mod error;
pub mod render;

pub use engine::{QueryEngine, QueryOptions, GC_PAUSE_METRIC, PROXY_METRIC_PREFIX};
pub use error::{QueryError, QueryResult};
pub use render::{render_nil_row, render_series, MatchedSeries, CELL_PLACEHOLDER, NIL_VALUE};
