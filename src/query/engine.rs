//! Query Engine
//!
//! Resolves a metric name or wildcard pattern against the MetricIndex,
//! performing:
//! 1. Optional catalog validation of the requested name
//! 2. Pattern resolution to matched index names
//! 3. Unit/type lookup per matched name
//! 4. Rendering through the result renderer
//!
//! # Execution Pipeline
//!
//! ```text
//! Pattern → Validate → Match Names → Resolve Unit/Type → Render
//! ```

use regex::Regex;

use crate::catalog::TelemetryCatalog;
use crate::metrics::MetricIndex;
use crate::query::error::{QueryError, QueryResult};
use crate::query::render::{render_nil_row, render_series, MatchedSeries, CELL_PLACEHOLDER};

/// Prefix exempting dynamic mesh-proxy metrics from catalog validation
pub const PROXY_METRIC_PREFIX: &str = "envoy.";

/// The GC pause counter that gets a derived gc/min column when queried
pub const GC_PAUSE_METRIC: &str = "consul.runtime.gc_pause_ns";

/// Per-query flags
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryOptions {
    /// Reject names the telemetry catalog does not know
    pub validate: bool,
    /// Reorder data rows descending by value
    pub sort_by_value: bool,
    /// Render the two-column short form instead of the full column set
    pub short_form: bool,
}

/// Read-only query interface over a built metric index
///
/// The catalog is optional; without one the engine skips validation and
/// renders placeholder units. Proxy prefix and GC metric name are
/// constructor-scoped so tests can rebind them.
pub struct QueryEngine {
    index: MetricIndex,
    catalog: Option<TelemetryCatalog>,
    proxy_prefix: String,
    gc_metric: String,
}

impl QueryEngine {
    /// Create an engine over a built index, without a catalog
    pub fn new(index: MetricIndex) -> Self {
        Self {
            index,
            catalog: None,
            proxy_prefix: PROXY_METRIC_PREFIX.to_string(),
            gc_metric: GC_PAUSE_METRIC.to_string(),
        }
    }

    /// Attach a telemetry catalog for validation and unit/type lookup
    pub fn with_catalog(mut self, catalog: TelemetryCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Override the validation-exempt proxy metric prefix
    pub fn with_proxy_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.proxy_prefix = prefix.into();
        self
    }

    /// Override the metric name that triggers the gc/min column
    pub fn with_gc_pause_metric(mut self, name: impl Into<String>) -> Self {
        self.gc_metric = name.into();
        self
    }

    /// The index this engine queries
    pub fn index(&self) -> &MetricIndex {
        &self.index
    }

    /// Resolve a pattern and render the matched series
    ///
    /// Always returns a rendered string on success; a pattern that matches
    /// nothing renders the explicit nil-value row rather than erroring.
    pub fn query(&self, pattern: &str, options: QueryOptions) -> QueryResult<String> {
        if options.validate {
            self.validate(pattern)?;
        }

        let matched = self.match_names(pattern)?;
        if matched.is_empty() {
            tracing::debug!("No metrics matched pattern {}", pattern);
            return Ok(render_nil_row(pattern, options.short_form));
        }
        tracing::debug!("Pattern {} matched {} metric names", pattern, matched.len());

        let series: Vec<MatchedSeries<'_>> = matched
            .iter()
            .map(|name| {
                let (unit, metric_type) = self.resolve_metadata(name);
                MatchedSeries {
                    name,
                    unit,
                    metric_type,
                    observations: self.index.get(name).unwrap_or(&[]),
                }
            })
            .collect();

        Ok(render_series(
            &series,
            &self.gc_metric,
            options.short_form,
            options.sort_by_value,
        ))
    }

    /// Resolve a pattern to matched index names, in sorted order
    ///
    /// A pattern with `*` becomes a glob over index names. A plain name
    /// matches by substring containment, so "consul.raft.apply" also
    /// matches "consul.raft.apply.durationMs". Abbreviated names resolving
    /// is the point; callers wanting exact matches query the index
    /// directly.
    pub fn match_names(&self, pattern: &str) -> QueryResult<Vec<&str>> {
        if pattern.contains('*') {
            let regex = Regex::new(&wildcard_to_regex(pattern))?;
            Ok(self
                .index
                .names()
                .filter(|name| regex.is_match(name))
                .collect())
        } else {
            Ok(self
                .index
                .names()
                .filter(|name| name.contains(pattern))
                .collect())
        }
    }

    /// Check a requested name against the catalog's known-name set
    ///
    /// Proxy metric names are dynamic and customer-defined, so anything
    /// under the proxy prefix bypasses the check. Without a catalog the
    /// check is skipped entirely.
    fn validate(&self, pattern: &str) -> QueryResult<()> {
        if pattern.starts_with(&self.proxy_prefix) {
            return Ok(());
        }
        match &self.catalog {
            Some(catalog) if catalog.contains(pattern) => Ok(()),
            Some(_) => Err(QueryError::Validation(pattern.to_string())),
            None => {
                tracing::warn!(
                    "Telemetry catalog unavailable, skipping validation for {}",
                    pattern
                );
                Ok(())
            }
        }
    }

    fn resolve_metadata(&self, name: &str) -> (String, String) {
        match self.catalog.as_ref().and_then(|catalog| catalog.lookup(name)) {
            Some(entry) => (entry.unit.clone(), entry.metric_type.clone()),
            None => (
                CELL_PLACEHOLDER.to_string(),
                CELL_PLACEHOLDER.to_string(),
            ),
        }
    }
}

/// Translate a `*` glob into an unanchored regex over metric names
fn wildcard_to_regex(pattern: &str) -> String {
    pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*")
}
