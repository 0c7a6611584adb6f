//! Query error types
//!
//! Defines the error conditions that can occur while resolving a metric
//! query. A pattern that matches nothing is not an error; it renders as an
//! explicit nil-value row instead.

use thiserror::Error;

/// Errors that can occur during query operations
#[derive(Error, Debug)]
pub enum QueryError {
    /// Queried name rejected by telemetry catalog validation
    #[error("Metric name not found in telemetry catalog: {0}")]
    Validation(String),

    /// Wildcard pattern could not be compiled
    #[error("Invalid pattern: {0}")]
    Pattern(String),
}

impl From<regex::Error> for QueryError {
    fn from(err: regex::Error) -> Self {
        QueryError::Pattern(err.to_string())
    }
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
