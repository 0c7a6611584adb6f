//! Metrics decoding and indexing error types
//!
//! Defines all errors that can occur while decoding snapshots and building
//! the metric index.

use thiserror::Error;

/// Errors that can occur while decoding or indexing metrics
#[derive(Error, Debug)]
pub enum MetricsError {
    /// I/O operation failed while reading the metrics stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot JSON failed to decode
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for MetricsError {
    fn from(err: serde_json::Error) -> Self {
        // A stream deserializer surfaces reader failures as JSON errors;
        // keep those in the Io branch so callers handle them uniformly.
        if err.is_io() {
            MetricsError::Io(err.into())
        } else {
            MetricsError::Decode(err.to_string())
        }
    }
}

/// Result type alias for metrics operations
pub type MetricsResult<T> = Result<T, MetricsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MetricsError::Decode("expected value at line 3 column 1".to_string());
        assert_eq!(
            err.to_string(),
            "Decode error: expected value at line 3 column 1"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let metrics_err: MetricsError = io_err.into();
        assert!(matches!(metrics_err, MetricsError::Io(_)));
    }

    #[test]
    fn test_syntax_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let metrics_err: MetricsError = json_err.into();
        assert!(matches!(metrics_err, MetricsError::Decode(_)));
    }
}
