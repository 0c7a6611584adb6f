//! Pull-style decoder for the bundle metrics stream
//!
//! A bundle's `metrics.json` is a sequence of concatenated JSON snapshot
//! objects, one per capture interval, with no enclosing array. The decoder
//! wraps a reader and yields one [`Snapshot`] per call until the stream is
//! exhausted.
//!
//! A malformed record aborts the whole decode. Indexing assumes snapshot
//! integrity, so there is no per-record recovery.

use std::io::Read;

use crate::metrics::error::MetricsResult;
use crate::metrics::types::Snapshot;

/// Streaming decoder over concatenated snapshot JSON
pub struct SnapshotDecoder<R: Read> {
    stream: serde_json::StreamDeserializer<'static, serde_json::de::IoRead<R>, Snapshot>,
    expected: Option<usize>,
    decoded: usize,
}

impl<R: Read> SnapshotDecoder<R> {
    /// Create a decoder over a raw metrics stream
    pub fn new(reader: R) -> Self {
        Self {
            stream: serde_json::Deserializer::from_reader(reader).into_iter(),
            expected: None,
            decoded: 0,
        }
    }

    /// Set the capture count expected from bundle interval/duration metadata
    ///
    /// The hint only pre-sizes [`decode_all`](Self::decode_all); the stream
    /// may hold fewer or more captures and both decode fully.
    pub fn with_expected_captures(mut self, expected: usize) -> Self {
        self.expected = Some(expected);
        self
    }

    /// Decode the next snapshot, or `None` once the stream is exhausted
    pub fn decode_next(&mut self) -> MetricsResult<Option<Snapshot>> {
        match self.stream.next() {
            Some(Ok(snapshot)) => {
                self.decoded += 1;
                Ok(Some(snapshot))
            }
            Some(Err(err)) => Err(err.into()),
            None => Ok(None),
        }
    }

    /// Decode every remaining snapshot in stream order
    pub fn decode_all(&mut self) -> MetricsResult<Vec<Snapshot>> {
        let mut snapshots = Vec::with_capacity(self.expected.unwrap_or(0));
        while let Some(snapshot) = self.decode_next()? {
            snapshots.push(snapshot);
        }
        tracing::debug!(
            "Decoded {} snapshots from metrics stream (expected {:?})",
            self.decoded,
            self.expected
        );
        Ok(snapshots)
    }

    /// Number of snapshots decoded so far
    pub fn captures_decoded(&self) -> usize {
        self.decoded
    }
}
