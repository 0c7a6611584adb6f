//! Per-minute rate derivation between consecutive observations
//!
//! Computes a first-difference rate between two timestamped scalars and
//! renders it through the nanosecond formatter with a "/min" suffix. Any
//! pair the rate cannot be derived from (no elapsed time, unparseable
//! timestamps) renders the placeholder instead of failing.

use crate::metrics::{parse_capture_time, Observation, ScalarValue};
use crate::units::UnitClass;

/// Rendered when no rate can be derived for a row
pub const RATE_PLACEHOLDER: &str = "-";

/// Derive the per-minute rate from `previous` to `current`
///
/// A negative value difference keeps its magnitude, so a counter reset
/// between captures reads as a large rate rather than a gap. Callers that
/// care can compare raw values themselves.
pub fn rate(current: &Observation, previous: &Observation) -> String {
    let diff = (current.value.as_f64() - previous.value.as_f64()).abs();

    let elapsed_seconds = match (
        parse_capture_time(&current.timestamp),
        parse_capture_time(&previous.timestamp),
    ) {
        (Some(cur), Some(prev)) => (cur - prev).num_milliseconds() as f64 / 1000.0,
        _ => return RATE_PLACEHOLDER.to_string(),
    };

    // diff is non-negative by construction; keep the guard symmetrical with
    // the zero-elapsed case anyway.
    if elapsed_seconds <= 0.0 || diff < 0.0 {
        return RATE_PLACEHOLDER.to_string();
    }

    let per_minute = diff / (elapsed_seconds / 60.0);
    format!(
        "{}/min",
        UnitClass::Nanoseconds.format(ScalarValue::Float(per_minute))
    )
}
