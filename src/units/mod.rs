//! Unit-aware value formatting
//!
//! Converts raw metric scalars into human-readable strings based on the
//! unit class the telemetry catalog reports for a metric:
//!
//! - **Time classes** (ns, ms, seconds, hours): each applies its own
//!   cascading scale-up rule, e.g. nanosecond values grow through ms, s,
//!   and h as they cross class thresholds
//! - **Bytes**: 1024-multiple cascade through KB/MB/GB/TB
//! - **Percent**: 0-1 fractions rendered as a two-decimal percentage
//! - **Unknown**: plain numeric stringification, never an error
//!
//! All formatters are stateless and value-equal across integer and float
//! input.

pub mod rate;

pub use rate::{rate, RATE_PLACEHOLDER};

use crate::metrics::ScalarValue;

const NANOS_PER_HOUR: f64 = 3_600_000_000_000.0;
const NANOS_PER_SECOND: f64 = 1_000_000_000.0;
const NANOS_PER_MILLI: f64 = 1_000_000.0;
const MILLIS_PER_HOUR: f64 = 3_600_000.0;
const MILLIS_PER_SECOND: f64 = 1000.0;
const SECONDS_PER_HOUR: f64 = 3600.0;

const BYTES_PER_KB: f64 = 1024.0;
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
const BYTES_PER_TB: f64 = 1024.0 * 1024.0 * 1024.0 * 1024.0;

/// The unit classes the formatter can scale
///
/// Classification happens once per metric from the catalog's unit string;
/// formatting dispatches on the variant, so an uncatalogued unit hits the
/// `Unknown` default case instead of a silent string mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitClass {
    Nanoseconds,
    Milliseconds,
    Seconds,
    Hours,
    Bytes,
    Percent,
    Unknown,
}

impl UnitClass {
    /// Classify a catalog unit string
    ///
    /// Matching is containment-based because catalog units are prose-ish
    /// ("percentage of physical memory", "number of bytes"). Longer class
    /// tokens are checked before their substrings ("ms" would otherwise
    /// shadow nothing, but "seconds" must not shadow "milliseconds").
    pub fn classify(unit: &str) -> Self {
        let unit = unit.trim().to_ascii_lowercase();
        if unit == "ns" || unit.contains("nanosecond") {
            UnitClass::Nanoseconds
        } else if unit == "ms" || unit.contains("millisecond") {
            UnitClass::Milliseconds
        } else if unit.contains("second") {
            UnitClass::Seconds
        } else if unit.contains("hour") {
            UnitClass::Hours
        } else if unit.contains("byte") {
            UnitClass::Bytes
        } else if unit.contains("percent") {
            UnitClass::Percent
        } else {
            UnitClass::Unknown
        }
    }

    /// Format a scalar according to this unit class
    pub fn format(&self, value: ScalarValue) -> String {
        match self {
            UnitClass::Nanoseconds => format_nanoseconds(value),
            UnitClass::Milliseconds => format_milliseconds(value),
            UnitClass::Seconds => format_seconds(value),
            UnitClass::Hours => format_hours(value),
            UnitClass::Bytes => format_bytes(value),
            UnitClass::Percent => format_percent(value),
            UnitClass::Unknown => raw_number(value),
        }
    }
}

/// Format a scalar using the catalog's unit string directly
pub fn format_value(value: ScalarValue, unit: &str) -> String {
    UnitClass::classify(unit).format(value)
}

/// Render a raw number: integers without decimals, fractions with four
pub fn raw_number(value: ScalarValue) -> String {
    if value.is_integral() {
        format!("{}", value.as_f64() as i64)
    } else {
        format!("{:.4}", value.as_f64())
    }
}

fn format_nanoseconds(value: ScalarValue) -> String {
    let v = value.as_f64();
    if v >= NANOS_PER_HOUR {
        format!("{:.2}h", v / NANOS_PER_HOUR)
    } else if v >= NANOS_PER_SECOND {
        format!("{:.2}s", v / NANOS_PER_SECOND)
    } else if v >= NANOS_PER_MILLI {
        format!("{:.2}ms", v / NANOS_PER_MILLI)
    } else {
        format!("{}ns", raw_number(value))
    }
}

fn format_milliseconds(value: ScalarValue) -> String {
    let v = value.as_f64();
    if v >= MILLIS_PER_HOUR {
        format!("{:.2}h", v / MILLIS_PER_HOUR)
    } else if v >= MILLIS_PER_SECOND {
        format!("{:.2}s", v / MILLIS_PER_SECOND)
    } else {
        format!("{}ms", raw_number(value))
    }
}

fn format_seconds(value: ScalarValue) -> String {
    let v = value.as_f64();
    if v >= SECONDS_PER_HOUR {
        format!("{:.2}h", v / SECONDS_PER_HOUR)
    } else {
        format!("{}s", raw_number(value))
    }
}

fn format_hours(value: ScalarValue) -> String {
    format!("{}h", raw_number(value))
}

fn format_bytes(value: ScalarValue) -> String {
    let v = value.as_f64();
    if v >= BYTES_PER_TB {
        format!("{:.2} TB", v / BYTES_PER_TB)
    } else if v >= BYTES_PER_GB {
        format!("{:.2} GB", v / BYTES_PER_GB)
    } else if v >= BYTES_PER_MB {
        format!("{:.2} MB", v / BYTES_PER_MB)
    } else if v >= BYTES_PER_KB {
        format!("{:.2} KB", v / BYTES_PER_KB)
    } else {
        format!("{} bytes", v as i64)
    }
}

fn format_percent(value: ScalarValue) -> String {
    format!("{:.2}%", value.as_f64() * 100.0)
}
