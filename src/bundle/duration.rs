//! Go-style duration string parsing
//!
//! Bundle capture metadata records interval and duration the way the agent
//! wrote them: concatenated `<number><unit>` components such as `30s`,
//! `2m2s`, or `5m9.848586496s`. Fractions are allowed on any component;
//! units are ns, us (or µs), ms, s, m, h.

use std::time::Duration;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1},
    combinator::{all_consuming, map, map_res, opt},
    multi::many1,
    sequence::preceded,
    IResult,
};

use crate::bundle::BundleError;

/// Parse a Go-style duration string such as "30s" or "2m2s"
pub fn parse_go_duration(input: &str) -> Result<Duration, BundleError> {
    let (_, components) = all_consuming(many1(component))(input.trim())
        .map_err(|_| BundleError::InvalidDuration(input.to_string()))?;
    Ok(components.into_iter().sum())
}

/// One `<number>[.fraction]<unit>` component
fn component(input: &str) -> IResult<&str, Duration> {
    let (rest, whole) = map_res(digit1, str::parse::<u64>)(input)?;
    let (rest, fraction) = opt(preceded(char('.'), digit1))(rest)?;
    let (rest, unit_nanos) = unit_nanos(rest)?;

    let mut nanos = whole as f64 * unit_nanos;
    if let Some(digits) = fraction {
        let scale = 10f64.powi(digits.len() as i32);
        nanos += digits.parse::<u64>().unwrap_or(0) as f64 / scale * unit_nanos;
    }
    Ok((rest, Duration::from_nanos(nanos as u64)))
}

/// Unit suffix in nanoseconds; "ms" must be tried before "m" and "s"
fn unit_nanos(input: &str) -> IResult<&str, f64> {
    map(
        alt((
            tag("ns"),
            tag("us"),
            tag("µs"),
            tag("ms"),
            tag("s"),
            tag("m"),
            tag("h"),
        )),
        |unit: &str| match unit {
            "ns" => 1.0,
            "us" | "µs" => 1_000.0,
            "ms" => 1_000_000.0,
            "s" => 1_000_000_000.0,
            "m" => 60_000_000_000.0,
            "h" => 3_600_000_000_000.0,
            _ => unreachable!(),
        },
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_components() {
        assert_eq!(parse_go_duration("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_go_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_go_duration("2h").unwrap(), Duration::from_secs(7200));
        assert_eq!(
            parse_go_duration("250ms").unwrap(),
            Duration::from_millis(250)
        );
        assert_eq!(
            parse_go_duration("100ns").unwrap(),
            Duration::from_nanos(100)
        );
        assert_eq!(
            parse_go_duration("250us").unwrap(),
            Duration::from_micros(250)
        );
        assert_eq!(
            parse_go_duration("250µs").unwrap(),
            Duration::from_micros(250)
        );
    }

    #[test]
    fn test_compound_durations() {
        assert_eq!(parse_go_duration("2m2s").unwrap(), Duration::from_secs(122));
        assert_eq!(
            parse_go_duration("1h30m10s").unwrap(),
            Duration::from_secs(5410)
        );
    }

    #[test]
    fn test_fractional_components() {
        assert_eq!(
            parse_go_duration("9.848586496s").unwrap(),
            Duration::from_nanos(9_848_586_496)
        );
        assert_eq!(
            parse_go_duration("1.5ms").unwrap(),
            Duration::from_micros(1500)
        );
        assert_eq!(
            parse_go_duration("5m9.5s").unwrap(),
            Duration::from_millis(309_500)
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(parse_go_duration(" 30s \n").unwrap(), Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_durations() {
        for input in ["", "abc", "30", "s30", "30x", "30s junk", "m", "-5s"] {
            assert!(
                parse_go_duration(input).is_err(),
                "expected error for {:?}",
                input
            );
        }
    }
}
