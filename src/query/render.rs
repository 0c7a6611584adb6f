//! Result rendering
//!
//! Turns matched series into column-aligned text. Rows are built with a
//! non-printable field separator between cells, then aligned by padding
//! each column to its widest cell. The renderer owns:
//!
//! - the short and full column sets
//! - label truncation
//! - descending sort by the value column
//! - the gc/min rate column for the GC pause counter
//! - the explicit nil-value row for queries that match nothing

use std::cmp::Ordering;

use crate::metrics::Observation;
use crate::units::{format_value, rate, RATE_PLACEHOLDER};

/// Internal cell delimiter, replaced by alignment padding on output
const FIELD_SEPARATOR: char = '\x1f';

/// Rendered in the Value column when a query matches nothing
pub const NIL_VALUE: &str = "nil value returned";

/// Placeholder for cells with no data (unit, type, labels, rates)
pub const CELL_PLACEHOLDER: &str = "-";

/// Labels rendered in full before truncation kicks in
const MAX_RENDERED_LABELS: usize = 3;

/// One matched metric with its resolved metadata and observations
#[derive(Debug)]
pub struct MatchedSeries<'a> {
    /// Exact metric name from the index
    pub name: &'a str,
    /// Catalog unit, or the placeholder when uncatalogued
    pub unit: String,
    /// Catalog type, or the placeholder when uncatalogued
    pub metric_type: String,
    /// Chronological observations for this name
    pub observations: &'a [Observation],
}

/// Render matched series as an aligned table
///
/// Short form emits {Timestamp, Value}, full form {Timestamp, Metric,
/// Type, Unit, Value}. A Labels column appears only when some observation
/// carries labels; a gc/min column appears only when the GC pause counter
/// is among the matches. `sort_by_value` reorders data rows descending by
/// the rendered value, leaving the two header rows in place.
pub fn render_series(
    series: &[MatchedSeries<'_>],
    gc_metric: &str,
    short_form: bool,
    sort_by_value: bool,
) -> String {
    let layout = TableLayout {
        gc_metric,
        short_form,
        with_labels: series
            .iter()
            .any(|s| s.observations.iter().any(|o| !o.labels.is_empty())),
        with_gc: series.iter().any(|s| s.name == gc_metric),
    };

    let mut titles: Vec<&str> = if layout.short_form {
        vec!["Timestamp", "Value"]
    } else {
        vec!["Timestamp", "Metric", "Type", "Unit", "Value"]
    };
    if layout.with_labels {
        titles.push("Labels");
    }
    if layout.with_gc {
        titles.push("gc/min");
    }

    let mut rows = header_rows(&titles);
    for matched in series {
        for (position, observation) in matched.observations.iter().enumerate() {
            rows.push(render_row(matched, observation, position, &layout));
        }
    }

    if sort_by_value {
        let value_index = if layout.short_form { 1 } else { 4 };
        sort_data_rows(&mut rows, value_index);
    }

    columnize(&rows)
}

/// Render the explicit row returned when a pattern matches nothing
pub fn render_nil_row(pattern: &str, short_form: bool) -> String {
    let (titles, cells) = if short_form {
        (
            vec!["Timestamp", "Value"],
            vec![CELL_PLACEHOLDER.to_string(), NIL_VALUE.to_string()],
        )
    } else {
        (
            vec!["Timestamp", "Metric", "Type", "Unit", "Value"],
            vec![
                CELL_PLACEHOLDER.to_string(),
                pattern.to_string(),
                CELL_PLACEHOLDER.to_string(),
                CELL_PLACEHOLDER.to_string(),
                NIL_VALUE.to_string(),
            ],
        )
    };

    let mut rows = header_rows(&titles);
    rows.push(join_cells(&cells));
    columnize(&rows)
}

fn header_rows(titles: &[&str]) -> Vec<String> {
    let title_row = titles.join(&FIELD_SEPARATOR.to_string());
    let rule_row = titles
        .iter()
        .map(|title| "-".repeat(title.len()))
        .collect::<Vec<_>>()
        .join(&FIELD_SEPARATOR.to_string());
    vec![title_row, rule_row]
}

/// Column set shared by every row of one rendered table
struct TableLayout<'a> {
    gc_metric: &'a str,
    short_form: bool,
    with_labels: bool,
    with_gc: bool,
}

fn render_row(
    matched: &MatchedSeries<'_>,
    observation: &Observation,
    position: usize,
    layout: &TableLayout<'_>,
) -> String {
    let mut cells = vec![observation.timestamp.clone()];
    if !layout.short_form {
        cells.push(matched.name.to_string());
        cells.push(matched.metric_type.clone());
        cells.push(matched.unit.clone());
    }
    cells.push(format_value(observation.value, &matched.unit));
    if layout.with_labels {
        cells.push(render_labels(&observation.labels));
    }
    if layout.with_gc {
        // Only the GC pause series gets real rates; the first row of a
        // series has no predecessor to diff against.
        let cell = if matched.name == layout.gc_metric && position > 0 {
            rate(observation, &matched.observations[position - 1])
        } else {
            RATE_PLACEHOLDER.to_string()
        };
        cells.push(cell);
    }
    join_cells(&cells)
}

/// Render a label cell: up to three `key=value` pairs, then a suffix
/// carrying the total label count
fn render_labels(labels: &[(String, String)]) -> String {
    if labels.is_empty() {
        return CELL_PLACEHOLDER.to_string();
    }
    let shown: Vec<String> = labels
        .iter()
        .take(MAX_RENDERED_LABELS)
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();
    let mut cell = shown.join(", ");
    if labels.len() > MAX_RENDERED_LABELS {
        cell.push_str(&format!(" + {} more ...", labels.len()));
    }
    cell
}

/// Sort data rows descending by their value cell, keeping the two header
/// rows in place
///
/// A trailing percent sign is stripped before parsing; cells that still do
/// not parse sort as zero. The sort is stable, so ties keep their
/// chronological order.
fn sort_data_rows(rows: &mut [String], value_index: usize) {
    if rows.len() <= 2 {
        return;
    }
    rows[2..].sort_by(|a, b| {
        let left = sortable_value(b, value_index);
        let right = sortable_value(a, value_index);
        left.partial_cmp(&right).unwrap_or(Ordering::Equal)
    });
}

fn sortable_value(row: &str, value_index: usize) -> f64 {
    row.split(FIELD_SEPARATOR)
        .nth(value_index)
        .map(|cell| cell.trim_end_matches('%').parse().unwrap_or(0.0))
        .unwrap_or(0.0)
}

fn join_cells(cells: &[String]) -> String {
    cells.join(&FIELD_SEPARATOR.to_string())
}

/// Align separator-delimited rows by padding each column to its widest cell
fn columnize(rows: &[String]) -> String {
    let split: Vec<Vec<&str>> = rows
        .iter()
        .map(|row| row.split(FIELD_SEPARATOR).collect())
        .collect();

    let column_count = split.iter().map(|cells| cells.len()).max().unwrap_or(0);
    let mut widths = vec![0usize; column_count];
    for cells in &split {
        for (index, cell) in cells.iter().enumerate() {
            widths[index] = widths[index].max(cell.len());
        }
    }

    split
        .iter()
        .map(|cells| {
            let mut line = String::new();
            for (index, cell) in cells.iter().enumerate() {
                if index > 0 {
                    line.push_str("  ");
                }
                line.push_str(&format!("{:<width$}", cell, width = widths[index]));
            }
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ScalarValue;

    fn observation(timestamp: &str, value: f64, labels: &[(&str, &str)]) -> Observation {
        Observation {
            name: String::new(),
            timestamp: timestamp.to_string(),
            value: ScalarValue::Float(value),
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn series<'a>(name: &'a str, unit: &str, observations: &'a [Observation]) -> MatchedSeries<'a> {
        MatchedSeries {
            name,
            unit: unit.to_string(),
            metric_type: "gauge".to_string(),
            observations,
        }
    }

    const GC: &str = "consul.runtime.gc_pause_ns";

    #[test]
    fn test_short_form_alignment() {
        let observations = vec![observation("t1", 42.0, &[])];
        let rendered = render_series(&[series("agent.m", "ns", &observations)], GC, true, false);

        assert_eq!(rendered, "Timestamp  Value\n---------  -----\nt1         42ns");
    }

    #[test]
    fn test_full_form_columns() {
        let observations = vec![observation("t1", 0.5, &[])];
        let rendered = render_series(
            &[series("agent.cpu", "percent", &observations)],
            GC,
            false,
            false,
        );
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Timestamp  Metric"));
        assert!(lines[0].contains("Type"));
        assert!(lines[0].contains("Unit"));
        assert!(lines[0].contains("Value"));
        assert!(lines[1].starts_with("---------"));
        assert!(lines[2].contains("agent.cpu"));
        assert!(lines[2].contains("50.00%"));
    }

    #[test]
    fn test_labels_column_only_when_present() {
        let unlabeled = vec![observation("t1", 1.0, &[])];
        let rendered = render_series(&[series("agent.m", "-", &unlabeled)], GC, true, false);
        assert!(!rendered.contains("Labels"));

        let labeled = vec![observation("t1", 1.0, &[("node", "agent-1")])];
        let rendered = render_series(&[series("agent.m", "-", &labeled)], GC, true, false);
        assert!(rendered.contains("Labels"));
        assert!(rendered.contains("node=agent-1"));
    }

    #[test]
    fn test_label_truncation_reports_total_count() {
        let labels = [
            ("a", "1"),
            ("b", "2"),
            ("c", "3"),
            ("d", "4"),
            ("e", "5"),
        ];
        let observations = vec![observation("t1", 1.0, &labels)];
        let rendered = render_series(&[series("agent.m", "-", &observations)], GC, true, false);

        assert!(rendered.contains("a=1, b=2, c=3 + 5 more ..."));
        assert!(!rendered.contains("d=4"));
    }

    #[test]
    fn test_three_labels_render_without_suffix() {
        let labels = [("a", "1"), ("b", "2"), ("c", "3")];
        let observations = vec![observation("t1", 1.0, &labels)];
        let rendered = render_series(&[series("agent.m", "-", &observations)], GC, true, false);

        assert!(rendered.contains("a=1, b=2, c=3"));
        assert!(!rendered.contains("more ..."));
    }

    #[test]
    fn test_sort_by_value_strips_percent() {
        let observations = vec![
            observation("t1", 0.10, &[]),
            observation("t2", 0.50, &[]),
            observation("t3", 0.05, &[]),
        ];
        let rendered = render_series(
            &[series("agent.cpu", "percent", &observations)],
            GC,
            true,
            true,
        );
        let lines: Vec<&str> = rendered.lines().collect();

        assert!(lines[2].contains("50.00%"));
        assert!(lines[3].contains("10.00%"));
        assert!(lines[4].contains("5.00%"));
        // Header rows stay put.
        assert!(lines[0].starts_with("Timestamp"));
        assert!(lines[1].starts_with("-"));
    }

    #[test]
    fn test_sort_keeps_original_order_for_unparseable_values() {
        let observations = vec![
            observation("t1", 2_000_000.0, &[]),
            observation("t2", 1_000_000.0, &[]),
        ];
        // Both render as "x.00ms" which parse as zero, so the stable sort
        // keeps chronological order.
        let rendered = render_series(&[series("agent.m", "ns", &observations)], GC, true, true);
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[2].starts_with("t1"));
        assert!(lines[3].starts_with("t2"));
    }

    #[test]
    fn test_gc_pause_series_gets_rate_column() {
        let observations = vec![
            Observation {
                name: GC.to_string(),
                timestamp: "2023-10-23 15:03:40 +0000 UTC".to_string(),
                value: ScalarValue::Float(0.0),
                labels: Vec::new(),
            },
            Observation {
                name: GC.to_string(),
                timestamp: "2023-10-23 15:04:40 +0000 UTC".to_string(),
                value: ScalarValue::Float(120.0),
                labels: Vec::new(),
            },
        ];
        let rendered = render_series(&[series(GC, "ns", &observations)], GC, true, false);
        let lines: Vec<&str> = rendered.lines().collect();

        assert!(lines[0].contains("gc/min"));
        assert!(lines[2].ends_with(RATE_PLACEHOLDER));
        assert!(lines[3].contains("120ns/min"));
    }

    #[test]
    fn test_other_series_have_no_gc_column() {
        let observations = vec![observation("t1", 1.0, &[])];
        let rendered = render_series(&[series("agent.m", "ns", &observations)], GC, true, false);
        assert!(!rendered.contains("gc/min"));
    }

    #[test]
    fn test_nil_row_full_form() {
        let rendered = render_nil_row("agent.not.there", false);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Timestamp"));
        assert!(lines[2].contains("agent.not.there"));
        assert!(lines[2].contains(NIL_VALUE));
    }

    #[test]
    fn test_nil_row_short_form() {
        let rendered = render_nil_row("agent.not.there", true);
        assert!(rendered.contains(NIL_VALUE));
        assert!(!rendered.contains("agent.not.there"));
    }

    #[test]
    fn test_multiple_series_share_one_table() {
        let first = vec![observation("t1", 1.0, &[])];
        let second = vec![observation("t1", 2.0, &[])];
        let rendered = render_series(
            &[
                series("agent.a", "-", &first),
                series("agent.b", "-", &second),
            ],
            GC,
            false,
            false,
        );
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("agent.a"));
        assert!(lines[3].contains("agent.b"));
    }
}
