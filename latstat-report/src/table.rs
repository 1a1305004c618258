use serde::Serialize;

use crate::histogram::HistogramReport;
use crate::percentile::PercentileReport;

const RANK_WIDTH: usize = 5;
const VALUE_WIDTH: usize = 20;
const COLUMN_WIDTH: usize = 10;

/// Header row followed by one row per rank, values in ms with two decimals.
pub fn render_percentiles(report: &PercentileReport) -> String {
    let mut lines = vec![percentile_line("", "connect", "first byte", "delta")];
    for row in &report.rows {
        lines.push(percentile_line(
            &row.rank.to_string(),
            &format!("{:.2}", row.ttc_ms),
            &format!("{:.2}", row.ttfb_ms),
            &format!("{:.2}", row.delta_ms),
        ));
    }
    join_lines(lines)
}

/// Gnuplot-friendly table: a `#` comment header naming each source, then
/// one row per bin starting with the bin's lower edge.
pub fn render_histogram(report: &HistogramReport) -> String {
    let mut header = vec![format!("{:<COLUMN_WIDTH$}", "#")];
    header.extend(report.names().map(column));

    let mut lines = vec![header.join(" ")];
    for (idx, start) in report.bin_starts().iter().enumerate() {
        let mut parts = vec![column(bin_label(*start))];
        parts.extend(report.columns.iter().map(|c| column(c.counts[idx])));
        lines.push(parts.join(" "));
    }
    join_lines(lines)
}

/// Bin lower edge in shortest form, switching to exponent notation when
/// the plain digits would not fit the column.
pub fn bin_label(edge: f64) -> String {
    let plain = edge.to_string();
    if plain.len() > COLUMN_WIDTH {
        format!("{edge:e}")
    } else {
        plain
    }
}

pub fn render_json<T: Serialize>(report: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report).map(|mut json| {
        json.push('\n');
        json
    })
}

fn percentile_line(rank: &str, ttc: &str, ttfb: &str, delta: &str) -> String {
    format!("{rank:>RANK_WIDTH$} {ttc:>VALUE_WIDTH$} {ttfb:>VALUE_WIDTH$} {delta:>VALUE_WIDTH$}")
}

fn column(value: impl ToString) -> String {
    format!("{:>COLUMN_WIDTH$}", value.to_string())
}

fn join_lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
