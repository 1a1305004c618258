use latstat_common::{ns_to_ms_f64, LatStatError, Measurement, Result, SeriesKind};
use serde::Serialize;

use crate::config::PercentileConfig;

/// Value at `rank` (0-100) of an ascending slice, linearly interpolated
/// between the order statistics at `floor(pos)` and `ceil(pos)` where
/// `pos = rank / 100 * (len - 1)`.
pub fn percentile(sorted: &[i64], rank: f64) -> Result<f64> {
    check_rank(rank)?;
    if sorted.is_empty() {
        return Err(LatStatError::EmptyInput(
            "cannot take a percentile of an empty series".to_string(),
        ));
    }

    let last = sorted.len() - 1;
    let position = rank / 100.0 * last as f64;
    let lower = (position.floor() as usize).min(last);
    let upper = (position.ceil() as usize).min(last);
    let fraction = position - lower as f64;

    let low = sorted[lower] as f64;
    let high = sorted[upper] as f64;
    Ok(low + fraction * (high - low))
}

pub(crate) fn check_rank(rank: f64) -> Result<()> {
    if rank.is_finite() && (0.0..=100.0).contains(&rank) {
        Ok(())
    } else {
        Err(LatStatError::InvalidRank(format!(
            "{rank} is not within 0..=100"
        )))
    }
}

/// Percentiles of one rank, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentileRow {
    pub rank: f64,
    pub ttc_ms: f64,
    pub ttfb_ms: f64,
    pub delta_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentileReport {
    /// Number of measurements the rows were computed from.
    pub count: usize,
    pub rows: Vec<PercentileRow>,
}

impl PercentileReport {
    /// Percentiles are taken over nanoseconds and only the result is
    /// converted, without truncation, to milliseconds.
    pub fn build(measurements: &[Measurement], config: &PercentileConfig) -> Result<Self> {
        if measurements.is_empty() {
            return Err(LatStatError::EmptyInput(
                "no measurements were read".to_string(),
            ));
        }

        let ttc = sorted_ns(measurements, SeriesKind::Ttc);
        let ttfb = sorted_ns(measurements, SeriesKind::Ttfb);
        let delta = sorted_ns(measurements, SeriesKind::Delta);

        let rows = config
            .ranks()
            .iter()
            .map(|&rank| {
                Ok(PercentileRow {
                    rank,
                    ttc_ms: ns_to_ms_f64(percentile(&ttc, rank)?),
                    ttfb_ms: ns_to_ms_f64(percentile(&ttfb, rank)?),
                    delta_ms: ns_to_ms_f64(percentile(&delta, rank)?),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            count: measurements.len(),
            rows,
        })
    }
}

/// One series in nanoseconds, sorted ascending.
pub fn sorted_ns(measurements: &[Measurement], kind: SeriesKind) -> Vec<i64> {
    let mut values: Vec<i64> = measurements.iter().map(|m| m.value_ns(kind)).collect();
    values.sort_unstable();
    values
}
