use clap::ValueEnum;
use latstat_common::{LatStatError, Result, SeriesKind};
use serde::Serialize;

use crate::percentile::check_rank;

/// Percentile ranks reported when none are requested explicitly.
pub const DEFAULT_RANKS: [f64; 6] = [50.0, 75.0, 90.0, 95.0, 99.0, 99.9];

/// Number of histogram bins.
pub const DEFAULT_BIN_COUNT: usize = 64;

/// Width of one histogram bin, in milliseconds.
pub const DEFAULT_BIN_SIZE_MS: f64 = 50.0;

/// How a report is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned whitespace-separated columns
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Ranks to report, in output order. Every rank is finite and within `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentileConfig {
    ranks: Vec<f64>,
}

impl PercentileConfig {
    pub fn new(ranks: Vec<f64>) -> Result<Self> {
        if ranks.is_empty() {
            return Err(LatStatError::Usage(
                "at least one percentile rank is required".to_string(),
            ));
        }
        for &rank in &ranks {
            check_rank(rank)?;
        }
        Ok(Self { ranks })
    }

    pub fn ranks(&self) -> &[f64] {
        &self.ranks
    }
}

impl Default for PercentileConfig {
    fn default() -> Self {
        Self {
            ranks: DEFAULT_RANKS.to_vec(),
        }
    }
}

/// Which series to bin and how the shared bin edges are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramConfig {
    kind: SeriesKind,
    bin_count: usize,
    bin_size: f64,
}

impl HistogramConfig {
    /// Rejects a zero bin count, a bin size that is not a positive finite number,
    /// and a layout whose last edge is not finite.
    pub fn new(kind: SeriesKind, bin_count: usize, bin_size: f64) -> Result<Self> {
        if bin_count == 0 {
            return Err(LatStatError::Usage(
                "bin count must be at least 1".to_string(),
            ));
        }
        if !bin_size.is_finite() || bin_size <= 0.0 {
            return Err(LatStatError::Usage(format!(
                "bin size must be a positive number of milliseconds, got {bin_size}"
            )));
        }
        let last_edge = bin_size * bin_count as f64;
        if !last_edge.is_finite() {
            return Err(LatStatError::Usage(format!(
                "{bin_count} bins of {bin_size} ms overflow the histogram range"
            )));
        }
        Ok(Self {
            kind,
            bin_count,
            bin_size,
        })
    }

    pub fn with_defaults(kind: SeriesKind) -> Self {
        Self {
            kind,
            bin_count: DEFAULT_BIN_COUNT,
            bin_size: DEFAULT_BIN_SIZE_MS,
        }
    }

    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    pub fn bin_size(&self) -> f64 {
        self.bin_size
    }
}
