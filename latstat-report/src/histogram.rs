use std::collections::BTreeMap;

use latstat_common::{Measurement, SeriesKind};
use serde::Serialize;
use tracing::debug;

use crate::config::HistogramConfig;

/// `bin_count + 1` edges `bin_size * i`, describing `bin_count` right-open bins.
pub fn bin_edges(bin_size: f64, bin_count: usize) -> Vec<f64> {
    (0..=bin_count).map(|i| bin_size * i as f64).collect()
}

/// Index of the bin `[edges[i], edges[i + 1])` holding `value`, or `None`
/// when it lies below the first edge or at/above the last.
pub fn bin_index(value: f64, edges: &[f64]) -> Option<usize> {
    let above = edges.partition_point(|&edge| edge <= value);
    if above == 0 || above >= edges.len() {
        None
    } else {
        Some(above - 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinCounts {
    pub counts: Vec<u64>,
    /// Values that fell outside every bin.
    pub dropped: u64,
}

pub fn bin_counts(values: &[i64], edges: &[f64]) -> BinCounts {
    let mut counts = vec![0u64; edges.len().saturating_sub(1)];
    let mut dropped = 0;
    for &value in values {
        match bin_index(value as f64, edges) {
            Some(idx) => counts[idx] += 1,
            None => dropped += 1,
        }
    }
    BinCounts { counts, dropped }
}

/// Per-bin counts for one named source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramColumn {
    pub name: String,
    /// Number of values read from the source, binned or not.
    pub total: usize,
    pub counts: Vec<u64>,
    pub dropped: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramReport {
    pub kind: SeriesKind,
    pub edges: Vec<f64>,
    /// Sorted by name.
    pub columns: Vec<HistogramColumn>,
}

impl HistogramReport {
    /// Compute the edges once and bin every source against them.
    pub fn build(sources: &BTreeMap<String, Vec<Measurement>>, config: &HistogramConfig) -> Self {
        let kind = config.kind();
        let edges = bin_edges(config.bin_size(), config.bin_count());

        let columns = sources
            .iter()
            .map(|(name, measurements)| {
                let values: Vec<i64> = measurements.iter().map(|m| m.value_ms(kind)).collect();
                let BinCounts { counts, dropped } = bin_counts(&values, &edges);
                if dropped > 0 {
                    debug!(source = %name, %kind, dropped, "values outside histogram range");
                }
                HistogramColumn {
                    name: name.clone(),
                    total: values.len(),
                    counts,
                    dropped,
                }
            })
            .collect();

        Self {
            kind,
            edges,
            columns,
        }
    }

    /// Lower edge of every bin, i.e. all edges but the last.
    pub fn bin_starts(&self) -> &[f64] {
        &self.edges[..self.edges.len().saturating_sub(1)]
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}
