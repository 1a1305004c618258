use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod parse;

pub use parse::{parse_line, read_measurements};

/// Nanoseconds in one millisecond.
pub const NANOS_PER_MILLI: i64 = 1_000_000;

/// Error types for latstat operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LatStatError {
    #[error("Malformed line {line}: {reason}: {content:?}")]
    MalformedLine {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("Usage error: {0}")]
    Usage(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Invalid percentile rank: {0}")]
    InvalidRank(String),

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("{path}: {error}")]
    InSource {
        path: String,
        error: Box<LatStatError>,
    },
}

impl LatStatError {
    /// `true` for errors caused by how the tool was invoked rather than by the data it read.
    pub fn is_usage(&self) -> bool {
        matches!(self, LatStatError::Usage(_) | LatStatError::InvalidRank(_))
    }
}

/// Result type for latstat operations
pub type Result<T> = std::result::Result<T, LatStatError>;

/// Which of the three per-line latencies a report is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Ttc,
    Ttfb,
    Delta,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 3] = [SeriesKind::Ttc, SeriesKind::Ttfb, SeriesKind::Delta];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ttc" => Some(SeriesKind::Ttc),
            "ttfb" => Some(SeriesKind::Ttfb),
            "delta" => Some(SeriesKind::Delta),
            _ => None,
        }
    }

    pub fn as_name(&self) -> &'static str {
        match self {
            SeriesKind::Ttc => "ttc",
            SeriesKind::Ttfb => "ttfb",
            SeriesKind::Delta => "delta",
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_name())
    }
}

/// One input line: time to connect and time to first byte, both in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    pub ttc_ns: i64,
    pub ttfb_ns: i64,
}

impl Measurement {
    pub fn new(ttc_ns: i64, ttfb_ns: i64) -> Self {
        Self { ttc_ns, ttfb_ns }
    }

    pub fn delta_ns(&self) -> i64 {
        self.ttfb_ns.saturating_sub(self.ttc_ns)
    }

    pub fn value_ns(&self, kind: SeriesKind) -> i64 {
        match kind {
            SeriesKind::Ttc => self.ttc_ns,
            SeriesKind::Ttfb => self.ttfb_ns,
            SeriesKind::Delta => self.delta_ns(),
        }
    }

    pub fn ttc_ms(&self) -> i64 {
        ns_to_ms(self.ttc_ns)
    }

    pub fn ttfb_ms(&self) -> i64 {
        ns_to_ms(self.ttfb_ns)
    }

    /// Difference of the already-truncated millisecond values, so it can differ
    /// by one from `ns_to_ms(delta_ns())`.
    pub fn delta_ms(&self) -> i64 {
        self.ttfb_ms() - self.ttc_ms()
    }

    pub fn value_ms(&self, kind: SeriesKind) -> i64 {
        match kind {
            SeriesKind::Ttc => self.ttc_ms(),
            SeriesKind::Ttfb => self.ttfb_ms(),
            SeriesKind::Delta => self.delta_ms(),
        }
    }
}

/// Truncating nanosecond to millisecond conversion used for histogram binning.
pub fn ns_to_ms(ns: i64) -> i64 {
    ns / NANOS_PER_MILLI
}

/// Non-truncating conversion used for percentile output.
pub fn ns_to_ms_f64(ns: f64) -> f64 {
    ns / NANOS_PER_MILLI as f64
}
