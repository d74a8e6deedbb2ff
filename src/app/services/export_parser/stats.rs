//! Parsing statistics and outcome structures for export processing
//!
//! Row-level problems never abort a file: they accumulate here, capped so
//! a pathological export cannot balloon the error list, and ship with the
//! finished dataset.

use crate::app::models::TridiumDataset;
use serde::{Deserialize, Serialize};

/// Successful parse outcome: the dataset plus advisory warnings
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// Normalized dataset built from the file
    pub dataset: TridiumDataset,

    /// Advisory conditions recorded during parsing
    pub warnings: Vec<String>,
}

/// Row-level accounting for one file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseStats {
    /// Total data rows encountered after the header
    pub total_rows: usize,

    /// Rows surviving tokenization and decoding
    pub rows_parsed: usize,

    /// Rows dropped for shape or parse problems
    pub rows_skipped: usize,

    /// Row-level errors, recorded up to the configured cap
    pub errors: Vec<String>,

    /// Advisory conditions (fallback match, truncation, legacy shapes)
    pub warnings: Vec<String>,

    /// Errors dropped after the recording cap was reached
    pub errors_truncated: usize,
}

impl ParseStats {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a row-level error, honoring the recording cap
    pub fn record_error(&mut self, message: String, max_recorded: usize) {
        if self.errors.len() < max_recorded {
            self.errors.push(message);
        } else {
            self.errors_truncated += 1;
        }
    }

    /// Record an advisory condition
    pub fn record_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Fold truncated-error accounting into a single trailing message
    pub fn finish(&mut self) {
        if self.errors_truncated > 0 {
            self.errors.push(format!(
                "... and {} further row errors not recorded",
                self.errors_truncated
            ));
        }
    }

    /// Share of rows parsed successfully, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.rows_parsed as f64 / self.total_rows as f64) * 100.0
        }
    }

    /// Check if parsing was mostly successful (>90% success rate)
    pub fn is_successful(&self) -> bool {
        self.success_rate() > 90.0
    }
}
