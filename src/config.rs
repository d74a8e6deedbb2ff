//! Configuration management and validation.
//!
//! Provides configuration structures for the export-processing pipeline:
//! format detection tuning, credential redaction, and per-file guard rails.

use crate::constants::{
    DEFAULT_FALLBACK_THRESHOLD, DEFAULT_MAX_RECORDED_ERRORS, DEFAULT_MAX_ROWS, REDACTION_MASK,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Format detection tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Minimum identifier-column overlap (0.0..=1.0) for a fuzzy match
    ///
    /// Headers that fully match a format's identifier columns are accepted
    /// outright; anything below an exact match must clear this bar or the
    /// file is treated as a degraded generic table.
    pub fallback_threshold: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            fallback_threshold: DEFAULT_FALLBACK_THRESHOLD,
        }
    }
}

/// Credential redaction behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionConfig {
    /// Redact credential-bearing columns before the dataset is built
    pub enabled: bool,

    /// Replacement mask written over redacted cells
    pub mask: String,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mask: REDACTION_MASK.to_string(),
        }
    }
}

/// Global configuration for the export-processing pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Format detection tuning
    pub detection: DetectionConfig,

    /// Credential redaction behavior
    pub redaction: RedactionConfig,

    /// Maximum row-level errors recorded per file; excess errors are
    /// counted but summarized into a single trailing message
    pub max_recorded_errors: usize,

    /// Maximum data rows accepted from a single export file
    pub max_rows: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            detection: DetectionConfig::default(),
            redaction: RedactionConfig::default(),
            max_recorded_errors: DEFAULT_MAX_RECORDED_ERRORS,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

impl PipelineConfig {
    /// Create configuration with a custom fuzzy-match threshold
    pub fn with_fallback_threshold(mut self, threshold: f64) -> Self {
        self.detection.fallback_threshold = threshold;
        self
    }

    /// Create configuration with redaction switched on or off
    pub fn with_redaction(mut self, enabled: bool) -> Self {
        self.redaction.enabled = enabled;
        self
    }

    /// Create configuration with a custom row-error recording cap
    pub fn with_max_recorded_errors(mut self, max_recorded_errors: usize) -> Self {
        self.max_recorded_errors = max_recorded_errors;
        self
    }

    /// Create configuration with a custom row limit
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Validate configuration values for consistency and valid ranges
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.detection.fallback_threshold) {
            return Err(Error::configuration(format!(
                "Invalid fallback threshold {}: must be between 0.0 and 1.0",
                self.detection.fallback_threshold
            )));
        }

        if self.max_rows == 0 {
            return Err(Error::configuration(
                "Maximum row count must be positive".to_string(),
            ));
        }

        if self.redaction.enabled && self.redaction.mask.is_empty() {
            return Err(Error::configuration(
                "Redaction mask cannot be empty while redaction is enabled".to_string(),
            ));
        }

        Ok(())
    }
}
