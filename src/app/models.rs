//! Data models for Niagara export processing
//!
//! This module contains the core data structures for representing parsed
//! Tridium Niagara diagnostic exports: the dataset/row model handed to
//! callers, decoded status and value types, and the export format taxonomy.

use crate::constants::{STATION_NAME_FIELDS, UNKNOWN_BADGE_TEXT};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub mod topology;

// =============================================================================
// Export Format Taxonomy
// =============================================================================

/// Known Niagara diagnostic export formats
///
/// Every uploaded file is classified as exactly one of these. `Unknown` is a
/// degraded generic table, not an error: callers still receive rows, just
/// without format-specific normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetFormat {
    /// Niagara N2 device listing (`Name`/`Status`/`Address`/`Controller Type`)
    N2Export,

    /// Station resource dump (exactly `Name`/`Value`)
    ResourceExport,

    /// BACnet device listing (device id, network, vendor columns)
    BacnetExport,

    /// NiagaraNetwork station listing (one row per discovered station)
    NiagaraNetExport,

    /// Legacy path-style station listing (`Path`/`Name`/`Type`)
    NiagaraPathExport,

    /// Free-text platform details report
    PlatformDetails,

    /// Header set matched no known format
    Unknown,
}

impl DatasetFormat {
    /// All formats that can be detected from a CSV header row
    pub fn csv_formats() -> [DatasetFormat; 5] {
        [
            DatasetFormat::NiagaraNetExport,
            DatasetFormat::BacnetExport,
            DatasetFormat::N2Export,
            DatasetFormat::NiagaraPathExport,
            DatasetFormat::ResourceExport,
        ]
    }

    /// Check if this format carries per-device rows under a station driver
    pub fn is_device_format(self) -> bool {
        matches!(self, DatasetFormat::BacnetExport | DatasetFormat::N2Export)
    }

    /// Check if this format describes the station network itself
    pub fn is_network_format(self) -> bool {
        matches!(
            self,
            DatasetFormat::NiagaraNetExport | DatasetFormat::NiagaraPathExport
        )
    }
}

impl fmt::Display for DatasetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatasetFormat::N2Export => "N2Export",
            DatasetFormat::ResourceExport => "ResourceExport",
            DatasetFormat::BacnetExport => "BacnetExport",
            DatasetFormat::NiagaraNetExport => "NiagaraNetExport",
            DatasetFormat::NiagaraPathExport => "NiagaraPathExport",
            DatasetFormat::PlatformDetails => "PlatformDetails",
            DatasetFormat::Unknown => "Unknown",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for DatasetFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "n2export" | "n2" => Ok(DatasetFormat::N2Export),
            "resourceexport" | "resource" | "resources" => Ok(DatasetFormat::ResourceExport),
            "bacnetexport" | "bacnet" => Ok(DatasetFormat::BacnetExport),
            "niagaranetexport" | "niagara-net" | "niagaranetwork" => {
                Ok(DatasetFormat::NiagaraNetExport)
            }
            "niagarapathexport" | "niagara-path" => Ok(DatasetFormat::NiagaraPathExport),
            "platformdetails" | "platform" => Ok(DatasetFormat::PlatformDetails),
            "unknown" => Ok(DatasetFormat::Unknown),
            _ => Err(Error::unknown_format(s)),
        }
    }
}

// =============================================================================
// Parsed Status
// =============================================================================

/// Canonical device/station status decoded from compound flag tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    /// All recognized flags healthy
    Ok,

    /// Device offline
    Down,

    /// Active alarm present
    Alarm,

    /// Driver-reported fault
    Fault,

    /// Status string empty or unrecognized
    #[default]
    Unknown,
}

/// Severity derived from the canonical status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

/// Display badge variants used by downstream dashboards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    /// Healthy state
    Success,

    /// Attention needed but not critical
    Warning,

    /// Offline or faulted
    Destructive,

    /// Unknown or unclassified
    Outline,
}

impl DeviceStatus {
    /// Severity implied by this status
    ///
    /// Fault and down are both critical; only alarm maps to warning.
    pub fn severity(self) -> Severity {
        match self {
            DeviceStatus::Fault | DeviceStatus::Down => Severity::Critical,
            DeviceStatus::Alarm => Severity::Warning,
            DeviceStatus::Ok | DeviceStatus::Unknown => Severity::Normal,
        }
    }

    /// Badge variant implied by this status
    pub fn badge_variant(self) -> BadgeVariant {
        match self {
            DeviceStatus::Ok => BadgeVariant::Success,
            DeviceStatus::Alarm => BadgeVariant::Warning,
            DeviceStatus::Down | DeviceStatus::Fault => BadgeVariant::Destructive,
            DeviceStatus::Unknown => BadgeVariant::Outline,
        }
    }

    /// Uppercase badge label for this status
    pub fn badge_text(self) -> &'static str {
        match self {
            DeviceStatus::Ok => "OK",
            DeviceStatus::Down => "DOWN",
            DeviceStatus::Alarm => "ALARM",
            DeviceStatus::Fault => "FAULT",
            DeviceStatus::Unknown => UNKNOWN_BADGE_TEXT,
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceStatus::Ok => "ok",
            DeviceStatus::Down => "down",
            DeviceStatus::Alarm => "alarm",
            DeviceStatus::Fault => "fault",
            DeviceStatus::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// Fully decoded status for one row
///
/// `details` preserves flag-presence order from the raw token list, which is
/// not the same as the priority order used to pick the canonical `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedStatus {
    /// Canonical status after priority resolution
    pub status: DeviceStatus,

    /// Severity derived from the canonical status
    pub severity: Severity,

    /// Human-readable cause phrases in flag-presence order
    pub details: Vec<String>,

    /// Badge label for dashboard rendering
    pub badge_text: String,

    /// Badge variant for dashboard rendering
    pub badge_variant: BadgeVariant,
}

impl ParsedStatus {
    /// Build a status from the canonical value and detail phrases
    pub fn new(status: DeviceStatus, details: Vec<String>) -> Self {
        Self {
            status,
            severity: status.severity(),
            details,
            badge_text: status.badge_text().to_string(),
            badge_variant: status.badge_variant(),
        }
    }

    /// Build the unknown status for an unrecognized raw string
    ///
    /// A non-empty raw string becomes the badge text unchanged; only a truly
    /// empty input falls back to the "UNKNOWN" label.
    pub fn unknown(raw: &str) -> Self {
        let trimmed = raw.trim();
        let badge_text = if trimmed.is_empty() {
            UNKNOWN_BADGE_TEXT.to_string()
        } else {
            trimmed.to_string()
        };
        Self {
            status: DeviceStatus::Unknown,
            severity: Severity::Normal,
            details: Vec::new(),
            badge_text,
            badge_variant: BadgeVariant::Outline,
        }
    }

    /// Check whether this status requires operator attention
    pub fn needs_attention(&self) -> bool {
        self.severity != Severity::Normal
    }
}

// =============================================================================
// Parsed Value
// =============================================================================

/// Semantic type assigned to a decoded value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Percentage,
    Memory,
    Count,
    Duration,
    Timestamp,
    Text,
}

/// Decoded value payload: numeric where parsing succeeded, text otherwise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueContent {
    Number(f64),
    Text(String),
}

impl ValueContent {
    /// Numeric payload if this value decoded to a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ValueContent::Number(n) => Some(*n),
            ValueContent::Text(_) => None,
        }
    }

    /// Text payload if this value stayed textual
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ValueContent::Number(_) => None,
            ValueContent::Text(s) => Some(s),
        }
    }
}

/// Derived metadata attached to a decoded value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueMetadata {
    /// Declared limit for count-with-limit values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<f64>,

    /// Derived utilization percentage (value / limit * 100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,

    /// Value is a dotted-quad IP address kept in literal form
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_ip_address: bool,

    /// Value is a dotted version string kept in literal form
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_version: bool,
}

impl ValueMetadata {
    /// Check whether any metadata field carries information
    pub fn is_empty(&self) -> bool {
        self.limit.is_none() && self.percentage.is_none() && !self.is_ip_address && !self.is_version
    }
}

/// Typed value decoded from a raw export cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedValue {
    /// Decoded payload
    pub value: ValueContent,

    /// Normalized unit, when one applies (e.g. "MB", "%")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Semantic type chosen by the decoder cascade
    pub kind: ValueKind,

    /// Original cell text, preserved for display
    pub formatted: String,

    /// Derived metadata (limits, utilization, literal-form flags)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ValueMetadata>,
}

impl ParsedValue {
    /// Build a plain-text value with no unit or metadata
    pub fn text(raw: &str) -> Self {
        Self {
            value: ValueContent::Text(raw.to_string()),
            unit: None,
            kind: ValueKind::Text,
            formatted: raw.to_string(),
            metadata: None,
        }
    }

    /// Numeric payload if this value decoded to a number
    pub fn as_number(&self) -> Option<f64> {
        self.value.as_number()
    }

    /// Derived utilization percentage, when present
    pub fn percentage(&self) -> Option<f64> {
        match self.kind {
            ValueKind::Percentage => self.as_number(),
            _ => self.metadata.as_ref().and_then(|m| m.percentage),
        }
    }
}

// =============================================================================
// Dataset Rows
// =============================================================================

/// One row of a normalized dataset
///
/// Cells keep their raw string form; decoded interpretations are attached
/// per classified column. A row is owned exclusively by its parent dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TridiumDataRow {
    /// Raw cell values keyed by column name
    pub cells: HashMap<String, String>,

    /// Decoded status, when the format carries a status column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed_status: Option<ParsedStatus>,

    /// Decoded values keyed by column name
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub parsed_values: HashMap<String, ParsedValue>,
}

impl TridiumDataRow {
    /// Create a row from raw cells
    pub fn new(cells: HashMap<String, String>) -> Self {
        Self {
            cells,
            parsed_status: None,
            parsed_values: HashMap::new(),
        }
    }

    /// Get a raw cell value by column name
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Get a trimmed, non-empty cell value by column name
    pub fn get_non_empty(&self, column: &str) -> Option<&str> {
        self.get(column).map(str::trim).filter(|s| !s.is_empty())
    }

    /// Get a decoded value by column name
    pub fn parsed_value(&self, column: &str) -> Option<&ParsedValue> {
        self.parsed_values.get(column)
    }
}

// =============================================================================
// Dataset Summary and Metadata
// =============================================================================

/// Per-status row tallies for a dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub ok: usize,
    pub down: usize,
    pub alarm: usize,
    pub fault: usize,
    pub unknown: usize,
}

impl StatusCounts {
    /// Record one decoded status
    pub fn record(&mut self, status: DeviceStatus) {
        match status {
            DeviceStatus::Ok => self.ok += 1,
            DeviceStatus::Down => self.down += 1,
            DeviceStatus::Alarm => self.alarm += 1,
            DeviceStatus::Fault => self.fault += 1,
            DeviceStatus::Unknown => self.unknown += 1,
        }
    }

    /// Total rows carrying a decoded status
    pub fn total(&self) -> usize {
        self.ok + self.down + self.alarm + self.fault + self.unknown
    }

    /// Share of rows reporting ok, as a percentage
    pub fn healthy_percentage(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            (self.ok as f64 / total as f64) * 100.0
        }
    }
}

/// Aggregate description of a parsed dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Rows surviving tokenization
    pub total_rows: usize,

    /// Status rollup across rows with a decoded status
    pub status_counts: StatusCounts,

    /// Row-level errors recorded while parsing
    pub parse_errors: usize,
}

/// Provenance and processing metadata attached to a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    /// When the dataset was created from the uploaded bytes
    pub uploaded_at: DateTime<Utc>,

    /// Format hint supplied by the caller, when any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_hint: Option<DatasetFormat>,

    /// Format was chosen by the fuzzy fallback rather than an exact match
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback_match: bool,

    /// Station name taken from the first data row, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_hint: Option<String>,

    /// Columns whose cells were replaced by the redaction mask
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub redacted_columns: Vec<String>,

    /// Advisory conditions recorded during parsing
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// Row-level error messages recorded during parsing
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl DatasetMetadata {
    /// Create metadata stamped with the current time
    pub fn new(format_hint: Option<DatasetFormat>) -> Self {
        Self {
            uploaded_at: Utc::now(),
            format_hint,
            fallback_match: false,
            station_hint: None,
            redacted_columns: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }
}

// =============================================================================
// Dataset
// =============================================================================

/// Normalized, persisted unit of work produced from one uploaded file
///
/// A dataset is immutable after creation; re-association bookkeeping lives
/// outside it, in the association map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TridiumDataset {
    /// Stable identifier assigned at creation
    pub id: Uuid,

    /// Original upload filename
    pub filename: String,

    /// Detected (or hint-confirmed) export format
    pub format: DatasetFormat,

    /// Column names in original header order
    pub columns: Vec<String>,

    /// Parsed rows
    pub rows: Vec<TridiumDataRow>,

    /// Aggregate description
    pub summary: DatasetSummary,

    /// Provenance and processing metadata
    pub metadata: DatasetMetadata,
}

impl TridiumDataset {
    /// Create a dataset with a fresh id and validate it
    pub fn new(
        filename: String,
        format: DatasetFormat,
        columns: Vec<String>,
        rows: Vec<TridiumDataRow>,
        summary: DatasetSummary,
        metadata: DatasetMetadata,
    ) -> Result<Self> {
        let dataset = Self {
            id: Uuid::new_v4(),
            filename,
            format,
            columns,
            rows,
            summary,
            metadata,
        };

        dataset.validate()?;
        Ok(dataset)
    }

    /// Validate dataset structure for consistency
    pub fn validate(&self) -> Result<()> {
        if self.filename.trim().is_empty() {
            return Err(Error::data_validation(
                "Dataset filename cannot be empty".to_string(),
            ));
        }

        if self.summary.total_rows != self.rows.len() {
            return Err(Error::data_validation(format!(
                "Summary row count {} does not match actual row count {}",
                self.summary.total_rows,
                self.rows.len()
            )));
        }

        Ok(())
    }

    /// Number of parsed rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Station name taken from the first data row, when present
    ///
    /// Probes the well-known station fields in order; used by the
    /// association engine's auto-match heuristic.
    pub fn first_row_station_field(&self) -> Option<&str> {
        let first = self.rows.first()?;
        STATION_NAME_FIELDS
            .iter()
            .find_map(|field| first.get_non_empty(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test data helpers
    fn create_test_row(name: &str, status: &str) -> TridiumDataRow {
        let mut cells = HashMap::new();
        cells.insert("Name".to_string(), name.to_string());
        cells.insert("Status".to_string(), status.to_string());
        TridiumDataRow::new(cells)
    }

    fn create_test_dataset() -> TridiumDataset {
        let rows = vec![
            create_test_row("VAV-101", "{ok}"),
            create_test_row("VAV-102", "{down}"),
        ];
        let summary = DatasetSummary {
            total_rows: rows.len(),
            status_counts: StatusCounts::default(),
            parse_errors: 0,
        };

        TridiumDataset::new(
            "JacesExport.csv".to_string(),
            DatasetFormat::N2Export,
            vec!["Name".to_string(), "Status".to_string()],
            rows,
            summary,
            DatasetMetadata::new(None),
        )
        .unwrap()
    }

    mod format_tests {
        use super::*;

        #[test]
        fn test_format_display_round_trip() {
            for format in [
                DatasetFormat::N2Export,
                DatasetFormat::ResourceExport,
                DatasetFormat::BacnetExport,
                DatasetFormat::NiagaraNetExport,
                DatasetFormat::NiagaraPathExport,
                DatasetFormat::PlatformDetails,
                DatasetFormat::Unknown,
            ] {
                let parsed: DatasetFormat = format.to_string().parse().unwrap();
                assert_eq!(parsed, format);
            }
        }

        #[test]
        fn test_format_short_aliases() {
            assert_eq!(
                "bacnet".parse::<DatasetFormat>().unwrap(),
                DatasetFormat::BacnetExport
            );
            assert_eq!(
                "n2".parse::<DatasetFormat>().unwrap(),
                DatasetFormat::N2Export
            );
            assert_eq!(
                "platform".parse::<DatasetFormat>().unwrap(),
                DatasetFormat::PlatformDetails
            );
        }

        #[test]
        fn test_format_invalid_name() {
            assert!("modbus-export".parse::<DatasetFormat>().is_err());
        }

        #[test]
        fn test_format_categories() {
            assert!(DatasetFormat::BacnetExport.is_device_format());
            assert!(DatasetFormat::N2Export.is_device_format());
            assert!(!DatasetFormat::ResourceExport.is_device_format());

            assert!(DatasetFormat::NiagaraNetExport.is_network_format());
            assert!(DatasetFormat::NiagaraPathExport.is_network_format());
            assert!(!DatasetFormat::BacnetExport.is_network_format());
        }
    }

    mod status_tests {
        use super::*;

        #[test]
        fn test_severity_mapping() {
            assert_eq!(DeviceStatus::Fault.severity(), Severity::Critical);
            assert_eq!(DeviceStatus::Down.severity(), Severity::Critical);
            assert_eq!(DeviceStatus::Alarm.severity(), Severity::Warning);
            assert_eq!(DeviceStatus::Ok.severity(), Severity::Normal);
            assert_eq!(DeviceStatus::Unknown.severity(), Severity::Normal);
        }

        #[test]
        fn test_badge_variants() {
            assert_eq!(DeviceStatus::Ok.badge_variant(), BadgeVariant::Success);
            assert_eq!(DeviceStatus::Alarm.badge_variant(), BadgeVariant::Warning);
            assert_eq!(DeviceStatus::Down.badge_variant(), BadgeVariant::Destructive);
            assert_eq!(
                DeviceStatus::Fault.badge_variant(),
                BadgeVariant::Destructive
            );
            assert_eq!(DeviceStatus::Unknown.badge_variant(), BadgeVariant::Outline);
        }

        #[test]
        fn test_unknown_status_badge_uses_raw_string() {
            let status = ParsedStatus::unknown("{stale}");
            assert_eq!(status.status, DeviceStatus::Unknown);
            assert_eq!(status.badge_text, "{stale}");

            let empty = ParsedStatus::unknown("   ");
            assert_eq!(empty.badge_text, "UNKNOWN");
        }

        #[test]
        fn test_needs_attention() {
            assert!(ParsedStatus::new(DeviceStatus::Down, vec![]).needs_attention());
            assert!(ParsedStatus::new(DeviceStatus::Alarm, vec![]).needs_attention());
            assert!(!ParsedStatus::new(DeviceStatus::Ok, vec![]).needs_attention());
            assert!(!ParsedStatus::unknown("???").needs_attention());
        }
    }

    mod value_tests {
        use super::*;

        #[test]
        fn test_value_content_accessors() {
            let number = ValueContent::Number(42.5);
            assert_eq!(number.as_number(), Some(42.5));
            assert_eq!(number.as_text(), None);

            let text = ValueContent::Text("hello".to_string());
            assert_eq!(text.as_number(), None);
            assert_eq!(text.as_text(), Some("hello"));
        }

        #[test]
        fn test_metadata_is_empty() {
            assert!(ValueMetadata::default().is_empty());

            let with_limit = ValueMetadata {
                limit: Some(100.0),
                ..Default::default()
            };
            assert!(!with_limit.is_empty());

            let with_flag = ValueMetadata {
                is_ip_address: true,
                ..Default::default()
            };
            assert!(!with_flag.is_empty());
        }

        #[test]
        fn test_percentage_accessor() {
            let direct = ParsedValue {
                value: ValueContent::Number(75.0),
                unit: Some("%".to_string()),
                kind: ValueKind::Percentage,
                formatted: "75%".to_string(),
                metadata: None,
            };
            assert_eq!(direct.percentage(), Some(75.0));

            let derived = ParsedValue {
                value: ValueContent::Number(50.0),
                unit: None,
                kind: ValueKind::Count,
                formatted: "50 (Limit: 100)".to_string(),
                metadata: Some(ValueMetadata {
                    limit: Some(100.0),
                    percentage: Some(50.0),
                    ..Default::default()
                }),
            };
            assert_eq!(derived.percentage(), Some(50.0));

            assert_eq!(ParsedValue::text("abc").percentage(), None);
        }
    }

    mod dataset_tests {
        use super::*;

        #[test]
        fn test_dataset_creation_valid() {
            let dataset = create_test_dataset();
            assert_eq!(dataset.row_count(), 2);
            assert_eq!(dataset.format, DatasetFormat::N2Export);
            assert!(dataset.validate().is_ok());
        }

        #[test]
        fn test_dataset_empty_filename_rejected() {
            let mut dataset = create_test_dataset();
            dataset.filename = "  ".to_string();
            assert!(dataset.validate().is_err());
        }

        #[test]
        fn test_dataset_summary_mismatch_rejected() {
            let mut dataset = create_test_dataset();
            dataset.summary.total_rows = 99;
            assert!(dataset.validate().is_err());
        }

        #[test]
        fn test_first_row_station_field() {
            let dataset = create_test_dataset();
            assert_eq!(dataset.first_row_station_field(), Some("VAV-101"));

            let mut cells = HashMap::new();
            cells.insert("Station Name".to_string(), "SH_Campus".to_string());
            cells.insert("Name".to_string(), "ignored".to_string());
            let rows = vec![TridiumDataRow::new(cells)];
            let summary = DatasetSummary {
                total_rows: 1,
                ..Default::default()
            };
            let dataset = TridiumDataset::new(
                "export.csv".to_string(),
                DatasetFormat::Unknown,
                vec!["Station Name".to_string(), "Name".to_string()],
                rows,
                summary,
                DatasetMetadata::new(None),
            )
            .unwrap();

            // "Station Name" is probed before "Name"
            assert_eq!(dataset.first_row_station_field(), Some("SH_Campus"));
        }

        #[test]
        fn test_status_counts_rollup() {
            let mut counts = StatusCounts::default();
            counts.record(DeviceStatus::Ok);
            counts.record(DeviceStatus::Ok);
            counts.record(DeviceStatus::Down);
            counts.record(DeviceStatus::Fault);

            assert_eq!(counts.total(), 4);
            assert_eq!(counts.ok, 2);
            assert_eq!(counts.healthy_percentage(), 50.0);

            assert_eq!(StatusCounts::default().healthy_percentage(), 0.0);
        }

        #[test]
        fn test_dataset_serde_round_trip() {
            let dataset = create_test_dataset();
            let json = serde_json::to_string(&dataset).unwrap();
            let restored: TridiumDataset = serde_json::from_str(&json).unwrap();
            assert_eq!(dataset, restored);
        }
    }
}
