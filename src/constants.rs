//! Application constants for Niagara export processing
//!
//! This module contains the column vocabularies, status flag tables, unit
//! conversion factors, and default values used throughout the processor.

// =============================================================================
// Export Format Identifier Columns
// =============================================================================

/// Identifier columns for a Niagara N2 device export
pub const N2_IDENTIFIER_COLUMNS: &[&str] = &["Name", "Status", "Address", "Controller Type"];

/// Identifier columns for a station resource export
///
/// ResourceExport is a strict subset of many other formats and must match
/// this two-column header exactly, never by overlap.
pub const RESOURCE_IDENTIFIER_COLUMNS: &[&str] = &["Name", "Value"];

/// Identifier columns for a BACnet device export
pub const BACNET_IDENTIFIER_COLUMNS: &[&str] = &[
    "Name",
    "Type",
    "Device ID",
    "Status",
    "Netwk",
    "MAC Addr",
    "Vendor",
    "Model",
    "Firmware Rev",
    "Health",
];

/// Optional columns commonly present in BACnet device exports
pub const BACNET_OPTIONAL_COLUMNS: &[&str] = &[
    "App SW Version",
    "Encoding",
    "Segmentation",
    "Max APDU",
    "Enabled",
    "Use Cov",
    "Cov Subscriptions",
];

/// Identifier columns for a NiagaraNetwork station export
pub const NIAGARA_NET_IDENTIFIER_COLUMNS: &[&str] = &[
    "Path",
    "Name",
    "Type",
    "Address",
    "Host Model",
    "Version",
    "Status",
    "Client Conn",
    "Server Conn",
];

/// Optional columns commonly present in NiagaraNetwork station exports
pub const NIAGARA_NET_OPTIONAL_COLUMNS: &[&str] = &[
    "Health",
    "Fault Cause",
    "Platform Status",
    "Platform User",
    "Platform Password",
    "Credential Store",
    "Enabled",
];

/// Identifier columns for a legacy Niagara path export
pub const NIAGARA_PATH_IDENTIFIER_COLUMNS: &[&str] = &["Path", "Name", "Type"];

/// Column holding the device status in device-listing formats
pub const STATUS_COLUMN: &str = "Status";

/// Column holding the metric value in resource exports
pub const VALUE_COLUMN: &str = "Value";

/// Column holding the metric or device name in every CSV format
pub const NAME_COLUMN: &str = "Name";

/// File extensions treated as CSV exports
pub const CSV_EXTENSIONS: &[&str] = &["csv"];

/// File extensions treated as free-text platform reports
pub const TEXT_EXTENSIONS: &[&str] = &["txt", "text"];

// =============================================================================
// Platform Details Text Reports
// =============================================================================

/// Section headers recognized in platform detail text reports
///
/// A line *ending* with one of these phrases opens a new section; lines
/// within a section are either `key: value` pairs or free text.
pub const PLATFORM_SECTION_HEADERS: &[&str] =
    &["Platform Summary", "Modules", "Applications", "Licenses"];

/// Section name used for lines appearing before any recognized header
pub const PLATFORM_PREAMBLE_SECTION: &str = "Platform Summary";

// =============================================================================
// Status Flag Constants
// =============================================================================

/// Compound status flag tokens as emitted by Niagara exports
///
/// Raw values look like `{down,alarm,unackedAlarm}`; tokens are matched
/// case-insensitively after stripping the braces.
pub mod status_flags {
    /// Device or station healthy
    pub const OK: &str = "ok";

    /// Device or station offline
    pub const DOWN: &str = "down";

    /// Active alarm present
    pub const ALARM: &str = "alarm";

    /// Alarm present and not yet acknowledged
    pub const UNACKED_ALARM: &str = "unackedalarm";

    /// Fault condition reported by the driver
    pub const FAULT: &str = "fault";
}

/// Human-readable phrases appended to `ParsedStatus::details`, keyed by flag
pub mod status_phrases {
    /// Phrase recorded for the `fault` flag
    pub const FAULT: &str = "Fault detected";

    /// Phrase recorded for the `down` flag
    pub const DOWN: &str = "Device offline";

    /// Phrase recorded for the `alarm` flag
    pub const ALARM: &str = "Alarm active";

    /// Phrase recorded for the `unackedAlarm` flag
    pub const UNACKED_ALARM: &str = "Unacknowledged alarm";
}

/// Badge text shown when the raw status string is empty
pub const UNKNOWN_BADGE_TEXT: &str = "UNKNOWN";

// =============================================================================
// Value Parsing Constants
// =============================================================================

/// Memory unit conversion to the canonical megabyte representation
pub mod memory_units {
    /// Bytes per megabyte
    pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

    /// Kilobytes per megabyte
    pub const KB_PER_MB: f64 = 1024.0;

    /// Megabytes per gigabyte
    pub const MB_PER_GB: f64 = 1024.0;
}

/// Canonical unit string for normalized memory values
pub const MEMORY_UNIT_MB: &str = "MB";

/// Unit string for percentage values
pub const PERCENT_UNIT: &str = "%";

/// Niagara licensing capacity unit ("kilo Resource Units")
pub const KRU_UNIT: &str = "kRU";

/// Timestamp formats accepted by the value decoder, tried in order
pub const EXPORT_TIMESTAMP_FORMATS: &[&str] = &[
    "%d-%b-%y %I:%M %p",
    "%d-%b-%y %H:%M",
    "%d-%b-%y",
    "%Y-%m-%d %H:%M:%S",
];

// =============================================================================
// Credential Redaction
// =============================================================================

/// Column-name substrings that mark a column as credential-bearing
pub const CREDENTIAL_COLUMN_MARKERS: &[&str] =
    &["password", "passphrase", "secret", "credential"];

/// Replacement mask written over redacted cells
pub const REDACTION_MASK: &str = "********";

// =============================================================================
// Topology Constants
// =============================================================================

/// Driver protocol names recognized under a station
pub mod protocols {
    pub const BACNET: &str = "bacnet";
    pub const N2: &str = "n2";
    pub const MODBUS: &str = "modbus";
    pub const LON: &str = "lon";
    pub const CUSTOM: &str = "custom";
}

/// Substring of the declared row type that marks a Niagara station row
pub const NIAGARA_TYPE_MARKER: &str = "niagara";

/// Substring of the station name that marks a supervisor row
pub const SUPERVISOR_NAME_MARKER: &str = "supervisor";

/// Substring of the host model that marks a supervisor row
pub const WORKSTATION_MODEL_MARKER: &str = "workstation";

/// Canonical connection state strings
pub mod connection {
    pub const CONNECTED: &str = "Connected";
    pub const NOT_CONNECTED: &str = "Not connected";
    pub const UNKNOWN: &str = "Unknown";
}

/// Fields probed on the first data row during dataset auto-association
pub const STATION_NAME_FIELDS: &[&str] = &["Station Name", "Name"];

// =============================================================================
// Processing Configuration Defaults
// =============================================================================

/// Minimum identifier-column overlap for a fuzzy format match
pub const DEFAULT_FALLBACK_THRESHOLD: f64 = 0.8;

/// Maximum row-level errors recorded per file before summarizing
pub const DEFAULT_MAX_RECORDED_ERRORS: usize = 50;

/// Maximum rows accepted from a single export file
pub const DEFAULT_MAX_ROWS: usize = 100_000;

/// Default number of concurrently ingested files in batch mode
pub fn default_ingest_workers() -> usize {
    num_cpus::get()
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Check whether a column name marks a credential-bearing column
pub fn is_credential_column(column_name: &str) -> bool {
    let lowered = column_name.to_lowercase();
    CREDENTIAL_COLUMN_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Check whether a file extension belongs to a free-text platform report
pub fn is_text_report_extension(extension: &str) -> bool {
    let lowered = extension.to_lowercase();
    TEXT_EXTENSIONS.iter().any(|ext| *ext == lowered)
}
