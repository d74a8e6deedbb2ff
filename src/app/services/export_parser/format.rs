//! Export format detection from the header column set
//!
//! Detection runs an exact pass over the known formats in descending
//! identifier-count order (so supersets win), then a fuzzy pass that picks
//! the best identifier overlap above a configured threshold. ResourceExport
//! is a strict subset of almost every other header and therefore only ever
//! matches its exact two-column form.

use crate::app::models::DatasetFormat;
use crate::constants::{
    BACNET_IDENTIFIER_COLUMNS, BACNET_OPTIONAL_COLUMNS, N2_IDENTIFIER_COLUMNS,
    NIAGARA_NET_IDENTIFIER_COLUMNS, NIAGARA_NET_OPTIONAL_COLUMNS,
    NIAGARA_PATH_IDENTIFIER_COLUMNS, RESOURCE_IDENTIFIER_COLUMNS, STATUS_COLUMN,
};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Static description of one known export format
#[derive(Debug, Clone, Copy)]
pub struct FormatSpec {
    /// Format this spec identifies
    pub format: DatasetFormat,

    /// Columns that must all be present for an exact match
    pub identifier_columns: &'static [&'static str],

    /// Columns commonly present but not required
    pub optional_columns: &'static [&'static str],

    /// Column holding the compound status token, when the format has one
    pub status_column: Option<&'static str>,

    /// Format never participates in the fuzzy pass and requires the header
    /// to contain nothing beyond its identifier columns
    pub exact_only: bool,
}

/// Known CSV format specs in descending identifier-count order
///
/// Order matters: the exact pass walks this table top to bottom, so a full
/// NiagaraNetwork header can never degrade to the path-listing subset.
pub const FORMAT_SPECS: &[FormatSpec] = &[
    FormatSpec {
        format: DatasetFormat::BacnetExport,
        identifier_columns: BACNET_IDENTIFIER_COLUMNS,
        optional_columns: BACNET_OPTIONAL_COLUMNS,
        status_column: Some(STATUS_COLUMN),
        exact_only: false,
    },
    FormatSpec {
        format: DatasetFormat::NiagaraNetExport,
        identifier_columns: NIAGARA_NET_IDENTIFIER_COLUMNS,
        optional_columns: NIAGARA_NET_OPTIONAL_COLUMNS,
        status_column: Some(STATUS_COLUMN),
        exact_only: false,
    },
    FormatSpec {
        format: DatasetFormat::N2Export,
        identifier_columns: N2_IDENTIFIER_COLUMNS,
        optional_columns: &[],
        status_column: Some(STATUS_COLUMN),
        exact_only: false,
    },
    FormatSpec {
        format: DatasetFormat::NiagaraPathExport,
        identifier_columns: NIAGARA_PATH_IDENTIFIER_COLUMNS,
        optional_columns: &[],
        status_column: None,
        exact_only: false,
    },
    FormatSpec {
        format: DatasetFormat::ResourceExport,
        identifier_columns: RESOURCE_IDENTIFIER_COLUMNS,
        optional_columns: &[],
        status_column: None,
        exact_only: true,
    },
];

/// Outcome of format detection on one header set
#[derive(Debug, Clone, PartialEq)]
pub struct FormatMatch {
    /// Detected format; `Unknown` when nothing cleared the fuzzy bar
    pub format: DatasetFormat,

    /// Match came from the fuzzy pass rather than a full identifier match
    pub fallback: bool,

    /// Identifier columns found over identifier columns required
    pub overlap: f64,

    /// Advisory message for fallback or failed detection
    pub warning: Option<String>,
}

impl FormatMatch {
    fn exact(format: DatasetFormat) -> Self {
        Self {
            format,
            fallback: false,
            overlap: 1.0,
            warning: None,
        }
    }
}

/// Look up the static spec for a format, when one exists
pub fn spec_for(format: DatasetFormat) -> Option<&'static FormatSpec> {
    FORMAT_SPECS.iter().find(|spec| spec.format == format)
}

/// Detect the export format carried by a CSV header set
///
/// `threshold` is the minimum identifier-column overlap (0.0..=1.0) the
/// fuzzy pass accepts; below it the file is a degraded generic table.
pub fn detect_format(columns: &[String], threshold: f64) -> FormatMatch {
    let header: HashSet<String> = columns.iter().map(|c| c.trim().to_lowercase()).collect();

    // Exact pass: every identifier column present, supersets first
    for spec in FORMAT_SPECS {
        if spec.exact_only {
            if exact_header_match(&header, spec.identifier_columns) {
                debug!("Exact match: {}", spec.format);
                return FormatMatch::exact(spec.format);
            }
            continue;
        }

        if identifier_hits(&header, spec.identifier_columns) == spec.identifier_columns.len() {
            debug!("Exact match: {}", spec.format);
            return FormatMatch::exact(spec.format);
        }
    }

    // Fuzzy pass: best overlap wins, earlier (more specific) specs break ties
    let mut best: Option<(&FormatSpec, f64)> = None;
    for spec in FORMAT_SPECS {
        if spec.exact_only {
            continue;
        }
        let hits = identifier_hits(&header, spec.identifier_columns);
        let overlap = hits as f64 / spec.identifier_columns.len() as f64;
        if best.is_none_or(|(_, best_overlap)| overlap > best_overlap) {
            best = Some((spec, overlap));
        }
    }

    match best {
        Some((spec, overlap)) if overlap >= threshold => {
            let warning = format!(
                "Format {} matched by fallback: {:.0}% of identifier columns present",
                spec.format,
                overlap * 100.0
            );
            warn!("{}", warning);
            FormatMatch {
                format: spec.format,
                fallback: true,
                overlap,
                warning: Some(warning),
            }
        }
        _ => {
            let overlap = best.map(|(_, o)| o).unwrap_or(0.0);
            let warning =
                "Header matched no known export format; treating as generic table".to_string();
            warn!("{}", warning);
            FormatMatch {
                format: DatasetFormat::Unknown,
                fallback: false,
                overlap,
                warning: Some(warning),
            }
        }
    }
}

/// Validate a caller-supplied format hint against the header set
///
/// The hint short-circuits detection but must still fit the header: every
/// identifier column of the hinted format has to be present (exactly, for
/// exact-only formats). Returns an error message on mismatch.
pub fn validate_hint(
    hint: DatasetFormat,
    columns: &[String],
) -> std::result::Result<(), String> {
    let Some(spec) = spec_for(hint) else {
        // PlatformDetails and Unknown carry no header contract
        return Ok(());
    };

    let header: HashSet<String> = columns.iter().map(|c| c.trim().to_lowercase()).collect();

    let fits = if spec.exact_only {
        exact_header_match(&header, spec.identifier_columns)
    } else {
        identifier_hits(&header, spec.identifier_columns) == spec.identifier_columns.len()
    };

    if fits {
        Ok(())
    } else {
        Err(format!(
            "Format hint {} does not match the file header: expected columns [{}]",
            hint,
            spec.identifier_columns.join(", ")
        ))
    }
}

fn identifier_hits(header: &HashSet<String>, identifiers: &[&str]) -> usize {
    identifiers
        .iter()
        .filter(|column| header.contains(&column.to_lowercase()))
        .count()
}

fn exact_header_match(header: &HashSet<String>, identifiers: &[&str]) -> bool {
    header.len() == identifiers.len()
        && identifiers
            .iter()
            .all(|column| header.contains(&column.to_lowercase()))
}
