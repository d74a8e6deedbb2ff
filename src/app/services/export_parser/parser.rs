//! Export parsing orchestration
//!
//! [`ExportParser`] runs the whole per-file pipeline: tokenize, detect the
//! format (or validate a caller hint), classify columns, decode status and
//! value cells row by row, redact credentials, and assemble the finished
//! [`TridiumDataset`]. Only fatal conditions surface as `Err`; row-level
//! problems accumulate in the dataset metadata.

use super::columns::{classify_columns, ColumnKind};
use super::format::{detect_format, spec_for, validate_hint};
use super::stats::{ParseOutcome, ParseStats};
use super::status::decode_status;
use super::tokenizer::{tokenize_csv, tokenize_platform_text, RawTable};
use super::values::ValueDecoder;
use crate::app::models::{
    DatasetFormat, DatasetMetadata, DatasetSummary, StatusCounts, TridiumDataRow, TridiumDataset,
};
use crate::config::PipelineConfig;
use crate::constants::{is_credential_column, is_text_report_extension, STATUS_COLUMN};
use crate::{Error, Result};
use std::path::Path;
use tracing::{debug, info};

/// Parser turning raw export bytes into a normalized dataset
#[derive(Debug)]
pub struct ExportParser {
    config: PipelineConfig,
    decoder: ValueDecoder,
}

impl ExportParser {
    /// Create a parser with the given pipeline configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            decoder: ValueDecoder::new(),
        }
    }

    /// Parse one export file into a dataset
    ///
    /// `hint` short-circuits format detection but is still validated
    /// against the header set; a mismatch is a fatal error, never a silent
    /// override. Fatal conditions (empty file, truncated CSV, hint
    /// mismatch) return `Err`; everything else degrades into recorded
    /// warnings and row errors.
    pub fn parse(
        &self,
        content: &str,
        filename: &str,
        hint: Option<DatasetFormat>,
    ) -> Result<ParseOutcome> {
        info!("Parsing export file: {}", filename);

        if content.trim().is_empty() {
            return Err(Error::export_format(filename, "File is empty"));
        }

        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        if is_text_report_extension(extension) {
            self.parse_platform_report(content, filename, hint)
        } else {
            self.parse_csv_export(content, filename, hint)
        }
    }

    fn parse_platform_report(
        &self,
        content: &str,
        filename: &str,
        hint: Option<DatasetFormat>,
    ) -> Result<ParseOutcome> {
        if let Some(hint) = hint {
            if hint != DatasetFormat::PlatformDetails {
                return Err(Error::format_detection(
                    filename,
                    format!("Format hint {} does not fit a text platform report", hint),
                ));
            }
        }

        let table = tokenize_platform_text(content);
        let stats = ParseStats::new();
        self.assemble(
            filename,
            DatasetFormat::PlatformDetails,
            hint,
            false,
            table,
            stats,
        )
    }

    fn parse_csv_export(
        &self,
        content: &str,
        filename: &str,
        hint: Option<DatasetFormat>,
    ) -> Result<ParseOutcome> {
        let line_count = content.lines().filter(|line| !line.trim().is_empty()).count();
        if line_count < 2 {
            return Err(Error::export_format(
                filename,
                "CSV export needs a header row and at least one data row",
            ));
        }

        let table = tokenize_csv(content);
        let mut stats = ParseStats::new();

        let (format, fallback) = match hint {
            Some(hint) => {
                if hint == DatasetFormat::PlatformDetails {
                    return Err(Error::format_detection(
                        filename,
                        "Format hint PlatformDetails does not fit a CSV export",
                    ));
                }
                validate_hint(hint, &table.columns)
                    .map_err(|message| Error::format_detection(filename, message))?;
                debug!("Format hint {} validated against header", hint);
                (hint, false)
            }
            None => {
                let detected =
                    detect_format(&table.columns, self.config.detection.fallback_threshold);
                if let Some(warning) = detected.warning {
                    stats.record_warning(warning);
                }
                (detected.format, detected.fallback)
            }
        };

        self.assemble(filename, format, hint, fallback, table, stats)
    }

    /// Shared tail of both paths: decode rows, redact, build the dataset
    fn assemble(
        &self,
        filename: &str,
        format: DatasetFormat,
        hint: Option<DatasetFormat>,
        fallback: bool,
        mut table: RawTable,
        mut stats: ParseStats,
    ) -> Result<ParseOutcome> {
        let dropped = table.row_errors.len();
        for error in table.row_errors.drain(..) {
            stats.record_error(error, self.config.max_recorded_errors);
        }

        if table.rows.len() > self.config.max_rows {
            stats.record_warning(format!(
                "Export truncated to {} rows ({} present)",
                self.config.max_rows,
                table.rows.len()
            ));
            table.rows.truncate(self.config.max_rows);
        }

        stats.total_rows = table.rows.len() + dropped;
        stats.rows_skipped = dropped;

        let redacted_columns = self.redact_credentials(&mut table);
        let classified = classify_columns(&table.columns);
        let status_column = status_column_for(format, &table);

        let mut rows = Vec::with_capacity(table.rows.len());
        let mut status_counts = StatusCounts::default();

        for cells in table.rows {
            let mut row = TridiumDataRow::new(cells);

            if let Some(status_column) = status_column {
                if let Some(raw) = row.get(status_column).map(str::to_string) {
                    let parsed = decode_status(&raw);
                    status_counts.record(parsed.status);
                    row.parsed_status = Some(parsed);
                }
            }

            for (column, kind) in &classified {
                if matches!(
                    kind,
                    ColumnKind::Value | ColumnKind::Date | ColumnKind::Number
                ) {
                    if let Some(raw) = row.get_non_empty(column).map(str::to_string) {
                        row.parsed_values
                            .insert(column.clone(), self.decoder.decode(&raw));
                    }
                }
            }

            rows.push(row);
        }

        stats.rows_parsed = rows.len();
        stats.finish();

        let station_hint = first_row_station_hint(&rows);

        let summary = DatasetSummary {
            total_rows: rows.len(),
            status_counts,
            parse_errors: stats.rows_skipped,
        };

        let mut metadata = DatasetMetadata::new(hint);
        metadata.fallback_match = fallback;
        metadata.station_hint = station_hint;
        metadata.redacted_columns = redacted_columns;
        metadata.warnings = stats.warnings.clone();
        metadata.errors = stats.errors.clone();

        let dataset = TridiumDataset::new(
            filename.to_string(),
            format,
            table.columns,
            rows,
            summary,
            metadata,
        )?;

        info!(
            "Parsed {} as {}: {} rows, {} skipped, {} warnings",
            filename,
            format,
            stats.rows_parsed,
            stats.rows_skipped,
            stats.warnings.len()
        );

        Ok(ParseOutcome {
            dataset,
            warnings: stats.warnings,
        })
    }

    /// Replace credential-bearing cells with the configured mask
    fn redact_credentials(&self, table: &mut RawTable) -> Vec<String> {
        if !self.config.redaction.enabled {
            return Vec::new();
        }

        let targets: Vec<String> = table
            .columns
            .iter()
            .filter(|column| is_credential_column(column))
            .cloned()
            .collect();

        for row in &mut table.rows {
            for column in &targets {
                if let Some(cell) = row.get_mut(column) {
                    if !cell.is_empty() {
                        *cell = self.config.redaction.mask.clone();
                    }
                }
            }
        }

        targets
    }
}

/// Pick the column carrying the compound status token, when any
fn status_column_for(format: DatasetFormat, table: &RawTable) -> Option<&'static str> {
    match spec_for(format).and_then(|spec| spec.status_column) {
        Some(column) if table.has_column(column) => Some(column),
        Some(_) => None,
        // Degraded tables still get a decoded status when the
        // conventional column is present
        None if format == DatasetFormat::Unknown && table.has_column(STATUS_COLUMN) => {
            Some(STATUS_COLUMN)
        }
        None => None,
    }
}

/// Station name from the first data row, probed for auto-association
fn first_row_station_hint(rows: &[TridiumDataRow]) -> Option<String> {
    use crate::constants::STATION_NAME_FIELDS;
    let first = rows.first()?;
    STATION_NAME_FIELDS
        .iter()
        .find_map(|field| first.get_non_empty(field))
        .map(str::to_string)
}
