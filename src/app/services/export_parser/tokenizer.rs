//! Tokenization of raw export bytes into an ephemeral row table
//!
//! Two modes cover every known export shape: RFC4180-style quoted CSV for
//! device and resource listings, and a line-oriented section scanner for
//! free-text platform detail reports. Both emit a [`RawTable`] so the rest
//! of the pipeline sees one shape.

use crate::constants::{
    NAME_COLUMN, PLATFORM_PREAMBLE_SECTION, PLATFORM_SECTION_HEADERS, VALUE_COLUMN,
};
use std::collections::HashMap;
use tracing::debug;

/// Ephemeral table produced by tokenization
///
/// Column order lives in `columns`; rows are name-keyed lookup maps. Rows
/// whose field count did not match the header are dropped and recorded in
/// `row_errors` rather than failing the file.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Column names in header order
    pub columns: Vec<String>,

    /// Surviving rows, keyed by column name
    pub rows: Vec<HashMap<String, String>>,

    /// Row-level problems encountered while tokenizing
    pub row_errors: Vec<String>,
}

impl RawTable {
    /// Check whether the header carries a given column (case-sensitive)
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

/// Tokenize CSV content into a raw table
///
/// Quoted fields may contain commas and escaped quotes (`""`); fields are
/// trimmed. A row whose field count differs from the header count is
/// dropped with a recorded error, never fatal to the file.
pub fn tokenize_csv(content: &str) -> RawTable {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let columns: Vec<String> = match reader.headers() {
        Ok(headers) => headers.iter().map(|h| h.trim().to_string()).collect(),
        Err(e) => {
            return RawTable {
                columns: Vec::new(),
                rows: Vec::new(),
                row_errors: vec![format!("Failed to read CSV header: {}", e)],
            };
        }
    };

    let mut table = RawTable {
        columns,
        rows: Vec::new(),
        row_errors: Vec::new(),
    };

    for (index, result) in reader.records().enumerate() {
        // Header is line 1; data rows start at line 2
        let line = index + 2;
        match result {
            Ok(record) => {
                if record.len() != table.columns.len() {
                    table.row_errors.push(format!(
                        "Row {}: expected {} fields, found {}",
                        line,
                        table.columns.len(),
                        record.len()
                    ));
                    continue;
                }

                let cells: HashMap<String, String> = table
                    .columns
                    .iter()
                    .zip(record.iter())
                    .map(|(column, field)| (column.clone(), field.trim().to_string()))
                    .collect();
                table.rows.push(cells);
            }
            Err(e) => {
                table
                    .row_errors
                    .push(format!("Row {}: CSV parse error: {}", line, e));
            }
        }
    }

    debug!(
        "Tokenized CSV: {} columns, {} rows, {} dropped",
        table.columns.len(),
        table.rows.len(),
        table.row_errors.len()
    );

    table
}

/// Tokenize a free-text platform details report into `Name`/`Value` rows
///
/// Lines ending with a recognized section phrase open a new section.
/// Within a section, the first colon splits `key: value` pairs; other
/// non-empty lines accumulate into a semicolon-joined free-text value
/// recorded under the section name itself.
pub fn tokenize_platform_text(content: &str) -> RawTable {
    let mut rows: Vec<(String, String)> = Vec::new();
    let mut free_text: Vec<(String, Vec<String>)> = Vec::new();
    let mut section = PLATFORM_PREAMBLE_SECTION.to_string();

    for raw_line in content.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = PLATFORM_SECTION_HEADERS
            .iter()
            .find(|header| line.ends_with(**header))
        {
            section = (*header).to_string();
            if !free_text.iter().any(|(name, _)| name == &section) {
                free_text.push((section.clone(), Vec::new()));
            }
            continue;
        }

        match line.split_once(':') {
            Some((key, value)) if !key.trim().is_empty() => {
                rows.push((key.trim().to_string(), value.trim().to_string()));
            }
            _ => {
                match free_text.iter_mut().find(|(name, _)| name == &section) {
                    Some((_, lines)) => lines.push(line.to_string()),
                    None => free_text.push((section.clone(), vec![line.to_string()])),
                }
            }
        }
    }

    for (section, lines) in free_text {
        if !lines.is_empty() {
            rows.push((section, lines.join(";")));
        }
    }

    let table_rows = rows
        .into_iter()
        .map(|(name, value)| {
            let mut cells = HashMap::new();
            cells.insert(NAME_COLUMN.to_string(), name);
            cells.insert(VALUE_COLUMN.to_string(), value);
            cells
        })
        .collect::<Vec<_>>();

    debug!("Tokenized platform report: {} rows", table_rows.len());

    RawTable {
        columns: vec![NAME_COLUMN.to_string(), VALUE_COLUMN.to_string()],
        rows: table_rows,
        row_errors: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_basic_rows() {
        let table = tokenize_csv("Name,Status\nAHU-1,{ok}\nAHU-2,{down}\n");
        assert_eq!(table.columns, vec!["Name", "Status"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1]["Status"], "{down}");
        assert!(table.row_errors.is_empty());
    }

    #[test]
    fn test_csv_quoted_fields_with_commas_and_escapes() {
        let table = tokenize_csv("Name,Value\n\"a, b\",\"say \"\"hi\"\"\"\n");
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0]["Name"], "a, b");
        assert_eq!(table.rows[0]["Value"], "say \"hi\"");
    }

    #[test]
    fn test_csv_field_count_mismatch_dropped() {
        let table = tokenize_csv("Name,Status\nAHU-1,{ok}\nAHU-2,{down},extra\nAHU-3\n");
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.row_errors.len(), 2);
        assert!(table.row_errors[0].contains("Row 3"));
        assert!(table.row_errors[0].contains("expected 2 fields, found 3"));
    }

    #[test]
    fn test_csv_fields_trimmed() {
        let table = tokenize_csv("Name , Status \n AHU-1 , {ok} \n");
        assert_eq!(table.columns, vec!["Name", "Status"]);
        assert_eq!(table.rows[0]["Name"], "AHU-1");
    }

    #[test]
    fn test_platform_text_key_value_pairs() {
        let report = "\
Niagara Platform Summary
Daemon Version: 4.10.0.154
Host Model: TITAN
Operating System: QNX
";
        let table = tokenize_platform_text(report);
        assert_eq!(table.columns, vec!["Name", "Value"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0]["Name"], "Daemon Version");
        assert_eq!(table.rows[0]["Value"], "4.10.0.154");
    }

    #[test]
    fn test_platform_text_free_lines_accumulate_per_section() {
        let report = "\
Platform Summary
Host Model: TITAN

Modules
alarm (Tridium 4.10)
bacnet (Tridium 4.10)

Licenses
Tridium.license (expires 2026-01-01)
";
        let table = tokenize_platform_text(report);
        let modules = table
            .rows
            .iter()
            .find(|row| row["Name"] == "Modules")
            .unwrap();
        assert_eq!(modules["Value"], "alarm (Tridium 4.10);bacnet (Tridium 4.10)");

        let licenses = table
            .rows
            .iter()
            .find(|row| row["Name"] == "Licenses")
            .unwrap();
        assert_eq!(licenses["Value"], "Tridium.license (expires 2026-01-01)");
    }

    #[test]
    fn test_platform_text_preamble_lines() {
        // Lines before any header fall into the preamble section
        let table = tokenize_platform_text("standalone note\nPlatform Summary\nHost Model: EDGE10\n");
        let preamble = table
            .rows
            .iter()
            .find(|row| row["Name"] == "Platform Summary")
            .unwrap();
        assert_eq!(preamble["Value"], "standalone note");
    }
}
