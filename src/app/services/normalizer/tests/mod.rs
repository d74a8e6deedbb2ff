//! Test fixtures for normalizer testing
//!
//! Cross-schema tests live here; per-schema conversion details are covered
//! inline in each schema module.


use crate::app::models::TridiumDataRow;
use std::collections::HashMap;

/// Build a row from (column, value) pairs
pub fn row(cells: &[(&str, &str)]) -> TridiumDataRow {
    TridiumDataRow::new(
        cells
            .iter()
            .map(|(column, value)| (column.to_string(), value.to_string()))
            .collect::<HashMap<String, String>>(),
    )
}
