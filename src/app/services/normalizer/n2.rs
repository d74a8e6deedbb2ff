//! Canonical N2 device schema

use super::shapes::{payload_rows, row_field};
use crate::app::models::{DeviceStatus, TridiumDataRow};
use crate::app::services::export_parser::decode_status;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One device row from an N2 field-bus export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct N2DeviceRow {
    pub name: String,

    #[serde(default)]
    pub status: DeviceStatus,

    /// N2 trunk address
    pub address: u32,

    /// Hardware family, e.g. `VMA14`, `DX9100`
    #[serde(default)]
    pub controller_type: String,
}

/// Canonical probe: a row list whose rows already carry the schema markers
pub fn is_canonical(value: &Value) -> bool {
    value
        .as_array()
        .and_then(|rows| rows.first())
        .map(|row| row.get("controller_type").is_some() && row.get("address").is_some())
        .unwrap_or(false)
}

/// Build device rows from tokenized export rows
pub fn from_rows(rows: &[TridiumDataRow]) -> (Vec<N2DeviceRow>, Vec<String>) {
    let mut devices = Vec::new();
    let mut warnings = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let Some(name) = row.get_non_empty("Name") else {
            warnings.push(format!("Row {}: device row has no name, skipped", index + 1));
            continue;
        };

        devices.push(N2DeviceRow {
            name: name.to_string(),
            status: row
                .get_non_empty("Status")
                .map(|raw| decode_status(raw).status)
                .unwrap_or(DeviceStatus::Unknown),
            address: row
                .get_non_empty("Address")
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(0),
            controller_type: row
                .get_non_empty("Controller Type")
                .unwrap_or_default()
                .to_string(),
        });
    }

    (devices, warnings)
}

/// Build device rows from a legacy JSON payload
pub fn from_value(payload: &Value) -> (Vec<N2DeviceRow>, Vec<String>) {
    if is_canonical(payload) {
        if let Ok(canonical) = serde_json::from_value::<Vec<N2DeviceRow>>(payload.clone()) {
            return (canonical, Vec::new());
        }
    }

    let Some(rows) = payload_rows(payload) else {
        return (
            Vec::new(),
            vec!["Legacy N2 payload carried no device rows".to_string()],
        );
    };

    let rows: Vec<TridiumDataRow> = rows
        .iter()
        .map(|row| {
            let mut cells = std::collections::HashMap::new();
            let aliases: &[(&str, &[&str])] = &[
                ("Name", &["Name", "name", "deviceName"]),
                ("Status", &["Status", "status"]),
                ("Address", &["Address", "address"]),
                ("Controller Type", &["Controller Type", "controllerType"]),
            ];
            for (column, names) in aliases {
                if let Some(value) = row_field(row, names) {
                    cells.insert(column.to_string(), value);
                }
            }
            TridiumDataRow::new(cells)
        })
        .collect();
    let (devices, mut warnings) = from_rows(&rows);
    warnings.push("Device rows extracted from legacy payload".to_string());
    (devices, warnings)
}
