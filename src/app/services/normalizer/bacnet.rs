//! Canonical BACnet device schema

use super::shapes::{payload_rows, row_field};
use crate::app::models::{DeviceStatus, TridiumDataRow};
use crate::app::services::export_parser::decode_status;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One device row from a BACnet device export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacnetDeviceRow {
    pub name: String,

    /// Declared object type, usually `Device`
    #[serde(default)]
    pub device_type: String,

    /// Numeric device instance, extracted from `device:1201` or a bare number
    pub device_id: u32,

    #[serde(default)]
    pub status: DeviceStatus,

    /// BACnet network number from the `Netwk` column
    pub network: u32,

    #[serde(default)]
    pub mac_address: String,

    #[serde(default)]
    pub vendor: String,

    #[serde(default)]
    pub model: String,

    #[serde(default)]
    pub firmware_rev: String,

    /// Raw health cell, e.g. `Ok [15-Mar-24 2:30 PM]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<String>,
}

/// Canonical probe: a row list whose rows already carry the schema markers
pub fn is_canonical(value: &Value) -> bool {
    value
        .as_array()
        .and_then(|rows| rows.first())
        .map(|row| row.get("device_id").is_some() && row.get("firmware_rev").is_some())
        .unwrap_or(false)
}

/// Numeric instance from `device:1201`, `1201`, or similar
fn parse_device_id(raw: &str) -> u32 {
    let digits = raw.rsplit(':').next().unwrap_or(raw).trim();
    digits.parse().unwrap_or(0)
}

/// Build device rows from tokenized export rows
pub fn from_rows(rows: &[TridiumDataRow]) -> (Vec<BacnetDeviceRow>, Vec<String>) {
    let mut devices = Vec::new();
    let mut warnings = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let Some(name) = row.get_non_empty("Name") else {
            warnings.push(format!("Row {}: device row has no name, skipped", index + 1));
            continue;
        };

        devices.push(BacnetDeviceRow {
            name: name.to_string(),
            device_type: row.get_non_empty("Type").unwrap_or_default().to_string(),
            device_id: row
                .get_non_empty("Device ID")
                .map(parse_device_id)
                .unwrap_or(0),
            status: row
                .get_non_empty("Status")
                .map(|raw| decode_status(raw).status)
                .unwrap_or(DeviceStatus::Unknown),
            network: row
                .get_non_empty("Netwk")
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(0),
            mac_address: row.get_non_empty("MAC Addr").unwrap_or_default().to_string(),
            vendor: row.get_non_empty("Vendor").unwrap_or_default().to_string(),
            model: row.get_non_empty("Model").unwrap_or_default().to_string(),
            firmware_rev: row
                .get_non_empty("Firmware Rev")
                .unwrap_or_default()
                .to_string(),
            health: row.get_non_empty("Health").map(str::to_string),
        });
    }

    (devices, warnings)
}

/// Build device rows from a legacy JSON payload
pub fn from_value(payload: &Value) -> (Vec<BacnetDeviceRow>, Vec<String>) {
    if is_canonical(payload) {
        if let Ok(canonical) = serde_json::from_value::<Vec<BacnetDeviceRow>>(payload.clone()) {
            return (canonical, Vec::new());
        }
    }

    let Some(rows) = payload_rows(payload) else {
        return (
            Vec::new(),
            vec!["Legacy BACnet payload carried no device rows".to_string()],
        );
    };

    let rows: Vec<TridiumDataRow> = rows.iter().map(legacy_row).collect();
    let (devices, mut warnings) = from_rows(&rows);
    warnings.push("Device rows extracted from legacy payload".to_string());
    (devices, warnings)
}

fn legacy_row(row: &Value) -> TridiumDataRow {
    let mut cells = std::collections::HashMap::new();
    let aliases: &[(&str, &[&str])] = &[
        ("Name", &["Name", "name", "deviceName"]),
        ("Type", &["Type", "type"]),
        ("Device ID", &["Device ID", "deviceId"]),
        ("Status", &["Status", "status"]),
        ("Netwk", &["Netwk", "network"]),
        ("MAC Addr", &["MAC Addr", "macAddress"]),
        ("Vendor", &["Vendor", "vendor"]),
        ("Model", &["Model", "model"]),
        ("Firmware Rev", &["Firmware Rev", "firmwareRev"]),
        ("Health", &["Health", "health"]),
    ];
    for (column, names) in aliases {
        if let Some(value) = row_field(row, names) {
            cells.insert(column.to_string(), value);
        }
    }
    TridiumDataRow::new(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn device_row(name: &str, device_id: &str, status: &str) -> TridiumDataRow {
        let mut cells = HashMap::new();
        cells.insert("Name".to_string(), name.to_string());
        cells.insert("Type".to_string(), "Device".to_string());
        cells.insert("Device ID".to_string(), device_id.to_string());
        cells.insert("Status".to_string(), status.to_string());
        cells.insert("Netwk".to_string(), "1".to_string());
        cells.insert("MAC Addr".to_string(), "12".to_string());
        cells.insert("Vendor".to_string(), "JCI".to_string());
        cells.insert("Model".to_string(), "MS-NAE5510".to_string());
        cells.insert("Firmware Rev".to_string(), "1.2.3".to_string());
        TridiumDataRow::new(cells)
    }

    #[test]
    fn test_device_id_extraction() {
        assert_eq!(parse_device_id("device:1201"), 1201);
        assert_eq!(parse_device_id("1201"), 1201);
        assert_eq!(parse_device_id("garbage"), 0);
    }

    #[test]
    fn test_from_rows_full_row() {
        let rows = vec![device_row("AHU-1", "device:1201", "{ok}")];
        let (devices, warnings) = from_rows(&rows);

        assert!(warnings.is_empty());
        assert_eq!(devices[0].device_id, 1201);
        assert_eq!(devices[0].network, 1);
        assert_eq!(devices[0].status, DeviceStatus::Ok);
        assert_eq!(devices[0].model, "MS-NAE5510");
        assert_eq!(devices[0].health, None);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let mut cells = HashMap::new();
        cells.insert("Name".to_string(), "VAV-9".to_string());
        let (devices, _) = from_rows(&[TridiumDataRow::new(cells)]);

        assert_eq!(devices[0].device_id, 0);
        assert_eq!(devices[0].network, 0);
        assert_eq!(devices[0].status, DeviceStatus::Unknown);
    }

    #[test]
    fn test_from_value_canonical_passthrough() {
        let rows = vec![device_row("AHU-1", "device:1201", "{down}")];
        let (devices, _) = from_rows(&rows);

        let json = serde_json::to_value(&devices).unwrap();
        assert!(is_canonical(&json));
        let (restored, warnings) = from_value(&json);
        assert_eq!(restored, devices);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_from_value_legacy_rows() {
        let payload = json!({ "rows": [
            { "cells": { "Name": "AHU-2", "Device ID": "device:7", "Status": "{fault}" } }
        ]});

        let (devices, warnings) = from_value(&payload);
        assert_eq!(devices[0].device_id, 7);
        assert_eq!(devices[0].status, DeviceStatus::Fault);
        assert!(warnings.iter().any(|w| w.contains("legacy")));
    }
}
