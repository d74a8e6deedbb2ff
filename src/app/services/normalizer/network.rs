//! Canonical NiagaraNetwork station schema
//!
//! One `NetworkStationRow` per station under the supervisor's
//! NiagaraNetwork driver. NiagaraPathExport is an older rendition of the
//! same logical data and normalizes into this schema too.

use super::shapes::{payload_rows, row_field};
use crate::app::models::topology::{ConnectionState, ConnectionSummary};
use crate::app::models::{DeviceStatus, TridiumDataRow};
use crate::app::services::export_parser::decode_status;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One station row from a NiagaraNetwork or path export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkStationRow {
    pub name: String,

    /// Station path under the NiagaraNetwork driver
    #[serde(default)]
    pub path: String,

    /// Declared row type, e.g. `Niagara Station`
    #[serde(default)]
    pub station_type: String,

    /// Raw combined address field as exported
    #[serde(default)]
    pub address: String,

    /// First dotted-quad pulled out of the address, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    /// Fox/foxs port from the address field, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fox_port: Option<u16>,

    #[serde(default)]
    pub host_model: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub status: DeviceStatus,

    pub connection: ConnectionSummary,
}

/// Canonical probe: a row list whose rows already carry the schema markers
pub fn is_canonical(value: &Value) -> bool {
    value
        .as_array()
        .and_then(|rows| rows.first())
        .map(|row| row.get("station_type").is_some() && row.get("connection").is_some())
        .unwrap_or(false)
}

/// Pull the first dotted-quad substring out of a combined address field
pub fn extract_ip(address: &str, ip_re: &Regex) -> Option<String> {
    ip_re.find(address).map(|m| m.as_str().to_string())
}

fn extract_fox_port(address: &str, fox_re: &Regex) -> Option<u16> {
    fox_re
        .captures(address)
        .and_then(|captures| captures[1].parse().ok())
}

/// Build station rows from tokenized export rows
///
/// Rows missing a name are skipped with a warning, never an error.
pub fn from_rows(rows: &[TridiumDataRow]) -> (Vec<NetworkStationRow>, Vec<String>) {
    let ip_re = Regex::new(r"\b\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}\b").unwrap();
    let fox_re = Regex::new(r"foxs?:(\d+)").unwrap();
    let mut stations = Vec::new();
    let mut warnings = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let Some(name) = row.get_non_empty("Name") else {
            warnings.push(format!("Row {}: station row has no name, skipped", index + 1));
            continue;
        };

        let address = row.get_non_empty("Address").unwrap_or_default().to_string();
        let ip_address = extract_ip(&address, &ip_re);
        if !address.is_empty() && ip_address.is_none() {
            warnings.push(format!(
                "Station '{}': no IP address found in '{}'",
                name, address
            ));
        }

        let status = row
            .get_non_empty("Status")
            .map(|raw| decode_status(raw).status)
            .unwrap_or(DeviceStatus::Unknown);

        stations.push(NetworkStationRow {
            name: name.to_string(),
            path: row.get_non_empty("Path").unwrap_or_default().to_string(),
            station_type: row.get_non_empty("Type").unwrap_or_default().to_string(),
            fox_port: extract_fox_port(&address, &fox_re),
            ip_address,
            address,
            host_model: row
                .get_non_empty("Host Model")
                .unwrap_or_default()
                .to_string(),
            version: row.get_non_empty("Version").unwrap_or_default().to_string(),
            status,
            connection: ConnectionSummary {
                client: connection_field(row, "Client Conn"),
                server: connection_field(row, "Server Conn"),
            },
        });
    }

    (stations, warnings)
}

fn connection_field(row: &TridiumDataRow, column: &str) -> ConnectionState {
    row.get_non_empty(column)
        .map(ConnectionState::from_raw)
        .unwrap_or(ConnectionState::Unknown)
}

/// Build station rows from a legacy JSON payload
pub fn from_value(payload: &Value) -> (Vec<NetworkStationRow>, Vec<String>) {
    if is_canonical(payload) {
        if let Ok(canonical) = serde_json::from_value::<Vec<NetworkStationRow>>(payload.clone()) {
            return (canonical, Vec::new());
        }
    }

    let Some(rows) = payload_rows(payload) else {
        return (
            Vec::new(),
            vec!["Legacy network payload carried no station rows".to_string()],
        );
    };

    let rows: Vec<TridiumDataRow> = rows.iter().map(legacy_row).collect();
    let (stations, mut warnings) = from_rows(&rows);
    warnings.push("Station rows extracted from legacy payload".to_string());
    (stations, warnings)
}

fn legacy_row(row: &Value) -> TridiumDataRow {
    let mut cells = std::collections::HashMap::new();
    let aliases: &[(&str, &[&str])] = &[
        ("Name", &["Name", "name", "stationName"]),
        ("Path", &["Path", "path"]),
        ("Type", &["Type", "type", "stationType"]),
        ("Address", &["Address", "address"]),
        ("Host Model", &["Host Model", "hostModel"]),
        ("Version", &["Version", "version"]),
        ("Status", &["Status", "status"]),
        ("Client Conn", &["Client Conn", "clientConn"]),
        ("Server Conn", &["Server Conn", "serverConn"]),
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

    fn station_row(name: &str, address: &str, client: &str) -> TridiumDataRow {
        let mut cells = HashMap::new();
        cells.insert("Name".to_string(), name.to_string());
        cells.insert("Type".to_string(), "Niagara Station".to_string());
        cells.insert("Address".to_string(), address.to_string());
        cells.insert("Host Model".to_string(), "TITAN".to_string());
        cells.insert("Version".to_string(), "4.10.0.154".to_string());
        cells.insert("Status".to_string(), "{ok}".to_string());
        cells.insert("Client Conn".to_string(), client.to_string());
        cells.insert("Server Conn".to_string(), "Connected".to_string());
        TridiumDataRow::new(cells)
    }

    #[test]
    fn test_from_rows_extracts_ip_and_port() {
        let rows = vec![station_row(
            "SH_East",
            "ip:192.168.1.140,foxs:4911",
            "Connected",
        )];

        let (stations, warnings) = from_rows(&rows);
        assert!(warnings.is_empty());
        assert_eq!(stations[0].ip_address.as_deref(), Some("192.168.1.140"));
        assert_eq!(stations[0].fox_port, Some(4911));
        assert_eq!(stations[0].status, DeviceStatus::Ok);
        assert_eq!(stations[0].connection.client, ConnectionState::Connected);
    }

    #[test]
    fn test_missing_ip_warns_not_errors() {
        let rows = vec![station_row("SH_East", "local:", "Connected")];
        let (stations, warnings) = from_rows(&rows);
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].ip_address, None);
        assert!(warnings[0].contains("no IP address"));
    }

    #[test]
    fn test_nameless_row_skipped_with_warning() {
        let mut cells = HashMap::new();
        cells.insert("Address".to_string(), "ip:10.0.0.1".to_string());
        let rows = vec![TridiumDataRow::new(cells)];

        let (stations, warnings) = from_rows(&rows);
        assert!(stations.is_empty());
        assert!(warnings[0].contains("no name"));
    }

    #[test]
    fn test_connection_normalization() {
        let rows = vec![station_row("A", "ip:10.0.0.1", "Not connected")];
        let (stations, _) = from_rows(&rows);
        assert_eq!(stations[0].connection.client, ConnectionState::NotConnected);
        assert_eq!(stations[0].connection.server, ConnectionState::Connected);
    }

    #[test]
    fn test_from_value_canonical_passthrough() {
        let rows = vec![station_row("SH_East", "ip:192.168.1.140", "Connected")];
        let (stations, _) = from_rows(&rows);

        let json = serde_json::to_value(&stations).unwrap();
        assert!(is_canonical(&json));
        let (restored, warnings) = from_value(&json);
        assert_eq!(restored, stations);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_from_value_legacy_flat_rows() {
        let payload = json!([
            { "stationName": "SH_West", "address": "ip:10.1.1.5", "clientConn": "Connected" }
        ]);

        let (stations, warnings) = from_value(&payload);
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "SH_West");
        assert_eq!(stations[0].ip_address.as_deref(), Some("10.1.1.5"));
        assert!(warnings.iter().any(|w| w.contains("legacy")));
    }

    #[test]
    fn test_from_value_unrecognized_payload_warns() {
        let (stations, warnings) = from_value(&json!({ "no": "rows" }));
        assert!(stations.is_empty());
        assert_eq!(warnings.len(), 1);
    }
}
