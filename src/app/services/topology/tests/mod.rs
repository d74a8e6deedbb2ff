//! Test fixtures for topology testing
//!
//! Dataset builders shared by the builder, association, and service tests.


use crate::app::models::{
    DatasetFormat, DatasetMetadata, DatasetSummary, TridiumDataRow, TridiumDataset,
};
use std::collections::HashMap;

/// Build a NiagaraNetwork station row
pub fn station_row(name: &str, station_type: &str, host_model: &str) -> TridiumDataRow {
    let cells: HashMap<String, String> = [
        ("Path", format!("/Drivers/NiagaraNetwork/{}", name)),
        ("Name", name.to_string()),
        ("Type", station_type.to_string()),
        ("Address", "ip:192.168.1.140,foxs:4911".to_string()),
        ("Host Model", host_model.to_string()),
        ("Version", "4.10.0.154".to_string()),
        ("Status", "{ok}".to_string()),
        ("Client Conn", "Connected".to_string()),
        ("Server Conn", "Connected".to_string()),
    ]
    .into_iter()
    .map(|(column, value)| (column.to_string(), value))
    .collect();
    TridiumDataRow::new(cells)
}

fn dataset(
    filename: &str,
    format: DatasetFormat,
    columns: &[&str],
    rows: Vec<TridiumDataRow>,
) -> TridiumDataset {
    let summary = DatasetSummary {
        total_rows: rows.len(),
        ..Default::default()
    };
    TridiumDataset::new(
        filename.to_string(),
        format,
        columns.iter().map(|c| c.to_string()).collect(),
        rows,
        summary,
        DatasetMetadata::new(None),
    )
    .expect("fixture dataset is valid")
}

/// A network export with one supervisor and two JACE stations
pub fn network_dataset() -> TridiumDataset {
    dataset(
        "NiagaraNetExport.csv",
        DatasetFormat::NiagaraNetExport,
        &[
            "Path",
            "Name",
            "Type",
            "Address",
            "Host Model",
            "Version",
            "Status",
            "Client Conn",
            "Server Conn",
        ],
        vec![
            station_row("Supervisor", "Niagara Station", "Workstation"),
            station_row("SH_East", "Niagara Station", "TITAN"),
            station_row("SH_West", "Niagara Station", "TITAN"),
        ],
    )
}

/// An N2 device export with two devices
pub fn n2_dataset() -> TridiumDataset {
    let row = |name: &str, status: &str, address: &str| {
        let cells: HashMap<String, String> = [
            ("Name", name),
            ("Status", status),
            ("Address", address),
            ("Controller Type", "VMA14"),
        ]
        .into_iter()
        .map(|(column, value)| (column.to_string(), value.to_string()))
        .collect();
        TridiumDataRow::new(cells)
    };
    dataset(
        "JacesExport.csv",
        DatasetFormat::N2Export,
        &["Name", "Status", "Address", "Controller Type"],
        vec![row("VMA-101", "{ok}", "1"), row("VMA-102", "{down}", "2")],
    )
}

/// A BACnet device export with one device
pub fn bacnet_dataset() -> TridiumDataset {
    let cells: HashMap<String, String> = [
        ("Name", "AHU-1"),
        ("Type", "Device"),
        ("Device ID", "device:1201"),
        ("Status", "{ok}"),
        ("Netwk", "1"),
        ("MAC Addr", "12"),
        ("Vendor", "JCI"),
        ("Model", "MS-NAE5510"),
        ("Firmware Rev", "1.2.3"),
    ]
    .into_iter()
    .map(|(column, value)| (column.to_string(), value.to_string()))
    .collect();
    dataset(
        "BacnetExport.csv",
        DatasetFormat::BacnetExport,
        &[
            "Name",
            "Type",
            "Device ID",
            "Status",
            "Netwk",
            "MAC Addr",
            "Vendor",
            "Model",
            "Firmware Rev",
        ],
        vec![TridiumDataRow::new(cells)],
    )
}
