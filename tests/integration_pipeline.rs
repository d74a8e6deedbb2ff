//! Integration tests for the export parsing pipeline
//!
//! These tests run complete export files through the parser exactly the way
//! the ingest command does: tokenization, format detection, column
//! classification, status and value decoding, credential redaction, and
//! normalization into the canonical schemas.

use niagara_processor::app::models::{DatasetFormat, DeviceStatus};
use niagara_processor::app::services::export_parser::ExportParser;
use niagara_processor::app::services::normalizer::{normalize, normalize_dataset, NormalizedData};
use niagara_processor::config::PipelineConfig;
use niagara_processor::{Error, TridiumDataset};

fn parser() -> ExportParser {
    ExportParser::new(PipelineConfig::default())
}

fn parse(content: &str, filename: &str) -> TridiumDataset {
    parser()
        .parse(content, filename, None)
        .expect("parse should succeed")
        .dataset
}

const RESOURCE_EXPORT: &str = "\
Name,Value
cpu.usage,12%
mem.physical,1024 KB
heap.used,379 MB
component.count,\"84 (Limit: 101)\"
time.uptime,\"22 days, 7 hours\"
";

/// Purpose: Validate the full value-decoding path on a realistic resource dump
/// Benefit: Ensures unit normalization and limit extraction survive the whole pipeline
#[test]
fn test_resource_export_end_to_end() {
    let dataset = parse(RESOURCE_EXPORT, "resources.csv");
    assert_eq!(dataset.format, DatasetFormat::ResourceExport);
    assert_eq!(dataset.summary.total_rows, 5);
    assert_eq!(dataset.summary.parse_errors, 0);

    let row = |name: &str| {
        dataset
            .rows
            .iter()
            .find(|r| r.get("Name") == Some(name))
            .unwrap_or_else(|| panic!("missing row {}", name))
    };

    // Percentage
    let cpu = row("cpu.usage").parsed_value("Value").unwrap();
    assert_eq!(cpu.as_number(), Some(12.0));
    assert_eq!(cpu.unit.as_deref(), Some("%"));

    // 1024 KB normalizes to 1 MB
    let memory = row("mem.physical").parsed_value("Value").unwrap();
    assert_eq!(memory.as_number(), Some(1.0));
    assert_eq!(memory.unit.as_deref(), Some("MB"));

    // Count with embedded limit carries a derived percentage
    let components = row("component.count").parsed_value("Value").unwrap();
    assert_eq!(components.as_number(), Some(84.0));
    let metadata = components.metadata.as_ref().unwrap();
    assert_eq!(metadata.limit, Some(101.0));
    assert!((metadata.percentage.unwrap() - 83.17).abs() < 0.01);

    // Durations keep their original string form
    let uptime = row("time.uptime").parsed_value("Value").unwrap();
    assert_eq!(uptime.formatted, "22 days, 7 hours");
}

#[test]
fn test_n2_export_status_rollup_and_row_drops() {
    let content = "\
Name,Status,Address,Controller Type
VMA-101,{ok},1,VMA14
VMA-102,{down},2,VMA14
VMA-103,\"{down,alarm,unackedAlarm}\",3,DX9100
VMA-104,{unackedAlarm},4,DX9100
broken row without enough fields
";
    let dataset = parse(content, "JacesExport.csv");
    assert_eq!(dataset.format, DatasetFormat::N2Export);

    // The malformed row is dropped and recorded, never fatal
    assert_eq!(dataset.rows.len(), 4);
    assert_eq!(dataset.summary.parse_errors, 1);
    assert!(dataset.metadata.errors[0].contains("Row 6"));

    // Priority resolution: down beats alarm
    let counts = &dataset.summary.status_counts;
    assert_eq!(counts.ok, 1);
    assert_eq!(counts.down, 2);
    assert_eq!(counts.alarm, 1);
    assert_eq!(counts.total(), 4);
    assert_eq!(counts.healthy_percentage(), 25.0);

    let compound = dataset
        .rows
        .iter()
        .find(|r| r.get("Name") == Some("VMA-103"))
        .unwrap();
    let status = compound.parsed_status.as_ref().unwrap();
    assert_eq!(status.status, DeviceStatus::Down);
    assert_eq!(
        status.details,
        vec!["Device offline", "Alarm active", "Unacknowledged alarm"]
    );
}

const NETWORK_EXPORT_WITH_CREDENTIALS: &str = "\
Path,Name,Type,Address,Host Model,Version,Status,Client Conn,Server Conn,Platform Password
/Drivers/NiagaraNetwork/SH_East,SH_East,Niagara Station,\"ip:192.168.1.140,foxs:4911\",TITAN,4.10.0.154,{ok},Connected,Not connected,hunter2
";

#[test]
fn test_network_export_redacts_credentials() {
    let dataset = parse(NETWORK_EXPORT_WITH_CREDENTIALS, "network.csv");
    assert_eq!(dataset.format, DatasetFormat::NiagaraNetExport);
    assert_eq!(
        dataset.metadata.redacted_columns,
        vec!["Platform Password".to_string()]
    );
    assert_eq!(dataset.rows[0].get("Platform Password"), Some("********"));
    // Non-credential cells are untouched
    assert_eq!(dataset.rows[0].get("Host Model"), Some("TITAN"));
}

#[test]
fn test_redaction_can_be_disabled() {
    let parser = ExportParser::new(PipelineConfig::default().with_redaction(false));
    let outcome = parser
        .parse(NETWORK_EXPORT_WITH_CREDENTIALS, "network.csv", None)
        .unwrap();
    assert!(outcome.dataset.metadata.redacted_columns.is_empty());
    assert_eq!(
        outcome.dataset.rows[0].get("Platform Password"),
        Some("hunter2")
    );
}

#[test]
fn test_format_hint_mismatch_is_fatal() {
    let result = parser().parse(RESOURCE_EXPORT, "resources.csv", Some(DatasetFormat::N2Export));
    assert!(matches!(result, Err(Error::FormatDetection { .. })));
}

#[test]
fn test_valid_hint_short_circuits_detection() {
    let outcome = parser()
        .parse(RESOURCE_EXPORT, "resources.csv", Some(DatasetFormat::ResourceExport))
        .unwrap();
    assert_eq!(outcome.dataset.format, DatasetFormat::ResourceExport);
    assert_eq!(
        outcome.dataset.metadata.format_hint,
        Some(DatasetFormat::ResourceExport)
    );
}

#[test]
fn test_empty_and_truncated_files_are_fatal() {
    assert!(matches!(
        parser().parse("   \n", "empty.csv", None),
        Err(Error::ExportFormat { .. })
    ));
    // Header without any data row
    assert!(matches!(
        parser().parse("Name,Value\n", "header_only.csv", None),
        Err(Error::ExportFormat { .. })
    ));
}

/// A full NiagaraNetwork header contains the path-listing columns as a
/// subset; detection must keep the richer format.
#[test]
fn test_full_network_header_never_degrades_to_path_listing() {
    let content = "\
Path,Name,Type,Address,Host Model,Version,Status,Client Conn,Server Conn
/Drivers/NiagaraNetwork/SH_East,SH_East,Niagara Station,ip:192.168.1.140,TITAN,4.10.0.154,{ok},Connected,Not connected
";
    let dataset = parse(content, "stations.csv");
    assert_eq!(dataset.format, DatasetFormat::NiagaraNetExport);
    assert!(!dataset.metadata.fallback_match);
}

#[test]
fn test_unrecognized_header_degrades_to_generic_table() {
    let outcome = parser()
        .parse("Alpha,Beta\n1,2\n", "mystery.csv", None)
        .unwrap();
    assert_eq!(outcome.dataset.format, DatasetFormat::Unknown);
    assert!(!outcome.warnings.is_empty());
}

#[test]
fn test_platform_report_end_to_end() {
    let report = "\
Niagara Platform Summary

Daemon Version: 4.10.0.154
Host Model: TITAN
Model: JACE-8000
Number of CPUs: 2
Physical RAM Free: 512 MB
Physical RAM Total: 1024 MB
Platform TLS Support: enabled

Modules
alarm (Tridium 4.10.0.154)
bacnet (Tridium 4.10.0.154)
";
    let dataset = parse(report, "platform_details.txt");
    assert_eq!(dataset.format, DatasetFormat::PlatformDetails);

    let (normalized, warnings) = normalize_dataset(&dataset);
    let NormalizedData::Platform(summary) = normalized else {
        panic!("expected platform schema");
    };
    assert!(warnings.is_empty());
    assert_eq!(summary.daemon_version, "4.10.0.154");
    assert_eq!(summary.host_model, "TITAN");
    assert_eq!(summary.product, "JACE-8000");
    assert_eq!(summary.cpu_count, 2);
    assert_eq!(summary.ram_total_mb, 1024.0);
    assert!(summary.tls_support);
    assert_eq!(summary.modules.len(), 2);
    assert_eq!(summary.modules[0].name, "alarm");
    assert_eq!(summary.modules[0].vendor, "Tridium");
}

/// Normalizing already-canonical output changes nothing, so stored datasets
/// may safely run through the stage again on every load.
#[test]
fn test_normalization_is_idempotent_across_serialization() {
    let dataset = parse(RESOURCE_EXPORT, "resources.csv");
    let (first, _) = normalize_dataset(&dataset);
    let NormalizedData::Resources(ref metrics) = first else {
        panic!("expected resources schema");
    };

    let canonical = serde_json::to_value(metrics).unwrap();
    let (second, warnings) = normalize(DatasetFormat::ResourceExport, &canonical);
    assert_eq!(second, first);
    assert!(warnings.is_empty());
}

#[test]
fn test_dataset_json_round_trip() {
    let dataset = parse(RESOURCE_EXPORT, "resources.csv");
    let json = serde_json::to_string_pretty(&dataset).unwrap();
    let restored: TridiumDataset = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.id, dataset.id);
    assert_eq!(restored.format, dataset.format);
    assert_eq!(restored.rows.len(), dataset.rows.len());
    assert_eq!(restored.summary, dataset.summary);
}
