//! Ingest command implementation
//!
//! Batch-ingests Niagara export files into normalized dataset JSON files.
//! Each file runs through its own pipeline invocation; files are parsed
//! concurrently up to the worker limit, and a fatal error on one file never
//! aborts the batch unless `--fail-fast` is set. After the batch, the
//! surviving datasets assemble into one combined `topology.json`.

use crate::app::models::{DatasetFormat, TridiumDataset};
use crate::app::services::export_parser::ExportParser;
use crate::app::services::topology::TopologyService;
use crate::cli::args::{IngestArgs, OutputFormat};
use crate::cli::commands::shared::{
    create_progress_bar, discover_export_files, is_critical_error, setup_logging, IngestStats,
};
use crate::config::PipelineConfig;
use crate::{Error, Result};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of ingesting one export file
struct FileOutcome {
    dataset: TridiumDataset,
    output_name: String,
    output_size: u64,
    rows_parsed: usize,
    warnings: usize,
}

/// Main entry point for the ingest command
pub async fn run_ingest(args: IngestArgs) -> Result<IngestStats> {
    setup_logging(args.get_log_level(), args.quiet)?;
    args.validate()?;

    let start_time = std::time::Instant::now();

    let files = discover_export_files(&args.inputs)?;
    if files.is_empty() {
        return Err(Error::configuration(
            "No export files (.csv, .txt) found under the given inputs".to_string(),
        ));
    }
    info!("Ingesting {} export files", files.len());

    tokio::fs::create_dir_all(&args.output_path)
        .await
        .map_err(|e| {
            Error::io(
                format!(
                    "Failed to create output directory '{}'",
                    args.output_path.display()
                ),
                e,
            )
        })?;

    let config = PipelineConfig::default().with_redaction(!args.no_redact);
    config.validate()?;
    let parser = Arc::new(ExportParser::new(config));

    let progress_bar = if args.show_progress() {
        Some(create_progress_bar(
            files.len() as u64,
            "Ingesting exports...",
        ))
    } else {
        None
    };

    let mut stats = IngestStats {
        files_discovered: files.len(),
        ..Default::default()
    };
    let mut failures: Vec<(PathBuf, String)> = Vec::new();
    let mut datasets: Vec<TridiumDataset> = Vec::new();

    let mut outcomes = stream::iter(files.into_iter().map(|path| {
        let parser = Arc::clone(&parser);
        let output_path = args.output_path.clone();
        let hint = args.format_hint;
        async move {
            let result = ingest_file(&parser, &path, hint, &output_path).await;
            (path, result)
        }
    }))
    .buffer_unordered(args.workers);

    while let Some((path, result)) = outcomes.next().await {
        if let Some(pb) = &progress_bar {
            pb.inc(1);
        }
        match result {
            Ok(outcome) => {
                stats.files_processed += 1;
                stats.datasets_written += 1;
                stats.rows_parsed += outcome.rows_parsed;
                stats.warnings_recorded += outcome.warnings;
                stats
                    .output_sizes
                    .push((outcome.output_name, outcome.output_size));
                datasets.push(outcome.dataset);
            }
            Err(error) => {
                stats.errors_encountered += 1;
                if args.fail_fast || is_critical_error(&error) {
                    if let Some(pb) = &progress_bar {
                        pb.abandon_with_message("Ingest aborted");
                    }
                    return Err(error);
                }
                warn!("Skipping '{}': {}", path.display(), error);
                failures.push((path, error.to_string()));
            }
        }
    }

    if let Some(pb) = &progress_bar {
        pb.finish_with_message("Ingest complete");
    }

    if !datasets.is_empty() {
        let (name, size) = write_topology(datasets, &args.output_path).await?;
        stats.output_sizes.push((name, size));
    }

    stats.processing_time = start_time.elapsed();
    stats.output_sizes.sort();

    match args.output_format {
        OutputFormat::Human => print_summary(&stats, &failures),
        OutputFormat::Json => print_json_summary(&stats, &failures)?,
    }

    Ok(stats)
}

/// Ingest one export file and write its normalized dataset JSON
async fn ingest_file(
    parser: &ExportParser,
    path: &Path,
    hint: Option<DatasetFormat>,
    output_path: &Path,
) -> Result<FileOutcome> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io(format!("Failed to read '{}'", path.display()), e))?;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let outcome = parser.parse(&content, &filename, hint)?;
    let dataset = outcome.dataset;

    info!(
        "Parsed '{}' as {}: {} rows, {} row errors",
        filename,
        dataset.format,
        dataset.row_count(),
        dataset.summary.parse_errors
    );
    for warning in &outcome.warnings {
        warn!("'{}': {}", filename, warning);
    }

    let output_name = format!("{}.json", dataset.id);
    let output_file = output_path.join(&output_name);
    let json = serde_json::to_vec_pretty(&dataset)
        .map_err(|e| Error::serialization("Failed to serialize dataset", e))?;
    let output_size = json.len() as u64;
    tokio::fs::write(&output_file, json)
        .await
        .map_err(|e| Error::io(format!("Failed to write '{}'", output_file.display()), e))?;

    Ok(FileOutcome {
        output_name,
        output_size,
        rows_parsed: dataset.row_count(),
        warnings: outcome.warnings.len() + dataset.metadata.warnings.len(),
        dataset,
    })
}

/// Assemble the combined station topology and write it beside the datasets
///
/// Station exports feed in before device exports so auto-association sees
/// the stations a device file should attach to.
async fn write_topology(
    mut datasets: Vec<TridiumDataset>,
    output_path: &Path,
) -> Result<(String, u64)> {
    datasets.sort_by_key(|dataset| dataset.format.is_device_format());

    let service = TopologyService::new();
    let mut topology = service.topology().await;
    for dataset in datasets {
        topology = service.add_dataset(dataset).await;
    }
    for warning in &topology.warnings {
        warn!("topology: {}", warning);
    }

    let output_name = "topology.json".to_string();
    let output_file = output_path.join(&output_name);
    let json = serde_json::to_vec_pretty(&topology)
        .map_err(|e| Error::serialization("Failed to serialize topology", e))?;
    let output_size = json.len() as u64;
    tokio::fs::write(&output_file, json)
        .await
        .map_err(|e| Error::io(format!("Failed to write '{}'", output_file.display()), e))?;

    info!(
        "Wrote combined topology: {} stations, {} devices",
        topology.station_count(),
        topology.device_count()
    );
    Ok((output_name, output_size))
}

/// Print human-readable ingest summary
fn print_summary(stats: &IngestStats, failures: &[(PathBuf, String)]) {
    use colored::Colorize;

    println!("\nNiagara Ingest Complete");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   • Files discovered: {}", stats.files_discovered);
    println!(
        "   • Files ingested: {}",
        stats.files_processed.to_string().green()
    );
    println!("   • Rows parsed: {}", stats.rows_parsed);
    println!("   • Warnings recorded: {}", stats.warnings_recorded);
    println!(
        "   • Total output size: {}",
        IngestStats::format_size(stats.total_output_size())
    );
    println!("   • Processing time: {:.2?}", stats.processing_time);

    if stats.errors_encountered > 0 {
        println!(
            "   • Files failed: {}",
            stats.errors_encountered.to_string().red()
        );
        for (path, message) in failures {
            println!("     - {}: {}", path.display(), message);
        }
    }

    if !stats.output_sizes.is_empty() {
        println!("\nOutput Files:");
        for (filename, size) in &stats.output_sizes {
            println!("   • {}: {}", filename, IngestStats::format_size(*size));
        }
    }
    println!();
}

/// Print machine-readable ingest summary
fn print_json_summary(stats: &IngestStats, failures: &[(PathBuf, String)]) -> Result<()> {
    let json_stats = serde_json::json!({
        "files_discovered": stats.files_discovered,
        "files_processed": stats.files_processed,
        "datasets_written": stats.datasets_written,
        "rows_parsed": stats.rows_parsed,
        "warnings_recorded": stats.warnings_recorded,
        "errors_encountered": stats.errors_encountered,
        "processing_time_seconds": stats.processing_time.as_secs_f64(),
        "total_output_size_bytes": stats.total_output_size(),
        "output_files": stats.output_sizes.iter().map(|(name, size)| {
            serde_json::json!({ "filename": name, "size_bytes": size })
        }).collect::<Vec<_>>(),
        "failures": failures.iter().map(|(path, message)| {
            serde_json::json!({ "path": path.display().to_string(), "error": message })
        }).collect::<Vec<_>>(),
    });
    let rendered = serde_json::to_string_pretty(&json_stats)
        .map_err(|e| Error::serialization("Failed to render ingest summary", e))?;
    println!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::DatasetFormat;
    use tempfile::TempDir;

    fn default_parser() -> ExportParser {
        ExportParser::new(PipelineConfig::default())
    }

    #[tokio::test]
    async fn test_ingest_file_writes_dataset_json() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("JacesExport.csv");
        tokio::fs::write(
            &input,
            "Name,Status,Address,Controller Type\nVMA-101,{ok},1,VMA14\n",
        )
        .await
        .unwrap();
        let output_dir = temp_dir.path().join("out");
        tokio::fs::create_dir_all(&output_dir).await.unwrap();

        let outcome = ingest_file(&default_parser(), &input, None, &output_dir)
            .await
            .unwrap();
        assert_eq!(outcome.rows_parsed, 1);

        let written = output_dir.join(&outcome.output_name);
        let json = tokio::fs::read_to_string(&written).await.unwrap();
        let dataset: crate::TridiumDataset = serde_json::from_str(&json).unwrap();
        assert_eq!(dataset.format, DatasetFormat::N2Export);
    }

    #[tokio::test]
    async fn test_write_topology_associates_device_files() {
        let temp_dir = TempDir::new().unwrap();
        let parser = default_parser();

        let network = parser
            .parse(
                "Path,Name,Type,Address,Host Model,Version,Status,Client Conn,Server Conn\n\
                 /Drivers/NiagaraNetwork/SH_East,SH_East,Niagara Station,ip:10.0.0.5,TITAN,4.10.0.154,{ok},Connected,Connected\n",
                "network.csv",
                None,
            )
            .unwrap()
            .dataset;
        let devices = parser
            .parse(
                "Name,Status,Address,Controller Type\nVMA-101,{ok},1,VMA14\n",
                "SH_East_n2.csv",
                None,
            )
            .unwrap()
            .dataset;

        // Device dataset listed first; ordering inside write_topology fixes it
        let (name, size) = write_topology(vec![devices, network], temp_dir.path())
            .await
            .unwrap();
        assert_eq!(name, "topology.json");
        assert!(size > 0);

        let json = tokio::fs::read_to_string(temp_dir.path().join(name))
            .await
            .unwrap();
        let topology: crate::app::models::topology::Topology =
            serde_json::from_str(&json).unwrap();
        assert!(topology
            .find_node_by_id("station:SH_East/driver:n2/device:VMA-101@1")
            .is_some());
    }

    #[tokio::test]
    async fn test_ingest_file_fatal_on_empty() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("empty.csv");
        tokio::fs::write(&input, "   \n").await.unwrap();

        let result = ingest_file(&default_parser(), &input, None, temp_dir.path()).await;
        assert!(matches!(result, Err(Error::ExportFormat { .. })));
    }

    #[tokio::test]
    async fn test_ingest_file_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        let result = ingest_file(
            &default_parser(),
            &temp_dir.path().join("missing.csv"),
            None,
            temp_dir.path(),
        )
        .await;
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
