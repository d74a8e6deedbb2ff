//! Shared components for CLI commands
//!
//! This module contains common types, utilities, and functions used across
//! multiple CLI command implementations.

use crate::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Ingest statistics for reporting across all commands
#[derive(Debug, Clone, Default)]
pub struct IngestStats {
    /// Number of export files discovered
    pub files_discovered: usize,
    /// Number of files successfully ingested
    pub files_processed: usize,
    /// Number of normalized dataset files written
    pub datasets_written: usize,
    /// Total rows surviving parsing across all datasets
    pub rows_parsed: usize,
    /// Number of files that failed with a fatal error
    pub errors_encountered: usize,
    /// Advisory warnings recorded across all files
    pub warnings_recorded: usize,
    /// Total processing time
    pub processing_time: std::time::Duration,
    /// Output file sizes in bytes
    pub output_sizes: Vec<(String, u64)>,
}

impl IngestStats {
    /// Calculate total output size in bytes
    pub fn total_output_size(&self) -> u64 {
        self.output_sizes.iter().map(|(_, size)| size).sum()
    }

    /// Format output size in human-readable format
    pub fn format_size(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}

/// Set up structured logging for a command
pub fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("niagara_processor={}", log_level)));

    // Set up subscriber based on output preference
    if quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Discover export files under the given input paths
///
/// Files are accepted directly when they carry a recognized extension;
/// directories are walked recursively. Results are sorted for a stable
/// processing order.
pub fn discover_export_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    use walkdir::WalkDir;

    let mut export_files = Vec::new();

    for input in inputs {
        if input.is_file() {
            if is_export_file(input) {
                export_files.push(input.clone());
            }
            continue;
        }

        for entry in WalkDir::new(input).follow_links(false) {
            let entry = entry.map_err(|e| {
                Error::directory_traversal(
                    format!("Failed to walk input directory {}", input.display()),
                    e,
                )
            })?;
            let path = entry.path();
            if path.is_file() && is_export_file(path) {
                export_files.push(path.to_path_buf());
            }
        }
    }

    export_files.sort();
    export_files.dedup();

    debug!("Discovered {} export files", export_files.len());
    for file in &export_files {
        debug!("  Found: {}", file.display());
    }

    Ok(export_files)
}

fn is_export_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("csv") | Some("txt")
    )
}

/// Discover normalized dataset JSON files under the given input paths
pub fn discover_dataset_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    use walkdir::WalkDir;

    let mut dataset_files = Vec::new();

    for input in inputs {
        if input.is_file() {
            dataset_files.push(input.clone());
            continue;
        }

        for entry in WalkDir::new(input).follow_links(false) {
            let entry = entry.map_err(|e| {
                Error::directory_traversal(
                    format!("Failed to walk input directory {}", input.display()),
                    e,
                )
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
                dataset_files.push(path.to_path_buf());
            }
        }
    }

    dataset_files.sort();
    dataset_files.dedup();
    Ok(dataset_files)
}

/// Check if an error is critical enough to stop a batch
pub fn is_critical_error(error: &Error) -> bool {
    matches!(
        error,
        Error::Configuration { .. } | Error::ProcessingInterrupted { .. }
    )
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} [{per_sec}] ETA: {eta}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}
