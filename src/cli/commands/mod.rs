//! Command implementations for the Niagara processor CLI
//!
//! This module contains the main command execution logic, progress
//! reporting, and error handling for the CLI interface. Each command is
//! implemented in its own module for better organization and
//! maintainability.

pub mod formats;
pub mod ingest;
pub mod shared;
pub mod topology;

// Re-export the main types and functions for backward compatibility
pub use shared::IngestStats;

use crate::cli::args::{Args, Commands};
use crate::Result;

/// Main command runner for the Niagara processor
///
/// This function dispatches to the appropriate subcommand handler based on
/// CLI args. Each command is implemented in its own module:
/// - `ingest`: batch export ingestion with JSON dataset output
/// - `topology`: station topology assembly and display
/// - `formats`: informational listing of supported export formats
pub async fn run(args: Args) -> Result<IngestStats> {
    match args.get_command() {
        Commands::Ingest(ingest_args) => ingest::run_ingest(ingest_args).await,
        Commands::Topology(topology_args) => topology::run_topology(topology_args).await,
        Commands::Formats(formats_args) => formats::run_formats(formats_args).await,
    }
}
