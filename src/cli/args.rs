//! Command-line argument definitions for the Niagara processor
//!
//! This module defines the complete CLI interface using clap derive API.

use crate::app::models::DatasetFormat;
use crate::constants::default_ingest_workers;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the Niagara diagnostic export processor
///
/// Converts Tridium Niagara diagnostic exports (device listings, resource
/// dumps, platform reports) into normalized JSON health datasets and a
/// queryable station topology.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "niagara-processor",
    version,
    about = "Convert Tridium Niagara diagnostic exports into normalized health datasets",
    long_about = "A production-ready tool that processes Tridium Niagara diagnostic exports \
                  (N2/BACnet device listings, station resource dumps, NiagaraNetwork exports, \
                  platform text reports) into normalized JSON datasets, and assembles the \
                  Supervisor -> Station -> Driver -> Device topology from them. Credential \
                  columns are redacted on ingest."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the Niagara processor
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Ingest export files into normalized datasets (default command)
    Ingest(IngestArgs),
    /// Assemble and display the station topology from ingested datasets
    Topology(TopologyArgs),
    /// List the supported export formats and their identifying columns
    Formats(FormatsArgs),
}

/// Arguments for the ingest command (main export processing)
#[derive(Debug, Clone, Parser)]
pub struct IngestArgs {
    /// Export files or directories to ingest
    ///
    /// Directories are walked recursively for .csv and .txt exports.
    #[arg(value_name = "PATH", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output directory for normalized dataset JSON files
    ///
    /// Will be created if it doesn't exist. One JSON file is written per
    /// ingested export, named after the dataset id.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        default_value = "./output",
        help = "Output directory for normalized dataset JSON files"
    )]
    pub output_path: PathBuf,

    /// Force a specific export format instead of detecting it
    ///
    /// The hint is still validated against each file's header set; a
    /// mismatch fails that file rather than silently overriding.
    #[arg(
        long = "format-hint",
        value_name = "FORMAT",
        help = "Force an export format (N2Export, ResourceExport, BacnetExport, NiagaraNetExport, NiagaraPathExport, PlatformDetails)"
    )]
    pub format_hint: Option<DatasetFormat>,

    /// Keep credential columns unmasked
    ///
    /// By default, password/secret/credential columns are replaced with a
    /// redaction mask before the dataset is written anywhere.
    #[arg(long = "no-redact", help = "Keep credential columns unmasked")]
    pub no_redact: bool,

    /// Stop at the first file that fails
    ///
    /// By default a fatal error on one file is reported and the batch
    /// continues with the next file.
    #[arg(long = "fail-fast", help = "Stop at the first file that fails")]
    pub fail_fast: bool,

    /// Number of parallel workers
    ///
    /// Controls how many files are parsed concurrently. Each file is an
    /// independent pipeline invocation.
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        default_value_t = default_ingest_workers(),
        help = "Number of parallel workers for ingest"
    )]
    pub workers: usize,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors and critical messages. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for machine-readable results
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the topology command (tree assembly and display)
#[derive(Debug, Clone, Parser)]
pub struct TopologyArgs {
    /// Dataset JSON files or directories produced by `ingest`
    #[arg(value_name = "PATH", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Show only the subtree of one station
    #[arg(
        long = "station",
        value_name = "NAME",
        help = "Show only the subtree of the named station"
    )]
    pub station: Option<String>,

    /// Output file for the topology
    ///
    /// If not specified, outputs to stdout
    #[arg(
        short = 'o',
        long = "output-file",
        value_name = "FILE",
        help = "Output file for the topology"
    )]
    pub output_file: Option<PathBuf>,

    /// Output format for the topology
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for the topology"
    )]
    pub output_format: OutputFormat,

    /// Enable verbose logging output
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Enable verbose logging (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// Arguments for the formats command (informational listing)
#[derive(Debug, Clone, Parser)]
pub struct FormatsArgs {
    /// Output format for the listing
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for the listing"
    )]
    pub output_format: OutputFormat,
}

/// Output format options for machine-readable results
#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .expect("Command should be present when get_command() is called")
    }
}

impl IngestArgs {
    /// Validate the ingest command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        for input in &self.inputs {
            if !input.exists() {
                return Err(Error::configuration(format!(
                    "Input path does not exist: {}",
                    input.display()
                )));
            }
        }

        if self.workers == 0 {
            return Err(Error::configuration(
                "Number of workers must be greater than 0".to_string(),
            ));
        }

        if self.workers > 100 {
            return Err(Error::configuration(
                "Number of workers cannot exceed 100".to_string(),
            ));
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }
}

impl TopologyArgs {
    /// Validate the topology command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        for input in &self.inputs {
            if !input.exists() {
                return Err(Error::configuration(format!(
                    "Input path does not exist: {}",
                    input.display()
                )));
            }
        }

        if let Some(output_file) = &self.output_file {
            if let Some(parent) = output_file.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(Error::configuration(format!(
                        "Output file directory does not exist: {}",
                        parent.display()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl Default for IngestArgs {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output_path: PathBuf::from("./output"),
            format_hint: None,
            no_redact: false,
            fail_fast: false,
            workers: default_ingest_workers(),
            verbose: 0,
            quiet: false,
            output_format: OutputFormat::Human,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ingest_args(inputs: Vec<PathBuf>) -> IngestArgs {
        IngestArgs {
            inputs,
            ..Default::default()
        }
    }

    #[test]
    fn test_ingest_args_validation() {
        let temp_dir = TempDir::new().unwrap();
        let args = ingest_args(vec![temp_dir.path().to_path_buf()]);
        assert!(args.validate().is_ok());

        // Nonexistent input path
        let args = ingest_args(vec![PathBuf::from("/nonexistent/path")]);
        assert!(args.validate().is_err());

        // Invalid worker counts
        let mut args = ingest_args(vec![temp_dir.path().to_path_buf()]);
        args.workers = 0;
        assert!(args.validate().is_err());
        args.workers = 101;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_format_hint_parses_known_names() {
        let temp_dir = TempDir::new().unwrap();
        let args = Args::parse_from([
            "niagara-processor",
            "ingest",
            "--format-hint",
            "N2Export",
            temp_dir.path().to_str().unwrap(),
        ]);
        let Commands::Ingest(ingest) = args.get_command() else {
            panic!("expected ingest command");
        };
        assert_eq!(ingest.format_hint, Some(DatasetFormat::N2Export));
    }

    #[test]
    fn test_log_level() {
        let temp_dir = TempDir::new().unwrap();
        let mut args = ingest_args(vec![temp_dir.path().to_path_buf()]);

        assert_eq!(args.get_log_level(), "warn");

        args.verbose = 1;
        assert_eq!(args.get_log_level(), "info");

        args.verbose = 2;
        assert_eq!(args.get_log_level(), "debug");

        args.verbose = 3;
        assert_eq!(args.get_log_level(), "trace");

        args.quiet = true;
        assert_eq!(args.get_log_level(), "error");
    }

    #[test]
    fn test_show_progress() {
        let temp_dir = TempDir::new().unwrap();
        let mut args = ingest_args(vec![temp_dir.path().to_path_buf()]);
        assert!(args.show_progress());

        args.quiet = true;
        assert!(!args.show_progress());

        args.quiet = false;
        args.output_format = OutputFormat::Json;
        assert!(!args.show_progress());
    }

    #[test]
    fn test_topology_args_validation() {
        let temp_dir = TempDir::new().unwrap();
        let args = TopologyArgs {
            inputs: vec![temp_dir.path().to_path_buf()],
            station: None,
            output_file: None,
            output_format: OutputFormat::Human,
            verbose: 0,
        };
        assert!(args.validate().is_ok());

        let mut args = args;
        args.output_file = Some(PathBuf::from("/nonexistent/dir/topology.json"));
        assert!(args.validate().is_err());
    }
}
