use clap::Parser;
use niagara_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Set up graceful shutdown handling
        let shutdown_signal = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C signal handler");
        };

        // Run the main command with cancellation support
        tokio::select! {
            result = commands::run(args) => {
                result
            }
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                Err(niagara_processor::Error::processing_interrupted(
                    "Processing interrupted by user".to_string()
                ))
            }
        }
    });

    match result {
        Ok(_stats) => {
            // Success - stats have already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Niagara Processor - Tridium Diagnostic Export Converter");
    println!("=======================================================");
    println!();
    println!("Convert Tridium Niagara diagnostic exports into normalized JSON health");
    println!("datasets and a queryable station topology.");
    println!();
    println!("USAGE:");
    println!("    niagara-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    ingest      Ingest export files into normalized datasets (main command)");
    println!("    topology    Assemble and display the station topology");
    println!("    formats     List the supported export formats");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Ingest every export under a directory:");
    println!("    niagara-processor ingest ./exports --output ./datasets");
    println!();
    println!("    # Force a format when the header is ambiguous:");
    println!("    niagara-processor ingest JacesExport.csv --format-hint N2Export");
    println!();
    println!("    # Assemble and print the station topology:");
    println!("    niagara-processor topology ./datasets --output-format json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    niagara-processor <COMMAND> --help");
}
