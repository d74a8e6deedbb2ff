//! Formats command implementation
//!
//! Informational listing of the supported export formats, their
//! identifying columns, and how each is detected.

use crate::app::models::DatasetFormat;
use crate::app::services::export_parser::FORMAT_SPECS;
use crate::cli::args::{FormatsArgs, OutputFormat};
use crate::cli::commands::shared::IngestStats;
use crate::{Error, Result};

/// Main entry point for the formats command
pub async fn run_formats(args: FormatsArgs) -> Result<IngestStats> {
    match args.output_format {
        OutputFormat::Human => print_table(),
        OutputFormat::Json => print_json()?,
    }
    Ok(IngestStats::default())
}

fn print_table() {
    use colored::Colorize;

    println!("\nSupported Niagara export formats:");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for spec in FORMAT_SPECS {
        let detection = if spec.exact_only {
            "exact header match only"
        } else {
            "exact match, fuzzy fallback"
        };
        println!("\n  {} ({})", spec.format.to_string().cyan(), detection);
        println!("    identifiers: {}", spec.identifier_columns.join(", "));
        if !spec.optional_columns.is_empty() {
            println!("    optional:    {}", spec.optional_columns.join(", "));
        }
        if let Some(status) = spec.status_column {
            println!("    status:      {}", status);
        }
    }
    println!(
        "\n  {} (free-text report, selected by .txt extension)",
        DatasetFormat::PlatformDetails.to_string().cyan()
    );
    println!();
}

fn print_json() -> Result<()> {
    let mut formats: Vec<serde_json::Value> = FORMAT_SPECS
        .iter()
        .map(|spec| {
            serde_json::json!({
                "format": spec.format.to_string(),
                "identifier_columns": spec.identifier_columns,
                "optional_columns": spec.optional_columns,
                "status_column": spec.status_column,
                "exact_only": spec.exact_only,
            })
        })
        .collect();
    formats.push(serde_json::json!({
        "format": DatasetFormat::PlatformDetails.to_string(),
        "identifier_columns": [],
        "optional_columns": [],
        "status_column": null,
        "exact_only": false,
        "note": "free-text report, selected by .txt extension",
    }));

    let rendered = serde_json::to_string_pretty(&formats)
        .map_err(|e| Error::serialization("Failed to render format listing", e))?;
    println!("{}", rendered);
    Ok(())
}
