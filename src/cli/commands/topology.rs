//! Topology command implementation
//!
//! Loads normalized dataset JSON files produced by `ingest`, feeds them
//! through the topology service (auto-associating device datasets with
//! their stations), and renders the resulting tree.

use crate::app::models::topology::{Topology, TopologyNode};
use crate::app::models::TridiumDataset;
use crate::app::services::topology::TopologyService;
use crate::cli::args::{OutputFormat, TopologyArgs};
use crate::cli::commands::shared::{discover_dataset_files, setup_logging, IngestStats};
use crate::{Error, Result};
use std::path::PathBuf;
use tracing::{info, warn};

/// Main entry point for the topology command
pub async fn run_topology(args: TopologyArgs) -> Result<IngestStats> {
    setup_logging(args.get_log_level(), false)?;
    args.validate()?;

    let files = discover_dataset_files(&args.inputs)?;
    if files.is_empty() {
        return Err(Error::configuration(
            "No dataset JSON files found under the given inputs".to_string(),
        ));
    }

    let datasets = load_datasets(&files).await?;
    info!("Loaded {} datasets", datasets.len());

    let service = TopologyService::new();
    let mut topology = Topology::new();
    for dataset in datasets {
        topology = service.add_dataset(dataset).await;
    }

    for warning in &topology.warnings {
        warn!("{}", warning);
    }

    let rendered = match args.output_format {
        OutputFormat::Json => render_json(&topology, args.station.as_deref())?,
        OutputFormat::Human => render_tree(&topology, args.station.as_deref())?,
    };

    match &args.output_file {
        Some(path) => {
            tokio::fs::write(path, rendered).await.map_err(|e| {
                Error::io(format!("Failed to write '{}'", path.display()), e)
            })?;
            info!("Topology written to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(IngestStats::default())
}

async fn load_datasets(files: &[PathBuf]) -> Result<Vec<TridiumDataset>> {
    let mut datasets = Vec::with_capacity(files.len());
    for path in files {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::io(format!("Failed to read '{}'", path.display()), e))?;
        let dataset: TridiumDataset = serde_json::from_str(&json).map_err(|e| {
            Error::serialization(format!("Invalid dataset file '{}'", path.display()), e)
        })?;
        datasets.push(dataset);
    }
    Ok(datasets)
}

fn station_subtree<'a>(topology: &'a Topology, station: &str) -> Result<&'a TopologyNode> {
    topology
        .stations()
        .into_iter()
        .find(|node| node.name.eq_ignore_ascii_case(station))
        .ok_or_else(|| Error::node_not_found(format!("station:{}", station)))
}

fn render_json(topology: &Topology, station: Option<&str>) -> Result<String> {
    let rendered = match station {
        Some(name) => serde_json::to_string_pretty(station_subtree(topology, name)?),
        None => serde_json::to_string_pretty(topology),
    };
    rendered.map_err(|e| Error::serialization("Failed to render topology", e))
}

/// Render the tree as indented, colorized text
fn render_tree(topology: &Topology, station: Option<&str>) -> Result<String> {
    let mut out = String::new();
    match station {
        Some(name) => render_node(station_subtree(topology, name)?, 0, &mut out),
        None => {
            for root in &topology.roots {
                render_node(root, 0, &mut out);
            }
        }
    }
    if out.is_empty() {
        out.push_str("(empty topology)\n");
    }
    Ok(out)
}

fn render_node(node: &TopologyNode, depth: usize, out: &mut String) {
    use colored::Colorize;
    use std::fmt::Write;

    let indent = "  ".repeat(depth);
    let label = match node.status.as_ref().map(|s| s.badge_text.as_str()) {
        Some("OK") => node.name.green().to_string(),
        Some("DOWN") | Some("FAULT") => node.name.red().to_string(),
        Some("ALARM") => node.name.yellow().to_string(),
        _ => node.name.normal().to_string(),
    };

    let mut detail = Vec::new();
    if let Some(ip) = &node.ip_address {
        detail.push(ip.clone());
    }
    if let Some(version) = &node.version {
        detail.push(version.clone());
    }
    if let Some(model) = &node.model {
        detail.push(model.clone());
    }
    let detail = if detail.is_empty() {
        String::new()
    } else {
        format!(" ({})", detail.join(", "))
    };

    // Write into a String cannot fail
    let _ = writeln!(out, "{}{} [{}]{}", indent, label, node.kind, detail);
    for child in &node.children {
        render_node(child, depth + 1, out);
    }
}
