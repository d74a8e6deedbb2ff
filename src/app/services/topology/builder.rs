//! Pure topology assembly
//!
//! `build_topology` derives the Supervisor -> Station -> Driver -> Device
//! tree from the current dataset set plus the association map. It is a pure
//! function: given the same datasets and associations it produces the same
//! tree with the same node ids, so rebuilds are cheap and idempotent.

use crate::app::models::topology::{
    DriverProtocol, NodeKind, Topology, TopologyNode,
};
use crate::app::models::{DatasetFormat, ParsedStatus, TridiumDataset};
use crate::app::services::normalizer::{bacnet, n2, network, NetworkStationRow};
use crate::constants::{
    NIAGARA_TYPE_MARKER, SUPERVISOR_NAME_MARKER, WORKSTATION_MODEL_MARKER,
};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// Deterministic path id for a station node
pub fn station_id(name: &str) -> String {
    format!("station:{}", name)
}

/// Deterministic path id for a driver node under a station
pub fn driver_id(station: &str, protocol: DriverProtocol) -> String {
    format!("{}/driver:{}", station_id(station), protocol)
}

/// Deterministic path id for a device node under a driver
pub fn device_id(station: &str, protocol: DriverProtocol, name: &str, address: &str) -> String {
    format!("{}/device:{}@{}", driver_id(station, protocol), name, address)
}

/// Supervisor classification per row
///
/// A row is a supervisor only when its type declares a Niagara station AND
/// either the name or the host model gives it away. Everything else is a
/// JACE.
fn classify_station(row: &NetworkStationRow) -> NodeKind {
    let type_is_niagara = row
        .station_type
        .to_lowercase()
        .contains(NIAGARA_TYPE_MARKER);
    let name_marks_supervisor = row.name.to_lowercase().contains(SUPERVISOR_NAME_MARKER);
    let model_marks_supervisor = row
        .host_model
        .to_lowercase()
        .contains(WORKSTATION_MODEL_MARKER);

    if type_is_niagara && (name_marks_supervisor || model_marks_supervisor) {
        NodeKind::Supervisor
    } else {
        NodeKind::Jace
    }
}

fn station_node(row: &NetworkStationRow) -> TopologyNode {
    let mut node = TopologyNode::new(station_id(&row.name), row.name.clone(), classify_station(row));
    node.status = Some(ParsedStatus::new(row.status, Vec::new()));
    node.ip_address = row.ip_address.clone();
    node.version = (!row.version.is_empty()).then(|| row.version.clone());
    node.host_model = (!row.host_model.is_empty()).then(|| row.host_model.clone());
    node.connection = Some(row.connection);
    node
}

/// Build the topology tree from the full dataset set and association map
///
/// Association map: dataset id -> node path id. Device datasets attach as a
/// driver under their associated station; re-supplying a (station, protocol)
/// pair replaces that driver's device list wholesale. Unassociated device
/// datasets are recorded as warnings, never errors.
pub fn build_topology(
    datasets: &[TridiumDataset],
    associations: &HashMap<Uuid, String>,
) -> Topology {
    let mut topology = Topology::new();
    let mut stations: Vec<TopologyNode> = Vec::new();

    for dataset in datasets.iter().filter(|d| d.format.is_network_format()) {
        let (rows, warnings) = network::from_rows(&dataset.rows);
        topology.warnings.extend(warnings);

        for row in &rows {
            let node = station_node(row);
            match stations.iter_mut().find(|s| s.name == node.name) {
                Some(existing) => {
                    // Same station seen again in this build: update in
                    // place, keep drivers and bindings
                    let children = std::mem::take(&mut existing.children);
                    let dataset_ids = std::mem::take(&mut existing.dataset_ids);
                    *existing = node;
                    existing.children = children;
                    existing.dataset_ids = dataset_ids;
                }
                None => stations.push(node),
            }
        }
    }

    for dataset in datasets.iter().filter(|d| d.format.is_device_format()) {
        let Some(node_id) = associations.get(&dataset.id) else {
            topology.warnings.push(format!(
                "Dataset '{}' is not associated with any station",
                dataset.filename
            ));
            continue;
        };
        let Some(station) = stations
            .iter_mut()
            .find(|s| s.id == *node_id || node_id.starts_with(&format!("{}/", s.id)))
        else {
            topology.warnings.push(format!(
                "Dataset '{}' is bound to unknown node '{}'",
                dataset.filename, node_id
            ));
            continue;
        };

        let station_name = station.name.clone();
        let driver = build_driver(&station_name, dataset, &mut topology.warnings);
        debug!(
            "Attaching {} driver with {} devices to {}",
            driver.protocol.map(|p| p.as_str()).unwrap_or("?"),
            driver.children.len(),
            station.id
        );
        // Replace-on-update per (station, protocol)
        station.children.retain(|child| child.id != driver.id);
        station.children.push(driver);
    }

    for (dataset_id, node_id) in associations {
        if let Some(node) = stations
            .iter_mut()
            .find_map(|station| station.find_mut(node_id))
        {
            node.dataset_ids.push(*dataset_id);
        }
    }
    for station in &mut stations {
        sort_dataset_ids(station);
    }

    attach_roots(&mut topology, stations);
    topology
}

fn build_driver(
    station_name: &str,
    dataset: &TridiumDataset,
    warnings: &mut Vec<String>,
) -> TopologyNode {
    let protocol = match dataset.format {
        DatasetFormat::BacnetExport => DriverProtocol::Bacnet,
        DatasetFormat::N2Export => DriverProtocol::N2,
        _ => DriverProtocol::Custom,
    };
    let mut driver = TopologyNode::new(
        driver_id(station_name, protocol),
        protocol.to_string(),
        NodeKind::Driver,
    );
    driver.protocol = Some(protocol);

    match dataset.format {
        DatasetFormat::BacnetExport => {
            let (devices, device_warnings) = bacnet::from_rows(&dataset.rows);
            warnings.extend(device_warnings);
            for device in devices {
                let address = if device.mac_address.is_empty() {
                    device.device_id.to_string()
                } else {
                    device.mac_address.clone()
                };
                let mut node = TopologyNode::new(
                    device_id(station_name, protocol, &device.name, &address),
                    device.name.clone(),
                    NodeKind::Device,
                );
                node.status = Some(ParsedStatus::new(device.status, Vec::new()));
                node.address = Some(address);
                node.vendor = (!device.vendor.is_empty()).then(|| device.vendor.clone());
                node.model = (!device.model.is_empty()).then(|| device.model.clone());
                driver.children.push(node);
            }
        }
        DatasetFormat::N2Export => {
            let (devices, device_warnings) = n2::from_rows(&dataset.rows);
            warnings.extend(device_warnings);
            for device in devices {
                let address = device.address.to_string();
                let mut node = TopologyNode::new(
                    device_id(station_name, protocol, &device.name, &address),
                    device.name.clone(),
                    NodeKind::Device,
                );
                node.status = Some(ParsedStatus::new(device.status, Vec::new()));
                node.address = Some(address);
                node.model =
                    (!device.controller_type.is_empty()).then(|| device.controller_type.clone());
                driver.children.push(node);
            }
        }
        _ => {}
    }

    driver
}

fn sort_dataset_ids(node: &mut TopologyNode) {
    node.dataset_ids.sort();
    for child in &mut node.children {
        sort_dataset_ids(child);
    }
}

/// Hang JACE stations off the supervisor when one exists, else stations
/// are roots themselves
fn attach_roots(topology: &mut Topology, stations: Vec<TopologyNode>) {
    let has_supervisor = stations.iter().any(|s| s.kind == NodeKind::Supervisor);
    if !has_supervisor {
        topology.roots = stations;
        return;
    }

    let mut supervisors = Vec::new();
    let mut jaces = Vec::new();
    for station in stations {
        match station.kind {
            NodeKind::Supervisor => supervisors.push(station),
            _ => jaces.push(station),
        }
    }
    supervisors[0].children.extend(jaces);
    topology.roots = supervisors;
}
