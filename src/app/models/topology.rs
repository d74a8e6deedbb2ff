//! Topology data models for the Niagara station network
//!
//! The topology is a tree of owned nodes: an optional supervisor root, the
//! stations discovered under it, per-protocol driver nodes under each
//! station, and the field devices reported under each driver. Node ids are
//! deterministic path strings so rebuilds are stable and the association
//! map survives a rebuild.

use super::ParsedStatus;
use crate::constants::connection;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role of a node in the station topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Supervisor station (workstation-class host running Niagara)
    Supervisor,

    /// Embedded JACE controller station
    Jace,

    /// Per-protocol driver subsystem under a station
    Driver,

    /// Field device reported under a driver
    Device,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Supervisor => "supervisor",
            NodeKind::Jace => "jace",
            NodeKind::Driver => "driver",
            NodeKind::Device => "device",
        };
        write!(f, "{}", name)
    }
}

/// Connection state reported in the "Client Conn"/"Server Conn" columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionState {
    Connected,
    NotConnected,
    #[default]
    Unknown,
}

impl ConnectionState {
    /// Normalize a raw connection cell to a canonical state
    ///
    /// Case-insensitive substring test: "connected" without "not" wins,
    /// "not connected" loses, anything else is unknown.
    pub fn from_raw(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        if lowered.contains("not connected") {
            ConnectionState::NotConnected
        } else if lowered.contains("connected") && !lowered.contains("not") {
            ConnectionState::Connected
        } else {
            ConnectionState::Unknown
        }
    }

    /// Canonical display string for this state
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::Connected => connection::CONNECTED,
            ConnectionState::NotConnected => connection::NOT_CONNECTED,
            ConnectionState::Unknown => connection::UNKNOWN,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Client/server connection pair for a station row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSummary {
    pub client: ConnectionState,
    pub server: ConnectionState,
}

/// Protocol handled by a driver node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverProtocol {
    Bacnet,
    N2,
    Modbus,
    Lon,
    Custom,
}

impl DriverProtocol {
    /// Protocol name used in node ids and driver labels
    pub fn as_str(self) -> &'static str {
        use crate::constants::protocols;
        match self {
            DriverProtocol::Bacnet => protocols::BACNET,
            DriverProtocol::N2 => protocols::N2,
            DriverProtocol::Modbus => protocols::MODBUS,
            DriverProtocol::Lon => protocols::LON,
            DriverProtocol::Custom => protocols::CUSTOM,
        }
    }
}

impl fmt::Display for DriverProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DriverProtocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "bacnet" => Ok(DriverProtocol::Bacnet),
            "n2" => Ok(DriverProtocol::N2),
            "modbus" => Ok(DriverProtocol::Modbus),
            "lon" | "lonworks" => Ok(DriverProtocol::Lon),
            "custom" => Ok(DriverProtocol::Custom),
            other => Err(Error::topology(format!(
                "Unknown driver protocol: {}",
                other
            ))),
        }
    }
}

/// One node in the station topology tree
///
/// Children are owned: a station owns its drivers, a driver owns its
/// devices. Field presence depends on the node kind; absent data is `None`,
/// never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyNode {
    /// Deterministic path id (`station:<name>`, `.../driver:<protocol>`, ...)
    pub id: String,

    /// Display name from the source row
    pub name: String,

    /// Role of this node in the tree
    pub kind: NodeKind,

    /// Decoded status, when the source row carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ParsedStatus>,

    /// First dotted-quad substring of the address field, when any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    /// Niagara version reported for the station
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Host hardware model reported for the station
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_model: Option<String>,

    /// Driver protocol, present on driver nodes only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<DriverProtocol>,

    /// Device address string, present on device nodes when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Device vendor, present on device nodes when the export carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,

    /// Device or controller model, when the export carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Client/server connection pair, present on station nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionSummary>,

    /// Datasets currently associated with this node
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dataset_ids: Vec<Uuid>,

    /// Owned child nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TopologyNode>,
}

impl TopologyNode {
    /// Create a bare node with no decoded detail
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            status: None,
            ip_address: None,
            version: None,
            host_model: None,
            protocol: None,
            address: None,
            vendor: None,
            model: None,
            connection: None,
            dataset_ids: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Depth-first search for a node by id, including this node
    pub fn find(&self, id: &str) -> Option<&TopologyNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Mutable depth-first search for a node by id, including this node
    pub fn find_mut(&mut self, id: &str) -> Option<&mut TopologyNode> {
        if self.id == id {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(id))
    }

    /// Count nodes of a given kind in this subtree
    pub fn count_kind(&self, kind: NodeKind) -> usize {
        let own = usize::from(self.kind == kind);
        own + self
            .children
            .iter()
            .map(|child| child.count_kind(kind))
            .sum::<usize>()
    }
}

/// One topology snapshot from a discovery run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    /// Discovery run this snapshot belongs to
    pub run_id: Uuid,

    /// When the snapshot was assembled
    pub generated_at: DateTime<Utc>,

    /// Root nodes: the supervisor when one exists, otherwise stations
    pub roots: Vec<TopologyNode>,

    /// Advisory conditions recorded while assembling
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Topology {
    /// Create an empty snapshot stamped with a fresh run id
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            roots: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Find a node anywhere in the tree by its path id
    pub fn find_node_by_id(&self, id: &str) -> Option<&TopologyNode> {
        self.roots.iter().find_map(|root| root.find(id))
    }

    /// Iterate every station node (supervisor-as-station included)
    pub fn stations(&self) -> Vec<&TopologyNode> {
        let mut out = Vec::new();
        for root in &self.roots {
            collect_stations(root, &mut out);
        }
        out
    }

    /// Total node count across all roots
    pub fn node_count(&self) -> usize {
        fn count(node: &TopologyNode) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        self.roots.iter().map(count).sum()
    }

    /// Station count (supervisor and JACE nodes)
    pub fn station_count(&self) -> usize {
        self.roots
            .iter()
            .map(|root| {
                root.count_kind(NodeKind::Supervisor) + root.count_kind(NodeKind::Jace)
            })
            .sum()
    }

    /// Device count across all drivers
    pub fn device_count(&self) -> usize {
        self.roots
            .iter()
            .map(|root| root.count_kind(NodeKind::Device))
            .sum()
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_stations<'a>(node: &'a TopologyNode, out: &mut Vec<&'a TopologyNode>) {
    if matches!(node.kind, NodeKind::Supervisor | NodeKind::Jace) {
        out.push(node);
    }
    for child in &node.children {
        collect_stations(child, out);
    }
}
