//! Station topology service
//!
//! Derives and serves the Supervisor -> Station -> Driver -> Device tree.
//! Assembly itself is pure (`build_topology`); this module adds the one
//! piece of shared mutable state in the system, the association map plus
//! its derived topology, behind a single async mutex so an association
//! mutation and a rebuild never interleave.
//!
//! # Architecture
//!
//! - `builder` - pure tree assembly from datasets and the association map
//! - `association` - dataset binding state machine and auto-match heuristic
//!
//! # Usage
//!
//! ```rust,no_run
//! use niagara_processor::app::services::topology::TopologyService;
//!
//! # async fn example(dataset: niagara_processor::TridiumDataset) -> niagara_processor::Result<()> {
//! let service = TopologyService::new();
//! service.add_dataset(dataset).await;
//! let topology = service.topology().await;
//! println!("{} stations", topology.station_count());
//! # Ok(())
//! # }
//! ```

pub mod association;
pub mod builder;

#[cfg(test)]
pub mod tests;

pub use association::{AssociationEngine, Rebuild};
pub use builder::build_topology;

use crate::app::models::topology::{Topology, TopologyNode};
use crate::app::models::TridiumDataset;
use crate::{Error, Result};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

struct ServiceState {
    engine: AssociationEngine,
    datasets: Vec<TridiumDataset>,
    topology: Topology,
}

impl ServiceState {
    fn rebuild(&mut self) {
        self.topology = build_topology(&self.datasets, self.engine.bindings());
    }
}

/// Single-writer owner of the association map and derived topology
///
/// All mutation goes through one mutex; callers get cloned snapshots, so
/// readers never block a rebuild for long and never observe a half-built
/// tree.
pub struct TopologyService {
    state: Mutex<ServiceState>,
}

impl TopologyService {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ServiceState {
                engine: AssociationEngine::new(),
                datasets: Vec::new(),
                topology: Topology::new(),
            }),
        }
    }

    /// Seed the service with previously stored datasets and bindings
    ///
    /// The caller owns durable storage; on startup it re-supplies what it
    /// saved and gets the same tree back.
    pub async fn restore(
        &self,
        datasets: Vec<TridiumDataset>,
        bindings: HashMap<Uuid, String>,
    ) -> Topology {
        let mut state = self.state.lock().await;
        state.datasets = datasets;
        state.engine = AssociationEngine::new();
        for (dataset_id, node_id) in bindings {
            let _ = state.engine.bind(dataset_id, node_id);
        }
        state.rebuild();
        state.topology.clone()
    }

    /// Add a dataset, auto-associate it, and rebuild when anything changed
    pub async fn add_dataset(&self, dataset: TridiumDataset) -> Topology {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        // Match against the current tree before the new dataset lands in it
        let _ = state.engine.auto_associate(&dataset, &state.topology);
        state.datasets.push(dataset);
        // A network export changes the tree by itself; a device export
        // changes it through its association. Rebuild unconditionally
        // rather than special-casing.
        state.rebuild();
        info!(
            "Topology rebuilt: {} nodes across {} roots",
            state.topology.node_count(),
            state.topology.roots.len()
        );
        state.topology.clone()
    }

    /// Explicitly bind a dataset to a node and rebuild if needed
    pub async fn bind(&self, dataset_id: Uuid, node_id: &str) -> Result<Topology> {
        let mut state = self.state.lock().await;
        if !state.datasets.iter().any(|d| d.id == dataset_id) {
            return Err(Error::data_validation(format!(
                "Unknown dataset: {}",
                dataset_id
            )));
        }
        if state.topology.find_node_by_id(node_id).is_none() {
            return Err(Error::node_not_found(node_id));
        }
        if state.engine.bind(dataset_id, node_id).is_needed() {
            state.rebuild();
        }
        Ok(state.topology.clone())
    }

    /// Remove a dataset's binding and rebuild if needed
    pub async fn unbind(&self, dataset_id: Uuid) -> Topology {
        let mut state = self.state.lock().await;
        if state.engine.unbind(dataset_id).is_needed() {
            state.rebuild();
        }
        state.topology.clone()
    }

    /// Current topology snapshot
    pub async fn topology(&self) -> Topology {
        self.state.lock().await.topology.clone()
    }

    /// Find a node by its path id
    pub async fn find_node(&self, node_id: &str) -> Result<TopologyNode> {
        self.state
            .lock()
            .await
            .topology
            .find_node_by_id(node_id)
            .cloned()
            .ok_or_else(|| Error::node_not_found(node_id))
    }

    /// Current dataset bindings, keyed by dataset id
    pub async fn bindings(&self) -> HashMap<Uuid, String> {
        self.state.lock().await.engine.bindings().clone()
    }
}

impl Default for TopologyService {
    fn default() -> Self {
        Self::new()
    }
}
