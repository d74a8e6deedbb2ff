//! Dataset to node association
//!
//! Each dataset is either unassociated or bound to one topology node.
//! Explicit bindings always win; the auto-match heuristic only runs when a
//! dataset has no binding yet. Every mutation reports whether the caller
//! should rebuild the topology, and the caller coalesces those flags, so a
//! burst of changes costs one rebuild.

use crate::app::models::topology::Topology;
use crate::app::models::TridiumDataset;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// Whether a mutation changed anything the topology depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Rebuild {
    Needed,
    NotNeeded,
}

impl Rebuild {
    pub fn is_needed(self) -> bool {
        self == Rebuild::Needed
    }
}

/// Owns the dataset -> node binding map
#[derive(Debug, Default)]
pub struct AssociationEngine {
    bindings: HashMap<Uuid, String>,
}

impl AssociationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current binding map, keyed by dataset id
    pub fn bindings(&self) -> &HashMap<Uuid, String> {
        &self.bindings
    }

    /// Node a dataset is bound to, if any
    pub fn binding(&self, dataset_id: Uuid) -> Option<&str> {
        self.bindings.get(&dataset_id).map(String::as_str)
    }

    /// Explicitly bind a dataset to a node, replacing any prior binding
    pub fn bind(&mut self, dataset_id: Uuid, node_id: impl Into<String>) -> Rebuild {
        let node_id = node_id.into();
        if self.bindings.get(&dataset_id) == Some(&node_id) {
            return Rebuild::NotNeeded;
        }
        debug!("Binding dataset {} to {}", dataset_id, node_id);
        self.bindings.insert(dataset_id, node_id);
        Rebuild::Needed
    }

    /// Remove a dataset's binding
    pub fn unbind(&mut self, dataset_id: Uuid) -> Rebuild {
        match self.bindings.remove(&dataset_id) {
            Some(node_id) => {
                debug!("Unbound dataset {} from {}", dataset_id, node_id);
                Rebuild::Needed
            }
            None => Rebuild::NotNeeded,
        }
    }

    /// Try to bind an unbound dataset to a station by heuristic
    ///
    /// Match conditions, case-insensitive: the dataset filename contains
    /// the station name, or the first row's station field equals it. Never
    /// rebinds a dataset that already has a binding.
    pub fn auto_associate(&mut self, dataset: &TridiumDataset, topology: &Topology) -> Rebuild {
        if self.bindings.contains_key(&dataset.id) {
            return Rebuild::NotNeeded;
        }

        let filename = dataset.filename.to_lowercase();
        let station_field = dataset.first_row_station_field().map(str::to_lowercase);

        for station in topology.stations() {
            let station_name = station.name.to_lowercase();
            let filename_matches = filename.contains(&station_name);
            let field_matches = station_field.as_deref() == Some(station_name.as_str());
            if filename_matches || field_matches {
                debug!(
                    "Auto-associated dataset '{}' with {}",
                    dataset.filename, station.id
                );
                self.bindings.insert(dataset.id, station.id.clone());
                return Rebuild::Needed;
            }
        }

        Rebuild::NotNeeded
    }
}
