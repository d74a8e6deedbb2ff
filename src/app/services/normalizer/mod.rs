//! Per-format dataset normalization
//!
//! Converts parsed datasets, or loosely-typed JSON from historical
//! producers, into one of five canonical schemas. Normalization is
//! idempotent: canonical input passes through unchanged, so a dataset may
//! safely run through this stage any number of times.
//!
//! # Architecture
//!
//! - `shapes` - legacy input shape probe and shared field helpers
//! - `platform` - platform-details summary schema
//! - `resources` - station resource metrics schema
//! - `network` - NiagaraNetwork station row schema (path exports included)
//! - `bacnet` - BACnet device row schema
//! - `n2` - N2 device row schema
//!
//! # Usage
//!
//! ```rust
//! use niagara_processor::app::models::DatasetFormat;
//! use niagara_processor::app::services::normalizer::{normalize, NormalizedData};
//! use serde_json::json;
//!
//! let payload = json!([
//!     { "Name": "VMA-101", "Status": "{ok}", "Address": "1", "Controller Type": "VMA14" }
//! ]);
//! let (normalized, _warnings) = normalize(DatasetFormat::N2Export, &payload);
//! assert!(matches!(normalized, NormalizedData::N2(_)));
//! ```

pub mod bacnet;
pub mod n2;
pub mod network;
pub mod platform;
pub mod resources;
pub mod shapes;

#[cfg(test)]
pub mod tests;

pub use bacnet::BacnetDeviceRow;
pub use n2::N2DeviceRow;
pub use network::NetworkStationRow;
pub use platform::{PlatformApplication, PlatformLicense, PlatformModule, PlatformSummary};
pub use resources::{CapacityGauge, EngineMetrics, ResourceMetrics};
pub use shapes::{probe_shape, ProbedShape, ShapeKind};

use crate::app::models::{DatasetFormat, TridiumDataset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// A dataset shaped into its canonical schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "schema", content = "data", rename_all = "snake_case")]
pub enum NormalizedData {
    Platform(PlatformSummary),
    Resources(ResourceMetrics),
    Network(Vec<NetworkStationRow>),
    Bacnet(Vec<BacnetDeviceRow>),
    N2(Vec<N2DeviceRow>),

    /// Unknown-format tables pass through untyped
    Generic(Value),
}

/// Legacy nesting section key for each format
fn section_key(format: DatasetFormat) -> &'static str {
    match format {
        DatasetFormat::PlatformDetails => "platform",
        DatasetFormat::ResourceExport => "resources",
        DatasetFormat::NiagaraNetExport | DatasetFormat::NiagaraPathExport => "network",
        DatasetFormat::BacnetExport => "bacnet",
        DatasetFormat::N2Export => "n2",
        DatasetFormat::Unknown => "data",
    }
}

fn canonical_probe(format: DatasetFormat) -> fn(&Value) -> bool {
    match format {
        DatasetFormat::PlatformDetails => platform::is_canonical,
        DatasetFormat::ResourceExport => resources::is_canonical,
        DatasetFormat::NiagaraNetExport | DatasetFormat::NiagaraPathExport => network::is_canonical,
        DatasetFormat::BacnetExport => bacnet::is_canonical,
        DatasetFormat::N2Export => n2::is_canonical,
        DatasetFormat::Unknown => |_| false,
    }
}

/// Normalize a loosely-typed JSON payload for one format
///
/// Never errors: missing optional data degrades to defaults plus warnings.
/// Path exports normalize into the NiagaraNetwork schema since they are an
/// older rendition of the same station listing.
pub fn normalize(format: DatasetFormat, input: &Value) -> (NormalizedData, Vec<String>) {
    let probed = probe_shape(input, section_key(format), canonical_probe(format));
    let mut warnings = Vec::new();
    if matches!(
        probed.kind,
        ShapeKind::MetadataNested | ShapeKind::NormalizedNested
    ) {
        warnings.push(format!(
            "{} payload found under a legacy nesting path",
            format
        ));
        debug!("Normalizing {} from {:?} shape", format, probed.kind);
    }

    let (normalized, mut conversion_warnings) = match format {
        DatasetFormat::PlatformDetails => {
            let (summary, warnings) = PlatformSummary::from_value(probed.payload);
            (NormalizedData::Platform(summary), warnings)
        }
        DatasetFormat::ResourceExport => {
            let (metrics, warnings) = ResourceMetrics::from_value(probed.payload);
            (NormalizedData::Resources(metrics), warnings)
        }
        DatasetFormat::NiagaraNetExport | DatasetFormat::NiagaraPathExport => {
            let (stations, warnings) = network::from_value(probed.payload);
            (NormalizedData::Network(stations), warnings)
        }
        DatasetFormat::BacnetExport => {
            let (devices, warnings) = bacnet::from_value(probed.payload);
            (NormalizedData::Bacnet(devices), warnings)
        }
        DatasetFormat::N2Export => {
            let (devices, warnings) = n2::from_value(probed.payload);
            (NormalizedData::N2(devices), warnings)
        }
        DatasetFormat::Unknown => (NormalizedData::Generic(probed.payload.clone()), Vec::new()),
    };

    warnings.append(&mut conversion_warnings);
    (normalized, warnings)
}

/// Normalize a freshly parsed dataset
///
/// This is the in-pipeline path: rows come straight from the export parser,
/// so no shape probing is needed.
pub fn normalize_dataset(dataset: &TridiumDataset) -> (NormalizedData, Vec<String>) {
    match dataset.format {
        DatasetFormat::PlatformDetails => {
            let (summary, warnings) = PlatformSummary::from_rows(&dataset.rows);
            (NormalizedData::Platform(summary), warnings)
        }
        DatasetFormat::ResourceExport => {
            let (metrics, warnings) = ResourceMetrics::from_rows(&dataset.rows);
            (NormalizedData::Resources(metrics), warnings)
        }
        DatasetFormat::NiagaraNetExport | DatasetFormat::NiagaraPathExport => {
            let (stations, warnings) = network::from_rows(&dataset.rows);
            (NormalizedData::Network(stations), warnings)
        }
        DatasetFormat::BacnetExport => {
            let (devices, warnings) = bacnet::from_rows(&dataset.rows);
            (NormalizedData::Bacnet(devices), warnings)
        }
        DatasetFormat::N2Export => {
            let (devices, warnings) = n2::from_rows(&dataset.rows);
            (NormalizedData::N2(devices), warnings)
        }
        DatasetFormat::Unknown => {
            let payload = serde_json::to_value(&dataset.rows).unwrap_or(Value::Null);
            (NormalizedData::Generic(payload), Vec::new())
        }
    }
}
