//! Canonical resource-export schema
//!
//! A resource export is a flat `Name`/`Value` metric dump: CPU, heap and
//! physical memory, licensed capacities, engine scan/queue gauges, kRU
//! licensing, and uptime. Metric names drifted across Niagara releases, so
//! extraction runs over alias lists and tolerates every gap.

use super::shapes::{number_alias, payload_rows, row_field, string_alias};
use crate::app::models::{TridiumDataRow, ValueKind};
use crate::app::services::export_parser::ValueDecoder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One licensed capacity gauge (points, devices, histories, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapacityGauge {
    /// Gauge name with the `capacity.` prefix stripped
    pub name: String,

    /// Current count
    pub value: f64,

    /// Licensed limit, when declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<f64>,

    /// Derived utilization percentage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

/// Engine scan and queue gauges
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineMetrics {
    pub scan_lifetime_ms: f64,
    pub scan_recent_ms: f64,
    pub scan_peak_ms: f64,
    pub queue_actions: f64,
    pub queue_timers: f64,
}

/// Canonical resource metrics for one station
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceMetrics {
    /// CPU utilization percentage
    pub cpu_usage_percent: f64,

    /// Heap figures, MB
    pub heap_used_mb: f64,
    pub heap_max_mb: f64,
    pub heap_free_mb: f64,

    /// Physical memory figures, MB
    pub memory_used_mb: f64,
    pub memory_total_mb: f64,

    /// Open file descriptors
    pub open_file_descriptors: f64,

    /// Licensed capacity gauges
    pub capacities: Vec<CapacityGauge>,

    /// Engine scan/queue gauges
    pub engine: EngineMetrics,

    /// kRU licensing: licensed total and currently used
    pub kru_licensed: f64,
    pub kru_used: f64,

    /// Station uptime in its original literal form
    #[serde(default)]
    pub uptime: String,

    /// Boot instant, when the export carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boot_time: Option<String>,
}

/// Canonical probe: the idempotence fast path for resource metrics
pub fn is_canonical(value: &Value) -> bool {
    value.get("cpu_usage_percent").is_some() && value.get("capacities").is_some()
}

impl ResourceMetrics {
    /// Build metrics from parsed dataset rows
    pub fn from_rows(rows: &[TridiumDataRow]) -> (Self, Vec<String>) {
        let decoder = ValueDecoder::new();
        let mut metrics = ResourceMetrics::default();
        let mut warnings = Vec::new();
        let mut matched = 0usize;

        for row in rows {
            let Some(name) = row.get_non_empty("Name") else {
                continue;
            };
            let Some(raw) = row.get_non_empty("Value") else {
                continue;
            };
            let parsed = row
                .parsed_value("Value")
                .cloned()
                .unwrap_or_else(|| decoder.decode(raw));
            let number = parsed.as_number().unwrap_or(0.0);

            match name {
                "cpu.usage" | "cpu.usage.overall" => metrics.cpu_usage_percent = number,
                "heap.used" | "mem.heap.used" => metrics.heap_used_mb = number,
                "heap.max" | "mem.heap.max" => metrics.heap_max_mb = number,
                "heap.free" | "mem.heap.free" => metrics.heap_free_mb = number,
                "mem.used" | "mem.physical.used" => metrics.memory_used_mb = number,
                "mem.total" | "mem.physical" | "mem.physical.total" => {
                    metrics.memory_total_mb = number
                }
                "fd.open" | "openFileDescriptors" => metrics.open_file_descriptors = number,
                "engine.scan.lifetime" => metrics.engine.scan_lifetime_ms = scan_ms(raw, number),
                "engine.scan.recent" => metrics.engine.scan_recent_ms = scan_ms(raw, number),
                "engine.scan.peak" => metrics.engine.scan_peak_ms = scan_ms(raw, number),
                "engine.queue.actions" => metrics.engine.queue_actions = number,
                "time.uptime" => metrics.uptime = parsed.formatted.clone(),
                "time.start" | "time.boot" => {
                    metrics.boot_time = Some(match parsed.kind {
                        ValueKind::Timestamp => parsed
                            .value
                            .as_text()
                            .unwrap_or(&parsed.formatted)
                            .to_string(),
                        _ => parsed.formatted.clone(),
                    })
                }
                "globalCapacity.licensed" | "resources.limit" => metrics.kru_licensed = number,
                "globalCapacity.used" | "resources.total" | "kru.used" => {
                    metrics.kru_used = number
                }
                other => {
                    if let Some(gauge_name) = other.strip_prefix("capacity.") {
                        let metadata = parsed.metadata.clone().unwrap_or_default();
                        metrics.capacities.push(CapacityGauge {
                            name: gauge_name.to_string(),
                            value: number,
                            limit: metadata.limit,
                            percentage: metadata.percentage,
                        });
                    } else if let Some(timer_queue) = other.strip_prefix("engine.queue.") {
                        if timer_queue.to_lowercase().ends_with("timers") {
                            metrics.engine.queue_timers += number;
                        }
                    } else {
                        // Unrecognized metric names are skipped, not errors
                        continue;
                    }
                }
            }
            matched += 1;
        }

        if matched == 0 && !rows.is_empty() {
            warnings.push("Resource export contained no recognized metric names".to_string());
        }

        (metrics, warnings)
    }

    /// Build metrics from a legacy JSON payload
    ///
    /// Accepts a dataset-shaped payload (routed through [`from_rows`]
    /// semantics via raw cells), a canonical document, or a flat legacy
    /// field map. Absent numerics default to 0, absent lists to empty.
    ///
    /// [`from_rows`]: ResourceMetrics::from_rows
    pub fn from_value(payload: &Value) -> (Self, Vec<String>) {
        if let Ok(canonical) = serde_json::from_value::<ResourceMetrics>(payload.clone()) {
            if is_canonical(payload) {
                return (canonical, Vec::new());
            }
        }

        if let Some(rows) = payload_rows(payload) {
            let rows: Vec<TridiumDataRow> = rows.iter().map(row_from_value).collect();
            let (metrics, mut warnings) = Self::from_rows(&rows);
            warnings.push("Resource metrics extracted from legacy row payload".to_string());
            return (metrics, warnings);
        }

        let mut warnings = Vec::new();
        let metrics = ResourceMetrics {
            cpu_usage_percent: number_alias(payload, &["cpu_usage_percent", "cpuUsage", "cpu"])
                .unwrap_or(0.0),
            heap_used_mb: number_alias(payload, &["heap_used_mb", "heapUsed"]).unwrap_or(0.0),
            heap_max_mb: number_alias(payload, &["heap_max_mb", "heapMax"]).unwrap_or(0.0),
            heap_free_mb: number_alias(payload, &["heap_free_mb", "heapFree"]).unwrap_or(0.0),
            memory_used_mb: number_alias(payload, &["memory_used_mb", "memoryUsed"])
                .unwrap_or(0.0),
            memory_total_mb: number_alias(payload, &["memory_total_mb", "memoryTotal"])
                .unwrap_or(0.0),
            open_file_descriptors: number_alias(
                payload,
                &["open_file_descriptors", "openFileDescriptors"],
            )
            .unwrap_or(0.0),
            capacities: legacy_capacities(payload),
            engine: EngineMetrics {
                scan_lifetime_ms: number_alias(payload, &["scan_lifetime_ms", "scanLifetime"])
                    .unwrap_or(0.0),
                scan_recent_ms: number_alias(payload, &["scan_recent_ms", "scanRecent"])
                    .unwrap_or(0.0),
                scan_peak_ms: number_alias(payload, &["scan_peak_ms", "scanPeak"]).unwrap_or(0.0),
                queue_actions: number_alias(payload, &["queue_actions", "queueActions"])
                    .unwrap_or(0.0),
                queue_timers: number_alias(payload, &["queue_timers", "queueTimers"])
                    .unwrap_or(0.0),
            },
            kru_licensed: number_alias(payload, &["kru_licensed", "kruLicensed", "licensedKru"])
                .unwrap_or(0.0),
            kru_used: number_alias(payload, &["kru_used", "kruUsed"]).unwrap_or(0.0),
            uptime: string_alias(payload, &["uptime"]).unwrap_or_default(),
            boot_time: string_alias(payload, &["boot_time", "bootTime"]),
        };

        if metrics == ResourceMetrics::default() {
            warnings.push("Legacy resource payload carried no recognized fields".to_string());
        }

        (metrics, warnings)
    }
}

/// Engine scan cells are either bare millisecond numbers or "N ms" text
fn scan_ms(raw: &str, number: f64) -> f64 {
    if number != 0.0 {
        return number;
    }
    raw.trim()
        .strip_suffix("ms")
        .and_then(|n| n.trim().replace(',', "").parse().ok())
        .unwrap_or(0.0)
}

fn legacy_capacities(payload: &Value) -> Vec<CapacityGauge> {
    payload
        .get("capacities")
        .and_then(Value::as_array)
        .map(|gauges| {
            gauges
                .iter()
                .filter_map(|gauge| {
                    let name = string_alias(gauge, &["name"])?;
                    Some(CapacityGauge {
                        name,
                        value: number_alias(gauge, &["value", "count"]).unwrap_or(0.0),
                        limit: number_alias(gauge, &["limit"]),
                        percentage: number_alias(gauge, &["percentage", "percent"]),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn row_from_value(row: &Value) -> TridiumDataRow {
    let mut cells = std::collections::HashMap::new();
    if let Some(name) = row_field(row, &["Name", "name"]) {
        cells.insert("Name".to_string(), name);
    }
    if let Some(value) = row_field(row, &["Value", "value"]) {
        cells.insert("Value".to_string(), value);
    }
    TridiumDataRow::new(cells)
}
