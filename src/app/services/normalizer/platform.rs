//! Canonical platform-details schema
//!
//! Platform reports are free text; the tokenizer flattens them into
//! `Name`/`Value` rows and this module shapes those rows into a summary:
//! daemon/OS/hardware facts plus the module, application, and license
//! lists. Key names vary across daemon versions, so lookups run over
//! alias lists.

use super::shapes::{number_alias, payload_rows, row_field, string_alias};
use crate::app::models::TridiumDataRow;
use crate::app::services::export_parser::ValueDecoder;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One installed software module
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformModule {
    pub name: String,
    pub vendor: String,
    pub version: String,
}

/// One station application installed on the platform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformApplication {
    pub name: String,
    pub autostart: bool,
    pub status: String,
}

/// One installed license
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformLicense {
    pub name: String,
    pub vendor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
}

/// Canonical platform summary for one controller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformSummary {
    /// Niagara daemon/runtime version
    #[serde(default)]
    pub daemon_version: String,

    /// Host hardware model (TITAN, EDGE10, ...)
    #[serde(default)]
    pub host_model: String,

    /// Marketing product name (JACE-8000, ...)
    #[serde(default)]
    pub product: String,

    /// CPU architecture
    #[serde(default)]
    pub architecture: String,

    /// CPU count
    pub cpu_count: u32,

    /// Operating system name
    #[serde(default)]
    pub os_name: String,

    /// Java VM name
    #[serde(default)]
    pub java_vm: String,

    /// Physical RAM figures, MB
    pub ram_free_mb: f64,
    pub ram_total_mb: f64,

    /// Filesystem figures, MB
    pub filesystem_free_mb: f64,
    pub filesystem_total_mb: f64,

    /// Platform TLS support enabled
    pub tls_support: bool,

    /// Installed module list
    pub modules: Vec<PlatformModule>,

    /// Installed station application list
    pub applications: Vec<PlatformApplication>,

    /// Installed license list
    pub licenses: Vec<PlatformLicense>,
}

/// Canonical probe: the idempotence fast path for platform summaries
pub fn is_canonical(value: &Value) -> bool {
    value.get("daemon_version").is_some() && value.get("modules").is_some()
}

impl PlatformSummary {
    /// Build a summary from tokenized report rows
    pub fn from_rows(rows: &[TridiumDataRow]) -> (Self, Vec<String>) {
        let decoder = ValueDecoder::new();
        let mut summary = PlatformSummary::default();
        let mut warnings = Vec::new();

        let memory_mb = |raw: &str| -> f64 {
            decoder.decode(raw).as_number().unwrap_or(0.0)
        };

        for row in rows {
            let Some(name) = row.get_non_empty("Name") else {
                continue;
            };
            let Some(value) = row.get_non_empty("Value") else {
                continue;
            };

            match name {
                "Daemon Version" | "daemonVersion" | "Niagara Runtime" => {
                    summary.daemon_version = value.to_string()
                }
                "Host Model" | "hostModel" => summary.host_model = value.to_string(),
                "Model" | "Product" => summary.product = value.to_string(),
                "Architecture" => summary.architecture = value.to_string(),
                "Number of CPUs" => {
                    summary.cpu_count = value.trim().parse().unwrap_or(0);
                }
                "Operating System" => summary.os_name = value.to_string(),
                "Java Virtual Machine" => summary.java_vm = value.to_string(),
                "Physical RAM Free" => summary.ram_free_mb = memory_mb(value),
                "Physical RAM Total" => summary.ram_total_mb = memory_mb(value),
                "Filesystem Free" => summary.filesystem_free_mb = memory_mb(value),
                "Filesystem Total" => summary.filesystem_total_mb = memory_mb(value),
                "Platform TLS Support" | "TLS Support" => {
                    let lowered = value.to_lowercase();
                    summary.tls_support = lowered.contains("enabled") || lowered == "true";
                }
                "Modules" => summary.modules = parse_modules(value),
                "Applications" => summary.applications = parse_applications(value),
                "Licenses" => summary.licenses = parse_licenses(value),
                _ => {}
            }
        }

        if summary.daemon_version.is_empty() && summary.host_model.is_empty() {
            warnings
                .push("Platform report carried neither a daemon version nor a host model".to_string());
        }

        (summary, warnings)
    }

    /// Build a summary from a legacy JSON payload
    pub fn from_value(payload: &Value) -> (Self, Vec<String>) {
        if is_canonical(payload) {
            if let Ok(canonical) = serde_json::from_value::<PlatformSummary>(payload.clone()) {
                return (canonical, Vec::new());
            }
        }

        if let Some(rows) = payload_rows(payload) {
            let rows: Vec<TridiumDataRow> = rows
                .iter()
                .map(|row| {
                    let mut cells = std::collections::HashMap::new();
                    if let Some(name) = row_field(row, &["Name", "name", "key"]) {
                        cells.insert("Name".to_string(), name);
                    }
                    if let Some(value) = row_field(row, &["Value", "value"]) {
                        cells.insert("Value".to_string(), value);
                    }
                    TridiumDataRow::new(cells)
                })
                .collect();
            let (summary, mut warnings) = Self::from_rows(&rows);
            warnings.push("Platform summary extracted from legacy row payload".to_string());
            return (summary, warnings);
        }

        let summary = PlatformSummary {
            daemon_version: string_alias(payload, &["daemon_version", "daemonVersion"])
                .unwrap_or_default(),
            host_model: string_alias(payload, &["host_model", "hostModel"]).unwrap_or_default(),
            product: string_alias(payload, &["product", "model"]).unwrap_or_default(),
            architecture: string_alias(payload, &["architecture", "arch"]).unwrap_or_default(),
            cpu_count: number_alias(payload, &["cpu_count", "cpuCount"]).unwrap_or(0.0) as u32,
            os_name: string_alias(payload, &["os_name", "osName", "operatingSystem"])
                .unwrap_or_default(),
            java_vm: string_alias(payload, &["java_vm", "javaVm"]).unwrap_or_default(),
            ram_free_mb: number_alias(payload, &["ram_free_mb", "ramFree"]).unwrap_or(0.0),
            ram_total_mb: number_alias(payload, &["ram_total_mb", "ramTotal"]).unwrap_or(0.0),
            filesystem_free_mb: number_alias(payload, &["filesystem_free_mb", "diskFree"])
                .unwrap_or(0.0),
            filesystem_total_mb: number_alias(payload, &["filesystem_total_mb", "diskTotal"])
                .unwrap_or(0.0),
            tls_support: payload
                .get("tls_support")
                .or_else(|| payload.get("tlsSupport"))
                .and_then(Value::as_bool)
                .unwrap_or(false),
            modules: Vec::new(),
            applications: Vec::new(),
            licenses: Vec::new(),
        };

        let mut warnings = Vec::new();
        if summary == PlatformSummary::default() {
            warnings.push("Legacy platform payload carried no recognized fields".to_string());
        }
        (summary, warnings)
    }
}

/// Module entries look like `alarm (Tridium 4.10.0.154)`
fn parse_modules(joined: &str) -> Vec<PlatformModule> {
    let entry_re = Regex::new(r"^(\S+)\s*\((\S+)\s+([\w.\-]+)\)$").unwrap();
    joined
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry_re.captures(entry) {
            Some(captures) => PlatformModule {
                name: captures[1].to_string(),
                vendor: captures[2].to_string(),
                version: captures[3].to_string(),
            },
            None => PlatformModule {
                name: entry.to_string(),
                ..Default::default()
            },
        })
        .collect()
}

/// Application entries look like `station SH_East autostart=true status=Running`
fn parse_applications(joined: &str) -> Vec<PlatformApplication> {
    joined
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut application = PlatformApplication::default();
            for token in entry.split_whitespace() {
                if let Some(value) = token.strip_prefix("autostart=") {
                    application.autostart = value.eq_ignore_ascii_case("true");
                } else if let Some(value) = token.strip_prefix("status=") {
                    application.status = value.to_string();
                } else if token != "station" {
                    application.name = token.to_string();
                }
            }
            application
        })
        .collect()
}

/// License entries look like `Tridium.license (Tridium expires 2026-01-01)`
fn parse_licenses(joined: &str) -> Vec<PlatformLicense> {
    let entry_re = Regex::new(r"^(\S+)\s*\((\S+)(?:.*?expires\s+([\w\-]+))?\)$").unwrap();
    joined
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry_re.captures(entry) {
            Some(captures) => PlatformLicense {
                name: captures[1].to_string(),
                vendor: captures[2].to_string(),
                expires: captures.get(3).map(|m| m.as_str().to_string()),
            },
            None => PlatformLicense {
                name: entry.to_string(),
                ..Default::default()
            },
        })
        .collect()
}
