//! Semantic column classification by name heuristics
//!
//! Column semantics are inferred from names, not declared by the exports,
//! so classification is an ordered rule table evaluated top to bottom on
//! the lowercased name. First matching rule wins; adding a format means
//! adding rules, not control flow.

use serde::{Deserialize, Serialize};

/// Semantic type assigned to a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Compound status token column, run through the status decoder
    Status,

    /// Metric value column, run through the value decoder
    Value,

    /// Date-bearing column, run through the timestamp recognizer
    Date,

    /// Numeric identifier or counter column
    Number,

    /// Anything else: free text preserved as-is
    Text,
}

type Predicate = fn(&str) -> bool;

/// Ordered classification rules, most specific first
///
/// Evaluated on the lowercased, trimmed column name. Version columns stay
/// text despite looking numeric so dotted strings keep their literal form.
const RULES: &[(Predicate, ColumnKind)] = &[
    (is_status_name, ColumnKind::Status),
    (is_date_name, ColumnKind::Date),
    (is_version_name, ColumnKind::Text),
    (is_value_name, ColumnKind::Value),
    (is_number_name, ColumnKind::Number),
];

fn is_status_name(name: &str) -> bool {
    name.contains("status") || name.contains("health") || name.ends_with("conn")
}

fn is_date_name(name: &str) -> bool {
    name.contains("time")
        || name.contains("date")
        || name.contains("modified")
        || name.contains("expiry")
        || name.contains("expires")
}

fn is_version_name(name: &str) -> bool {
    name.contains("version") || name.contains("firmware") || name.contains("rev")
}

fn is_value_name(name: &str) -> bool {
    name == "value"
}

fn is_number_name(name: &str) -> bool {
    name.ends_with(" id")
        || name == "id"
        || name.contains("count")
        || name.contains("netwk")
        || name.contains("apdu")
        || name.contains("subscriptions")
}

/// Classify one column name
pub fn classify_column(name: &str) -> ColumnKind {
    let lowered = name.trim().to_lowercase();
    RULES
        .iter()
        .find(|(predicate, _)| predicate(&lowered))
        .map(|(_, kind)| *kind)
        .unwrap_or(ColumnKind::Text)
}

/// Classify every column of a header, preserving order
pub fn classify_columns(columns: &[String]) -> Vec<(String, ColumnKind)> {
    columns
        .iter()
        .map(|name| (name.clone(), classify_column(name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_columns() {
        assert_eq!(classify_column("Status"), ColumnKind::Status);
        assert_eq!(classify_column("Platform Status"), ColumnKind::Status);
        assert_eq!(classify_column("Health"), ColumnKind::Status);
        assert_eq!(classify_column("Client Conn"), ColumnKind::Status);
        assert_eq!(classify_column("Server Conn"), ColumnKind::Status);
    }

    #[test]
    fn test_date_columns() {
        assert_eq!(classify_column("Modified Time"), ColumnKind::Date);
        assert_eq!(classify_column("Expiry Date"), ColumnKind::Date);
        assert_eq!(classify_column("Last Modified"), ColumnKind::Date);
    }

    #[test]
    fn test_version_columns_stay_text() {
        assert_eq!(classify_column("Version"), ColumnKind::Text);
        assert_eq!(classify_column("Firmware Rev"), ColumnKind::Text);
        assert_eq!(classify_column("App SW Version"), ColumnKind::Text);
    }

    #[test]
    fn test_value_and_number_columns() {
        assert_eq!(classify_column("Value"), ColumnKind::Value);
        assert_eq!(classify_column("Device ID"), ColumnKind::Number);
        assert_eq!(classify_column("Netwk"), ColumnKind::Number);
        assert_eq!(classify_column("Max APDU"), ColumnKind::Number);
        assert_eq!(classify_column("Cov Subscriptions"), ColumnKind::Number);
    }

    #[test]
    fn test_default_is_text() {
        assert_eq!(classify_column("Name"), ColumnKind::Text);
        assert_eq!(classify_column("Vendor"), ColumnKind::Text);
        assert_eq!(classify_column("Controller Type"), ColumnKind::Text);
    }

    #[test]
    fn test_rule_order_status_beats_date() {
        // "Platform Status Time"-style names resolve by rule order
        assert_eq!(classify_column("status time"), ColumnKind::Status);
    }

    #[test]
    fn test_classify_columns_preserves_order() {
        let header = vec!["Name".to_string(), "Status".to_string(), "Value".to_string()];
        let classified = classify_columns(&header);
        assert_eq!(classified[0], ("Name".to_string(), ColumnKind::Text));
        assert_eq!(classified[1], ("Status".to_string(), ColumnKind::Status));
        assert_eq!(classified[2], ("Value".to_string(), ColumnKind::Value));
    }
}
