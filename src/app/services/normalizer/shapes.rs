//! Legacy input shape probing
//!
//! Datasets reach normalization through several historical producers, each
//! wrapping the payload differently. Instead of optional-chaining guesses,
//! every accepted shape is an explicit variant matched in a fixed order,
//! so the set of tolerated legacy layouts stays enumerable and testable.

use serde_json::Value;
use tracing::debug;

/// Where the payload was found in the input document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// Input is already the canonical schema
    Canonical,

    /// Payload nested under `metadata.normalizedData.<section>`
    MetadataNested,

    /// Payload nested under `normalizedData.<section>`
    NormalizedNested,

    /// Payload at `<section>` or the input itself
    Flat,
}

/// Probed payload plus the shape it was found in
#[derive(Debug, Clone, Copy)]
pub struct ProbedShape<'a> {
    pub kind: ShapeKind,
    pub payload: &'a Value,
}

/// Probe an input document for the payload of one schema section
///
/// Shapes are tried in a deterministic order: canonical first (the
/// idempotence fast path), then the known legacy nesting paths from oldest
/// producers inward, finally the input itself.
pub fn probe_shape<'a>(
    input: &'a Value,
    section: &str,
    is_canonical: fn(&Value) -> bool,
) -> ProbedShape<'a> {
    if is_canonical(input) {
        return ProbedShape {
            kind: ShapeKind::Canonical,
            payload: input,
        };
    }

    if let Some(payload) = input
        .get("metadata")
        .and_then(|m| m.get("normalizedData"))
        .and_then(|n| n.get(section))
    {
        debug!("Input matched legacy metadata.normalizedData.{} shape", section);
        return ProbedShape {
            kind: ShapeKind::MetadataNested,
            payload,
        };
    }

    if let Some(payload) = input.get("normalizedData").and_then(|n| n.get(section)) {
        debug!("Input matched legacy normalizedData.{} shape", section);
        return ProbedShape {
            kind: ShapeKind::NormalizedNested,
            payload,
        };
    }

    if let Some(payload) = input.get(section) {
        return ProbedShape {
            kind: ShapeKind::Flat,
            payload,
        };
    }

    ProbedShape {
        kind: ShapeKind::Flat,
        payload: input,
    }
}

/// String field lookup across a list of historical aliases, first hit wins
pub fn string_alias(value: &Value, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|alias| {
        value
            .get(alias)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Numeric field lookup across aliases; string-encoded numbers count
pub fn number_alias(value: &Value, aliases: &[&str]) -> Option<f64> {
    aliases.iter().find_map(|alias| {
        let field = value.get(alias)?;
        field
            .as_f64()
            .or_else(|| field.as_str().and_then(|s| s.trim().replace(',', "").parse().ok()))
    })
}

/// Row list from a payload that is either a bare array or a dataset-shaped
/// object carrying a `rows` array
pub fn payload_rows(payload: &Value) -> Option<&Vec<Value>> {
    payload
        .as_array()
        .or_else(|| payload.get("rows").and_then(Value::as_array))
}

/// Cell lookup on a row that may be a serialized `TridiumDataRow` (cells
/// nested under `cells`) or a flat legacy field map
pub fn row_field(row: &Value, aliases: &[&str]) -> Option<String> {
    let cells = row.get("cells").unwrap_or(row);
    aliases.iter().find_map(|alias| {
        let field = cells.get(alias)?;
        match field {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    })
}
