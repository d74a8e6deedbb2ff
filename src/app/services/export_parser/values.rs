//! Unit-suffixed and compound value decoding
//!
//! Resource exports carry values in a dozen loosely-specified literal
//! shapes: percentages, memory with mixed units, counts with embedded
//! limits, durations, legacy timestamps, bare numbers, IP addresses and
//! dotted versions. Decoding is an ordered cascade of recognizers; the
//! first match wins. All regexes are compiled once per decoder.

use crate::app::models::{ParsedValue, ValueContent, ValueKind, ValueMetadata};
use crate::constants::{
    memory_units, EXPORT_TIMESTAMP_FORMATS, KRU_UNIT, MEMORY_UNIT_MB, PERCENT_UNIT,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

/// Value decoder with pre-compiled recognizer patterns
#[derive(Debug)]
pub struct ValueDecoder {
    percentage_re: Regex,
    memory_re: Regex,
    limit_re: Regex,
    of_re: Regex,
    kru_re: Regex,
    duration_re: Regex,
    legacy_date_re: Regex,
    iso_date_re: Regex,
    number_re: Regex,
    ip_re: Regex,
    version_re: Regex,
}

impl ValueDecoder {
    /// Compile the recognizer patterns
    pub fn new() -> Self {
        Self {
            percentage_re: Regex::new(r"^([\d,]+(?:\.\d+)?)\s*%$").unwrap(),
            memory_re: Regex::new(r"(?i)^([\d,]+(?:\.\d+)?)\s*(bytes|b|kb|mb|gb)$").unwrap(),
            limit_re: Regex::new(r"(?i)^([\d,]+(?:\.\d+)?)\s*\(\s*limit:\s*([\d,]+(?:\.\d+)?)\s*\)$")
                .unwrap(),
            of_re: Regex::new(r"(?i)^([\d,]+(?:\.\d+)?)\s+of\s+([\d,]+(?:\.\d+)?)$").unwrap(),
            kru_re: Regex::new(r"(?i)^([\d,]+(?:\.\d+)?)\s*kru$").unwrap(),
            duration_re: Regex::new(
                r"(?i)^\d+\s*(?:day|hour|minute|second)s?(?:\s*,\s*\d+\s*(?:day|hour|minute|second)s?)*$",
            )
            .unwrap(),
            legacy_date_re: Regex::new(r"^\d{1,2}-[A-Za-z]{3}-\d{2}\b").unwrap(),
            iso_date_re: Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap(),
            number_re: Regex::new(r"^-?[\d,]+(?:\.\d+)?$").unwrap(),
            ip_re: Regex::new(r"^\d{1,3}(?:\.\d{1,3}){3}$").unwrap(),
            version_re: Regex::new(r"^\d+(?:\.\d+){2,}$").unwrap(),
        }
    }

    /// Decode one raw cell through the recognizer cascade
    pub fn decode(&self, raw: &str) -> ParsedValue {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return ParsedValue::text(trimmed);
        }

        self.decode_percentage(trimmed)
            .or_else(|| self.decode_memory(trimmed))
            .or_else(|| self.decode_count_with_limit(trimmed))
            .or_else(|| self.decode_kru(trimmed))
            .or_else(|| self.decode_duration(trimmed))
            .or_else(|| self.decode_timestamp(trimmed))
            .or_else(|| self.decode_bare_number(trimmed))
            .or_else(|| self.decode_literal_text(trimmed))
            .unwrap_or_else(|| ParsedValue::text(trimmed))
    }

    fn decode_percentage(&self, raw: &str) -> Option<ParsedValue> {
        let captures = self.percentage_re.captures(raw)?;
        let value = parse_number(&captures[1])?;
        Some(ParsedValue {
            value: ValueContent::Number(value),
            unit: Some(PERCENT_UNIT.to_string()),
            kind: ValueKind::Percentage,
            formatted: raw.to_string(),
            metadata: None,
        })
    }

    /// Memory values normalize to MB regardless of the source unit
    fn decode_memory(&self, raw: &str) -> Option<ParsedValue> {
        let captures = self.memory_re.captures(raw)?;
        let value = parse_number(&captures[1])?;
        let megabytes = match captures[2].to_lowercase().as_str() {
            "kb" => value / memory_units::KB_PER_MB,
            "mb" => value,
            "gb" => value * memory_units::MB_PER_GB,
            // bytes and the bare "b" suffix
            _ => value / memory_units::BYTES_PER_MB,
        };
        Some(ParsedValue {
            value: ValueContent::Number(megabytes),
            unit: Some(MEMORY_UNIT_MB.to_string()),
            kind: ValueKind::Memory,
            formatted: raw.to_string(),
            metadata: None,
        })
    }

    /// `N (Limit: M)` and `N of M` forms carry a capacity limit
    fn decode_count_with_limit(&self, raw: &str) -> Option<ParsedValue> {
        let captures = self
            .limit_re
            .captures(raw)
            .or_else(|| self.of_re.captures(raw))?;
        let value = parse_number(&captures[1])?;
        let limit = parse_number(&captures[2])?;

        // A zero limit yields no derived percentage
        let percentage = (limit > 0.0).then(|| (value / limit) * 100.0);

        Some(ParsedValue {
            value: ValueContent::Number(value),
            unit: None,
            kind: ValueKind::Count,
            formatted: raw.to_string(),
            metadata: Some(ValueMetadata {
                limit: Some(limit),
                percentage,
                ..Default::default()
            }),
        })
    }

    /// Niagara licensing capacity ("21.5 kRU")
    fn decode_kru(&self, raw: &str) -> Option<ParsedValue> {
        let captures = self.kru_re.captures(raw)?;
        let value = parse_number(&captures[1])?;
        Some(ParsedValue {
            value: ValueContent::Number(value),
            unit: Some(KRU_UNIT.to_string()),
            kind: ValueKind::Count,
            formatted: raw.to_string(),
            metadata: None,
        })
    }

    /// Durations keep their original string; no common-unit reduction
    fn decode_duration(&self, raw: &str) -> Option<ParsedValue> {
        if !self.duration_re.is_match(raw) {
            return None;
        }
        Some(ParsedValue {
            value: ValueContent::Text(raw.to_string()),
            unit: None,
            kind: ValueKind::Duration,
            formatted: raw.to_string(),
            metadata: None,
        })
    }

    /// Date-like tokens parse to a UTC ISO instant when valid, otherwise
    /// stay in their original form
    fn decode_timestamp(&self, raw: &str) -> Option<ParsedValue> {
        if !self.legacy_date_re.is_match(raw) && !self.iso_date_re.is_match(raw) {
            return None;
        }

        let instant = parse_export_timestamp(raw);
        let value = match instant {
            Some(instant) => ValueContent::Text(instant.to_rfc3339()),
            None => ValueContent::Text(raw.to_string()),
        };

        Some(ParsedValue {
            value,
            unit: None,
            kind: ValueKind::Timestamp,
            formatted: raw.to_string(),
            metadata: None,
        })
    }

    fn decode_bare_number(&self, raw: &str) -> Option<ParsedValue> {
        if !self.number_re.is_match(raw) {
            return None;
        }
        let value = parse_number(raw)?;
        Some(ParsedValue {
            value: ValueContent::Number(value),
            unit: None,
            kind: ValueKind::Count,
            formatted: raw.to_string(),
            metadata: None,
        })
    }

    /// IP addresses and dotted versions stay text with a metadata flag so
    /// callers can special-case them without losing the literal form
    fn decode_literal_text(&self, raw: &str) -> Option<ParsedValue> {
        let metadata = if self.ip_re.is_match(raw) {
            ValueMetadata {
                is_ip_address: true,
                ..Default::default()
            }
        } else if self.version_re.is_match(raw) {
            ValueMetadata {
                is_version: true,
                ..Default::default()
            }
        } else {
            return None;
        };

        Some(ParsedValue {
            value: ValueContent::Text(raw.to_string()),
            unit: None,
            kind: ValueKind::Text,
            formatted: raw.to_string(),
            metadata: Some(metadata),
        })
    }
}

impl Default for ValueDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a numeric token, tolerating thousands separators
fn parse_number(token: &str) -> Option<f64> {
    token.replace(',', "").parse().ok()
}

/// Parse an export timestamp using the known legacy formats, then ISO
fn parse_export_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    for format in EXPORT_TIMESTAMP_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime.and_utc());
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
