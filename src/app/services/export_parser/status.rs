//! Compound status token decoding
//!
//! Niagara exports report status as a brace-delimited, comma-joined flag
//! set (`{down,alarm,unackedAlarm}`), a bare word (`ok`), or free text.
//! The canonical status is resolved by priority (fault > down > alarm >
//! ok); the detail phrases keep flag-presence order, which is the order an
//! operator reads off the export.

use crate::app::models::{DeviceStatus, ParsedStatus};
use crate::constants::{status_flags, status_phrases};

/// Decode a raw status cell into a canonical status
pub fn decode_status(raw: &str) -> ParsedStatus {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(trimmed);

    let tokens: Vec<String> = inner
        .split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect();

    let mut has_ok = false;
    let mut has_down = false;
    let mut has_alarm = false;
    let mut has_fault = false;
    let mut details: Vec<String> = Vec::new();

    for token in &tokens {
        let phrase = match token.as_str() {
            status_flags::FAULT => {
                has_fault = true;
                Some(status_phrases::FAULT)
            }
            status_flags::DOWN => {
                has_down = true;
                Some(status_phrases::DOWN)
            }
            status_flags::ALARM => {
                has_alarm = true;
                Some(status_phrases::ALARM)
            }
            status_flags::UNACKED_ALARM => {
                has_alarm = true;
                Some(status_phrases::UNACKED_ALARM)
            }
            status_flags::OK => {
                has_ok = true;
                None
            }
            _ => None,
        };

        if let Some(phrase) = phrase {
            if !details.iter().any(|existing| existing == phrase) {
                details.push(phrase.to_string());
            }
        }
    }

    // Priority resolution: fault > down > alarm > ok
    let status = if has_fault {
        DeviceStatus::Fault
    } else if has_down {
        DeviceStatus::Down
    } else if has_alarm {
        DeviceStatus::Alarm
    } else if has_ok {
        DeviceStatus::Ok
    } else {
        return ParsedStatus::unknown(raw);
    };

    ParsedStatus::new(status, details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{BadgeVariant, Severity};

    #[test]
    fn test_bare_ok() {
        let status = decode_status("ok");
        assert_eq!(status.status, DeviceStatus::Ok);
        assert_eq!(status.severity, Severity::Normal);
        assert!(status.details.is_empty());
        assert_eq!(status.badge_text, "OK");
    }

    #[test]
    fn test_braced_single_flag() {
        let status = decode_status("{down}");
        assert_eq!(status.status, DeviceStatus::Down);
        assert_eq!(status.severity, Severity::Critical);
        assert_eq!(status.details, vec!["Device offline"]);
        assert_eq!(status.badge_variant, BadgeVariant::Destructive);
    }

    #[test]
    fn test_priority_down_over_alarm() {
        let status = decode_status("{down,alarm,unackedAlarm}");
        assert_eq!(status.status, DeviceStatus::Down);
        assert_eq!(status.severity, Severity::Critical);
        // Details keep presence order, not priority order
        assert_eq!(
            status.details,
            vec!["Device offline", "Alarm active", "Unacknowledged alarm"]
        );
    }

    #[test]
    fn test_priority_fault_wins() {
        let status = decode_status("{alarm,down,fault}");
        assert_eq!(status.status, DeviceStatus::Fault);
        assert_eq!(status.severity, Severity::Critical);
        assert_eq!(
            status.details,
            vec!["Alarm active", "Device offline", "Fault detected"]
        );
    }

    #[test]
    fn test_alarm_only_is_warning() {
        let status = decode_status("{unackedAlarm}");
        assert_eq!(status.status, DeviceStatus::Alarm);
        assert_eq!(status.severity, Severity::Warning);
        assert_eq!(status.details, vec!["Unacknowledged alarm"]);
    }

    #[test]
    fn test_ok_flag_beaten_by_alarm() {
        let status = decode_status("{ok,alarm}");
        assert_eq!(status.status, DeviceStatus::Alarm);
    }

    #[test]
    fn test_case_insensitive_tokens() {
        let status = decode_status("{DOWN,UnackedAlarm}");
        assert_eq!(status.status, DeviceStatus::Down);
    }

    #[test]
    fn test_unrecognized_keeps_raw_badge() {
        let status = decode_status("{stale}");
        assert_eq!(status.status, DeviceStatus::Unknown);
        assert_eq!(status.badge_text, "{stale}");
        assert!(status.details.is_empty());
    }

    #[test]
    fn test_empty_input_unknown_badge() {
        let status = decode_status("");
        assert_eq!(status.status, DeviceStatus::Unknown);
        assert_eq!(status.badge_text, "UNKNOWN");

        let status = decode_status("   ");
        assert_eq!(status.badge_text, "UNKNOWN");
    }

    #[test]
    fn test_duplicate_flags_deduplicated() {
        let status = decode_status("{alarm,alarm,down}");
        assert_eq!(status.details, vec!["Alarm active", "Device offline"]);
    }
}
