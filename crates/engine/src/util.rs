//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use chrono::{NaiveDate, NaiveTime};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::Invalid(format!("invalid {label} id")))
}

/// Trim and NFC-normalize user supplied text.
pub(crate) fn normalize_text(value: &str) -> String {
    value.trim().nfc().collect()
}

/// Normalize a required text field and enforce a minimum length in
/// characters.
pub(crate) fn normalize_required_text(
    value: &str,
    label: &str,
    min_chars: usize,
) -> ResultEngine<String> {
    let normalized = normalize_text(value);
    if normalized.is_empty() {
        return Err(EngineError::Invalid(format!("{label} must not be empty")));
    }
    if normalized.chars().count() < min_chars {
        return Err(EngineError::Invalid(format!("{label} is too short")));
    }
    Ok(normalized)
}

/// Case-folded form used for title search. Lowercasing happens here rather
/// than in SQL, where `lower()` only folds ASCII.
pub(crate) fn search_key(value: &str) -> String {
    normalize_text(value).to_lowercase()
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value.map(normalize_text).filter(|s| !s.is_empty())
}

/// Escape `LIKE` wildcards so user input matches literally (escape char `\`).
pub(crate) fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Parse a meeting date (`YYYY-MM-DD`) and return it in canonical form.
pub(crate) fn parse_meeting_date(value: &str) -> ResultEngine<String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|_| EngineError::Invalid(format!("invalid meeting date: {value}")))
}

/// Parse a meeting time (`HH:MM` or `HH:MM:SS`) and return it as `HH:MM`.
pub(crate) fn parse_meeting_time(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map(|time| time.format("%H:%M").to_string())
        .map_err(|_| EngineError::Invalid(format!("invalid meeting time: {value}")))
}

/// Loose e-mail shape check: one `@`, non-empty local part, dotted domain.
pub(crate) fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !value.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_key_folds_non_ascii() {
        assert_eq!(search_key("  Ärmel JACKET "), "ärmel jacket");
        assert_eq!(search_key("A\u{308}rmel"), "ärmel");
    }

    #[test]
    fn required_text_counts_characters_not_bytes() {
        assert_eq!(
            normalize_required_text("  caffè ", "title", 5).unwrap(),
            "caffè"
        );
        assert!(normalize_required_text("càfé", "title", 5).is_err());
        assert!(normalize_required_text("   ", "title", 1).is_err());
    }

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn meeting_time_accepts_minutes_and_seconds() {
        assert_eq!(parse_meeting_time("09:30").unwrap(), "09:30");
        assert_eq!(parse_meeting_time("17:05:59").unwrap(), "17:05");
        assert!(parse_meeting_time("25:00").is_err());
        assert!(parse_meeting_date("2026-02-30").is_err());
        assert_eq!(parse_meeting_date("2026-11-02").unwrap(), "2026-11-02");
    }

    #[test]
    fn email_shape() {
        assert!(looks_like_email("ada@example.com"));
        assert!(!looks_like_email("ada@example"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("a da@example.com"));
        assert!(!looks_like_email("a@b@c.com"));
    }
}
