//! Per-field value cleaning applied between extraction and assembly.
//!
//! Cleaning is a local recovery step: a captured value that fails its shape
//! check is dropped silently, never propagated as an error.

use super::patterns::{DATE_SEPARATORS, TRAILING_PUNCT};
use super::rules::ValueKind;
use crate::models::CleanerConfig;

/// Clean one captured value according to its shape tag. Returns None when
/// the value must be dropped (empty after cleaning, wrong identifier length,
/// invalid date shape).
pub fn clean_value(
    field: &str,
    kind: &ValueKind,
    raw: &str,
    config: &CleanerConfig,
) -> Option<String> {
    let collapsed = collapse_whitespace(raw);
    if collapsed.is_empty() {
        return None;
    }

    match kind {
        ValueKind::Text => Some(collapsed),
        ValueKind::Name => {
            let stripped = TRAILING_PUNCT.replace(&collapsed, "").into_owned();
            (!stripped.is_empty()).then_some(stripped)
        }
        ValueKind::Date => normalize_date(&collapsed),
        ValueKind::Identifier { allowed_lengths } => {
            allowed_lengths.contains(&collapsed.chars().count()).then_some(collapsed)
        }
        ValueKind::FreeText { max_len } => {
            let limit = config.free_text_limits.get(field).copied().unwrap_or(*max_len);
            Some(truncate_chars(&collapsed, limit))
        }
    }
}

/// Collapse all internal whitespace runs to a single space and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonicalize a date string: any run of `/`, `.`, `-` or space separators
/// becomes a single `/`, and a 2-digit year expands with a pivot (years
/// above 30 belong to the 1900s, the rest to the 2000s). Returns None for
/// values that do not have a day/month/year shape.
pub fn normalize_date(s: &str) -> Option<String> {
    let parts: Vec<&str> = DATE_SEPARATORS.split(s.trim()).filter(|p| !p.is_empty()).collect();

    if parts.len() != 3 {
        return None;
    }

    let (day, month, year) = (parts[0], parts[1], parts[2]);
    if !is_digits(day, 1, 2) || !is_digits(month, 1, 2) {
        return None;
    }

    let year = match year.len() {
        4 if is_digits(year, 4, 4) => year.to_string(),
        2 if is_digits(year, 2, 2) => {
            let y: u32 = year.parse().ok()?;
            if y > 30 {
                format!("19{:02}", y)
            } else {
                format!("20{:02}", y)
            }
        }
        _ => return None,
    };

    Some(format!("{}/{}/{}", day, month, year))
}

fn is_digits(s: &str, min: usize, max: usize) -> bool {
    s.len() >= min && s.len() <= max && s.chars().all(|c| c.is_ascii_digit())
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect::<String>().trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn clean(kind: &ValueKind, raw: &str) -> Option<String> {
        clean_value("Campo", kind, raw, &CleanerConfig::default())
    }

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(clean(&ValueKind::Text, "  ACME   SRL "), Some("ACME SRL".to_string()));
        assert_eq!(clean(&ValueKind::Text, "   "), None);
    }

    #[test]
    fn test_name_strips_trailing_punctuation() {
        assert_eq!(clean(&ValueKind::Name, "MILANO, -"), Some("MILANO".to_string()));
        assert_eq!(clean(&ValueKind::Name, "S. DONATO."), Some("S. DONATO".to_string()));
    }

    #[test]
    fn test_date_separator_canonicalization() {
        let kind = ValueKind::Date;
        assert_eq!(clean(&kind, "01.02-1980"), Some("01/02/1980".to_string()));
        assert_eq!(clean(&kind, "1 2 1980"), Some("1/2/1980".to_string()));
    }

    #[test]
    fn test_date_two_digit_year_pivot() {
        let kind = ValueKind::Date;
        // years above 30 belong to the 1900s
        assert_eq!(clean(&kind, "01/02/80"), Some("01/02/1980".to_string()));
        assert_eq!(clean(&kind, "01/02/31"), Some("01/02/1931".to_string()));
        // 30 and below to the 2000s
        assert_eq!(clean(&kind, "01/02/30"), Some("01/02/2030".to_string()));
        assert_eq!(clean(&kind, "01/02/05"), Some("01/02/2005".to_string()));
    }

    #[test]
    fn test_date_normalization_idempotent() {
        let canonical = normalize_date("12.05.1987").unwrap();
        assert_eq!(canonical, "12/05/1987");
        assert_eq!(normalize_date(&canonical), Some(canonical.clone()));
    }

    #[test]
    fn test_malformed_date_dropped() {
        let kind = ValueKind::Date;
        assert_eq!(clean(&kind, "12/1987"), None);
        assert_eq!(clean(&kind, "123/05/1987"), None);
        assert_eq!(clean(&kind, "12/05/198"), None);
    }

    #[test]
    fn test_identifier_length_gate() {
        let kind = ValueKind::Identifier { allowed_lengths: vec![11, 16] };
        assert_eq!(clean(&kind, "12345678901"), Some("12345678901".to_string()));
        assert_eq!(clean(&kind, "RSSMRA80A01H501U"), Some("RSSMRA80A01H501U".to_string()));
        assert_eq!(clean(&kind, "1234567890"), None);
        assert_eq!(clean(&kind, "123456789012"), None);
    }

    #[test]
    fn test_free_text_truncation_with_config_override() {
        let kind = ValueKind::FreeText { max_len: 300 };
        let mut config = CleanerConfig::default();
        config.free_text_limits.insert("Campo".to_string(), 10);

        let cleaned = clean_value("Campo", &kind, "COMMERCIO ALL'INGROSSO DI PRODOTTI", &config);
        assert_eq!(cleaned, Some("COMMERCIO".to_string()));
    }
}
