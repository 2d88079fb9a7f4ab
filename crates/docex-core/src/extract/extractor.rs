//! The uniform rule-matching loop producing a field record.

use lazy_static::lazy_static;
use tracing::{debug, trace};

use super::cleaner::clean_value;
use super::normalize::NormalizedText;
use super::rules::{PatternOutcome, RuleMode, RuleSet};
use crate::models::{CleanerConfig, DocumentType, FieldRecord};

lazy_static! {
    /// The built-in Italian rule tables, compiled once.
    pub static ref DEFAULT_RULES: RuleSet = RuleSet::italian_defaults();
}

/// Run the rule set for a document type against normalized text.
///
/// Fields are independent: one rule failing never blocks the others. Within
/// a rule, the first pattern yielding a value that survives cleaning wins.
/// Across rules targeting the same field name, the first writer wins; a
/// later rule never overwrites a set field. A field with no surviving value
/// is absent from the result, never present as an empty string.
pub fn extract(
    text: &NormalizedText,
    document_type: DocumentType,
    rules: &RuleSet,
    cleaner: &CleanerConfig,
) -> FieldRecord {
    let mut record = FieldRecord::new();

    for rule in rules.rules_for(document_type) {
        if record.contains_key(&rule.field) {
            trace!(field = %rule.field, "field already set, skipping rule");
            continue;
        }

        for spec in &rule.patterns {
            match spec.evaluate(text) {
                PatternOutcome::NoMatch => continue,
                PatternOutcome::MatchedEmpty => match rule.mode {
                    RuleMode::FirstPattern => break,
                    RuleMode::TryAllPatterns => continue,
                },
                PatternOutcome::Value(raw) => {
                    match clean_value(&rule.field, &rule.kind, &raw, cleaner) {
                        Some(value) => {
                            debug!(field = %rule.field, %value, "field extracted");
                            record.insert(rule.field.clone(), value);
                            break;
                        }
                        // Shape check rejected the capture; whether the rule
                        // keeps scanning follows the same mode as an empty
                        // match.
                        None => match rule.mode {
                            RuleMode::FirstPattern => break,
                            RuleMode::TryAllPatterns => continue,
                        },
                    }
                }
            }
        }
    }

    debug!(
        document_type = ?document_type,
        fields = record.len(),
        "extraction finished"
    );

    record
}

/// Extract with the built-in rule tables and default cleaning.
pub fn extract_with_defaults(text: &NormalizedText, document_type: DocumentType) -> FieldRecord {
    extract(text, document_type, &DEFAULT_RULES, &CleanerConfig::default())
}
