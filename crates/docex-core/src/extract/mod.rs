//! Field extraction: normalization, pattern rules, matching loop, cleaning.

pub mod cleaner;
pub mod extractor;
pub mod normalize;
pub mod patterns;
pub mod rules;

pub use cleaner::{clean_value, collapse_whitespace, normalize_date};
pub use extractor::{extract, extract_with_defaults, DEFAULT_RULES};
pub use normalize::NormalizedText;
pub use rules::{
    FieldRule, GroupStrategy, MatchTarget, PatternOutcome, PatternSpec, RuleMode, RuleSet,
    ValueKind,
};
