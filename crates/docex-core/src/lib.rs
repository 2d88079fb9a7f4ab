//! Core library for Italian business document extraction.
//!
//! This crate provides:
//! - Keyword-based classification of raw document text (company registry
//!   extracts vs. personal identity documents)
//! - Regex-driven field extraction with per-field pattern rules
//! - Value cleaning (date normalization, identifier validation, truncation)
//! - Company/person batch matching and output schema mapping

pub mod classify;
pub mod error;
pub mod extract;
pub mod matcher;
pub mod models;
pub mod pipeline;
pub mod template;

pub use classify::{classify, classify_with};
pub use error::{DocexError, Result, RuleError};
pub use extract::{extract, extract_with_defaults, NormalizedText, RuleSet};
pub use matcher::match_batch;
pub use models::{
    DocexConfig, DocumentType, FieldRecord, MatchPair, MatchStrategy, OutputRow, Record,
    UnmatchedRecord,
};
pub use pipeline::{is_empty_extraction, process_document, process_document_at};
pub use template::{default_schema, map_to_schema};
