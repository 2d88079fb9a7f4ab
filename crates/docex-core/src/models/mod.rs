//! Data models and configuration.

pub mod config;
pub mod record;

pub use config::{ClassifierConfig, CleanerConfig, DocexConfig, MatcherConfig};
pub use record::{
    DocumentType, FieldRecord, MatchPair, MatchStrategy, OutputRow, Record, UnmatchedRecord,
};
