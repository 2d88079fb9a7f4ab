//! Error types for the docex-core library.

use thiserror::Error;

/// Main error type for the docex library.
///
/// Expected data-quality problems (missing fields, garbled text, documents
/// that cannot be classified) never surface here; those produce best-effort
/// results. Only caller-side defects do: an invalid rule set or an unreadable
/// configuration file.
#[derive(Error, Debug)]
pub enum DocexError {
    /// A caller-supplied extraction rule is invalid.
    #[error("rule error: {0}")]
    Rule(#[from] RuleError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to extraction rule sets.
#[derive(Error, Debug)]
pub enum RuleError {
    /// A pattern failed to compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A pattern references a capture group it does not define.
    #[error("pattern `{pattern}` has no capture group {group}")]
    MissingGroup { pattern: String, group: usize },
}

/// Result type for the docex library.
pub type Result<T> = std::result::Result<T, DocexError>;
