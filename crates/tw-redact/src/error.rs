//! Error types for the redaction engine.

use thiserror::Error;

/// Result type for redaction operations.
pub type Result<T> = std::result::Result<T, RedactionError>;

/// Errors that can occur while building a redactor.
///
/// Redaction itself is total; only construction can fail.
#[derive(Error, Debug)]
pub enum RedactionError {
    /// A mask rule pattern failed to compile.
    #[error("pattern error in rule '{rule}': {message}")]
    Pattern { rule: String, message: String },
}

impl RedactionError {
    pub(crate) fn pattern(rule: &str, err: regex::Error) -> Self {
        RedactionError::Pattern {
            rule: rule.to_string(),
            message: err.to_string(),
        }
    }
}
