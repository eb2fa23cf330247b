//! Pattern compilation errors.

use super::error_code::{self, PreflightErrorCode};

/// Errors raised while compiling user-supplied matchers.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid pattern for rule '{rule}': {message}")]
    InvalidRegex { rule: String, message: String },

    #[error("Binding pattern must define named groups 'label' and 'name': {pattern}")]
    MissingCaptureGroup { pattern: String },

    #[error("Rule '{rule}' names unknown category '{category}'")]
    UnknownCategory { rule: String, category: String },

    #[error("Invalid risky function list: {0}")]
    InvalidNameSet(String),
}

impl PreflightErrorCode for PatternError {
    fn error_code(&self) -> &'static str {
        error_code::PATTERN_ERROR
    }
}
