//! PreflightErrorCode trait for tagged error output.

/// Every error enum implements this to expose a stable code string
/// that callers can match on without parsing messages.
pub trait PreflightErrorCode {
    /// Returns the error code string (e.g., "LOAD_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the tagged error string: `[ERROR_CODE] message`.
    fn tagged(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const LOAD_ERROR: &str = "LOAD_ERROR";
pub const MISSING_CATEGORY: &str = "MISSING_CATEGORY";
pub const PATTERN_ERROR: &str = "PATTERN_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const REPORT_ERROR: &str = "REPORT_ERROR";
