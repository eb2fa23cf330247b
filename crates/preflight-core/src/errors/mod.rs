//! Error handling for preflight.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod load_error;
pub mod pattern_error;
pub mod pipeline_error;
pub mod report_error;

pub use config_error::ConfigError;
pub use error_code::PreflightErrorCode;
pub use load_error::LoadError;
pub use pattern_error::PatternError;
pub use pipeline_error::PipelineError;
pub use report_error::ReportError;
