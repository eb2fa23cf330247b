//! preflight-core: shared foundations for the preflight script validator.
//!
//! - Errors: one `thiserror` enum per subsystem plus `PipelineError`
//! - Config: TOML-based layered configuration
//! - Tracing: `tracing-subscriber` setup driven by `PREFLIGHT_LOG`

pub mod config;
pub mod errors;
pub mod tracing;

pub use config::PreflightConfig;
pub use errors::{PipelineError, PreflightErrorCode};
