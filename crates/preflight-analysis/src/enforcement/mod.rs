//! Enforcement: aggregates check reports into a run outcome.
//!
//! The run fails iff any finding is a defect. Heuristic, encoding, and
//! unused-symbol findings never change the outcome on their own.

pub mod pipeline;
pub mod report;
pub mod reporters;

pub use pipeline::Preflight;
pub use report::{CheckId, CheckReport, RunReport, RunStatus};
