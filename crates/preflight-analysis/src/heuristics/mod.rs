//! Advisory call-site heuristics: missing validation and missing error handling.
//!
//! Findings are over-approximate by construction and never block a run.

pub mod analyzer;
pub mod types;

pub use analyzer::{
    heuristic_findings, ErrorHandlingHeuristic, HeuristicAnalyzer, HeuristicSet,
    ValidationHeuristic,
};
pub use types::*;
