//! Symbol graph: binding references vs. declared top-level functions.
//!
//! All declared names share one flat namespace with no per-file scoping.

pub mod builder;
pub mod graph;
pub mod types;

pub use builder::SymbolGraphBuilder;
pub use graph::{symbol_findings, SymbolGraph};
pub use types::*;
