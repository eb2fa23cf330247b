//! Pattern scanning: conflict markers, forbidden references, suspicious returns.
//!
//! Each rule pairs a line matcher with a context-exclusion rule, so a marker
//! that appears inside a comment or string documenting it is not reported.

pub mod rules;
pub mod scanner;
pub mod types;

pub use rules::{PatternRule, PatternSet};
pub use scanner::{pattern_findings, PatternScanner};
pub use types::*;
