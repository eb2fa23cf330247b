//! Delimiter balance checking.
//!
//! Character-level stack matching of open/close pairs. Raw mode counts every
//! character; lexical mode skips string and comment spans.

pub mod checker;
pub mod types;

pub use checker::{balance_findings, BalanceChecker};
pub use types::*;
