//! preflight-analysis: static validation for multi-file script projects
//!
//! Every check is a pure function from a loaded document set to a report:
//! - Scanner: loads category directories into `Document`s, flags encoding problems
//! - Lexer: line-oriented code/comment/string context tracking
//! - Balance: stack-based delimiter matching with line/column locators
//! - Symbols: declared-vs-referenced function graph over a flat namespace
//! - Patterns: comment-aware conflict-marker and forbidden-pattern scanning
//! - Heuristics: advisory missing-validation and missing-error-handling checks
//! - Structure: per-category file/function/line statistics
//! - Enforcement: report aggregation, exit status, and reporters

pub mod balance;
pub mod diagnostics;
pub mod enforcement;
pub mod heuristics;
pub mod lexer;
pub mod patterns;
pub mod scanner;
pub mod structure;
pub mod symbols;

pub use balance::{BalanceChecker, BalanceMode, BalanceReport, DelimiterPair};
pub use diagnostics::{Finding, FindingKind, Locator, Severity};
pub use enforcement::{CheckId, CheckReport, Preflight, RunReport, RunStatus};
pub use heuristics::{HeuristicAnalyzer, HeuristicFinding, HeuristicKind, HeuristicSet};
pub use patterns::{PatternCategory, PatternMatch, PatternScanner, PatternSet};
pub use scanner::{Category, Document, DocumentLoader, EncodingWarning, LoadReport};
pub use structure::{analyze_structure, StructureReport};
pub use symbols::{SymbolGraph, SymbolGraphBuilder, SymbolReference, SymbolReport};
