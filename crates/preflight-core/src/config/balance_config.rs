//! Delimiter balance configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the delimiter balance checker.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BalanceConfig {
    /// Delimiter pairs to check: "paren", "brace", "bracket".
    /// Default: ["paren", "brace"].
    pub pairs: Vec<String>,
    /// Scan mode: "raw" counts every character, "lexical" skips strings
    /// and comments. Default: "raw".
    pub mode: Option<String>,
    /// Per-line imbalance magnitude above which a line warning is emitted.
    /// Default: 1.
    pub line_threshold: Option<u32>,
}

impl BalanceConfig {
    /// Returns the effective delimiter pair names.
    pub fn effective_pairs(&self) -> Vec<String> {
        if self.pairs.is_empty() {
            vec!["paren".to_string(), "brace".to_string()]
        } else {
            self.pairs.clone()
        }
    }

    /// Returns the effective mode, defaulting to "raw".
    pub fn effective_mode(&self) -> &str {
        self.mode.as_deref().unwrap_or("raw")
    }

    /// Returns the effective line threshold, defaulting to 1.
    pub fn effective_line_threshold(&self) -> u32 {
        self.line_threshold.unwrap_or(1)
    }
}
