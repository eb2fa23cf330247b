//! Heuristic call-site analyzer configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the advisory call-site heuristics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HeuristicsConfig {
    /// Lines after a declaration searched for a guard. Default: 9.
    pub validation_window: Option<usize>,
    /// Lines before and after a risky call searched for try/catch. Default: 5.
    pub error_handling_window: Option<usize>,
    /// "any-negation" or "parameter-aware". Default: "any-negation".
    pub validation_mode: Option<String>,
    /// Function names whose call sites need a protective scope.
    /// Default: ["callServer"].
    pub risky_functions: Vec<String>,
    /// Categories analyzed. Default: client, server, shared, web.
    pub categories: Vec<String>,
}

impl HeuristicsConfig {
    pub fn effective_validation_window(&self) -> usize {
        self.validation_window.unwrap_or(9)
    }

    pub fn effective_error_handling_window(&self) -> usize {
        self.error_handling_window.unwrap_or(5)
    }

    pub fn effective_validation_mode(&self) -> &str {
        self.validation_mode.as_deref().unwrap_or("any-negation")
    }

    pub fn effective_risky_functions(&self) -> Vec<String> {
        if self.risky_functions.is_empty() {
            vec!["callServer".to_string()]
        } else {
            self.risky_functions.clone()
        }
    }

    pub fn effective_categories(&self) -> Vec<String> {
        if self.categories.is_empty() {
            ["client", "server", "shared", "web"]
                .iter()
                .map(|s| s.to_string())
                .collect()
        } else {
            self.categories.clone()
        }
    }
}
