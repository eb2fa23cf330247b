//! Pattern scanner configuration.

use serde::{Deserialize, Serialize};

/// A user-defined forbidden identifier rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForbiddenRuleConfig {
    /// Rule identifier shown in findings.
    pub id: String,
    /// Regex matched against each trimmed line.
    pub pattern: String,
    /// Human-readable reason.
    #[serde(default)]
    pub message: Option<String>,
    /// Path fragments that exempt a document (e.g. "/archive/").
    #[serde(default)]
    pub exempt_paths: Vec<String>,
    /// Categories that are exempt (e.g. "tests").
    #[serde(default)]
    pub exempt_categories: Vec<String>,
    /// Whether a match fails the run. Default: false.
    #[serde(default)]
    pub blocking: bool,
}

/// Configuration for the pattern scanner.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PatternsConfig {
    /// Scan for unresolved merge-conflict markers. Default: true.
    pub conflict_markers: Option<bool>,
    /// Report `return null`, `return undefined`, and bare `return;`. Default: true.
    pub suspicious_returns: Option<bool>,
    /// Forbidden identifier rules. Default: the deprecated `logger.` object.
    pub forbidden: Vec<ForbiddenRuleConfig>,
}

impl PatternsConfig {
    pub fn effective_conflict_markers(&self) -> bool {
        self.conflict_markers.unwrap_or(true)
    }

    pub fn effective_suspicious_returns(&self) -> bool {
        self.suspicious_returns.unwrap_or(true)
    }

    pub fn effective_forbidden(&self) -> Vec<ForbiddenRuleConfig> {
        if !self.forbidden.is_empty() {
            return self.forbidden.clone();
        }
        vec![ForbiddenRuleConfig {
            id: "deprecated-logger".to_string(),
            pattern: r"\blogger\.".to_string(),
            message: Some("use Logger.log instead of the removed logger object".to_string()),
            exempt_paths: vec!["/archive/".to_string()],
            exempt_categories: vec!["tests".to_string()],
            blocking: false,
        }]
    }
}
