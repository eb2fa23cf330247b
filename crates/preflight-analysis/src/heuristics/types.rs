//! Heuristic analysis types

use serde::Serialize;

/// Which advisory heuristic produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    /// No guard conditional shortly after a function declaration
    MissingValidation,
    /// A risky call with no try/catch nearby
    MissingErrorHandling,
}

/// How the missing-validation heuristic recognizes a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMode {
    /// Any `if (!...)` in the window counts.
    #[default]
    AnyNegation,
    /// The guard must test a declared parameter (`!p`, `p == null`,
    /// `typeof p`). Parameterless functions are not inspected.
    ParameterAware,
}

impl ValidationMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "any-negation" | "any_negation" => Some(ValidationMode::AnyNegation),
            "parameter-aware" | "parameter_aware" => Some(ValidationMode::ParameterAware),
            _ => None,
        }
    }
}

/// An advisory finding. Never fails a run on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeuristicFinding {
    pub file: String,
    pub line: u32,
    pub kind: HeuristicKind,
    /// Declared function (validation) or risky callee (error handling)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    pub snippet: String,
}

impl HeuristicFinding {
    pub fn message(&self) -> String {
        let name = self.function.as_deref().unwrap_or("?");
        match self.kind {
            HeuristicKind::MissingValidation => {
                format!("{name}() has no input guard near its declaration")
            }
            HeuristicKind::MissingErrorHandling => {
                format!("call to {name}() has no try/catch nearby")
            }
        }
    }
}

/// Result of running the heuristic set over documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeuristicReport {
    pub files_analyzed: usize,
    pub functions_inspected: usize,
    pub call_sites_inspected: usize,
    /// Findings in document order, then line order
    pub findings: Vec<HeuristicFinding>,
}
