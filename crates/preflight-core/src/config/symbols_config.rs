//! Symbol graph configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BINDING_PATTERN: &str =
    r#"\.addItem\(\s*['"](?P<label>[^'"]+)['"]\s*,\s*['"](?P<name>[^'"]+)['"]\s*\)"#;

pub const DEFAULT_RESERVED_ENTRY_POINTS: &[&str] = &["onOpen", "onEdit", "doGet", "doPost"];

/// Configuration for the declared-vs-referenced function check.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SymbolsConfig {
    /// Binding document paths, relative to the project root.
    /// Default: ["client/Menu.gs"].
    pub binding_files: Vec<String>,
    /// Categories whose declarations satisfy references. Default: ["client", "web"].
    pub declaration_categories: Vec<String>,
    /// Regex with named groups `label` and `name` extracting one reference.
    pub binding_pattern: Option<String>,
    /// Names invoked by the runtime that are never referenced in-project.
    /// Default: onOpen, onEdit, doGet, doPost.
    pub reserved_entry_points: Vec<String>,
    /// Accept indented `function NAME(` declarations as top-level. Default: false.
    pub allow_indented: Option<bool>,
}

impl SymbolsConfig {
    pub fn effective_binding_files(&self) -> Vec<String> {
        if self.binding_files.is_empty() {
            vec!["client/Menu.gs".to_string()]
        } else {
            self.binding_files.clone()
        }
    }

    pub fn effective_declaration_categories(&self) -> Vec<String> {
        if self.declaration_categories.is_empty() {
            vec!["client".to_string(), "web".to_string()]
        } else {
            self.declaration_categories.clone()
        }
    }

    pub fn effective_binding_pattern(&self) -> &str {
        self.binding_pattern.as_deref().unwrap_or(DEFAULT_BINDING_PATTERN)
    }

    pub fn effective_reserved_entry_points(&self) -> Vec<String> {
        if self.reserved_entry_points.is_empty() {
            DEFAULT_RESERVED_ENTRY_POINTS
                .iter()
                .map(|s| s.to_string())
                .collect()
        } else {
            self.reserved_entry_points.clone()
        }
    }

    pub fn effective_allow_indented(&self) -> bool {
        self.allow_indented.unwrap_or(false)
    }
}
