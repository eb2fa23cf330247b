//! Reference and declaration extraction.

use preflight_core::config::SymbolsConfig;
use preflight_core::errors::PatternError;
use rayon::prelude::*;
use regex::Regex;

use super::graph::SymbolGraph;
use super::types::*;
use crate::scanner::Document;

const TOP_LEVEL_DECLARATION: &str = r"(?m)^function\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*\(";
const INDENTED_DECLARATION: &str = r"(?m)^[ \t]*function\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*\(";

/// Builds a `SymbolGraph` from binding and declaration documents.
#[derive(Debug, Clone)]
pub struct SymbolGraphBuilder {
    binding: Regex,
    declaration: Regex,
}

impl SymbolGraphBuilder {
    /// `binding_pattern` must define `label` and `name` capture groups.
    pub fn new(binding_pattern: &str, allow_indented: bool) -> Result<Self, PatternError> {
        let binding = Regex::new(binding_pattern).map_err(|e| PatternError::InvalidRegex {
            rule: "symbols.binding_pattern".to_string(),
            message: e.to_string(),
        })?;
        let names: Vec<&str> = binding.capture_names().flatten().collect();
        if !names.contains(&"label") || !names.contains(&"name") {
            return Err(PatternError::MissingCaptureGroup {
                pattern: binding_pattern.to_string(),
            });
        }

        let declaration_pattern = if allow_indented {
            INDENTED_DECLARATION
        } else {
            TOP_LEVEL_DECLARATION
        };
        let declaration =
            Regex::new(declaration_pattern).map_err(|e| PatternError::InvalidRegex {
                rule: "symbols.declaration".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            binding,
            declaration,
        })
    }

    pub fn from_config(config: &SymbolsConfig) -> Result<Self, PatternError> {
        Self::new(
            config.effective_binding_pattern(),
            config.effective_allow_indented(),
        )
    }

    /// Every (label, name) binding in a document, in source order.
    pub fn extract_references(&self, doc: &Document) -> Vec<SymbolReference> {
        self.binding
            .captures_iter(doc.body())
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some(SymbolReference {
                    label: caps.name("label")?.as_str().to_string(),
                    name: caps.name("name")?.as_str().to_string(),
                    file: doc.path.clone(),
                    line: doc.line_of_offset(whole.start()),
                })
            })
            .collect()
    }

    /// Every top-level function declaration in a document, in source order.
    pub fn extract_declarations(&self, doc: &Document) -> Vec<SymbolDeclaration> {
        self.declaration
            .captures_iter(doc.body())
            .filter_map(|caps| {
                let name = caps.get(1)?;
                Some(SymbolDeclaration {
                    name: name.as_str().to_string(),
                    file: doc.path.clone(),
                    line: doc.line_of_offset(name.start()),
                })
            })
            .collect()
    }

    /// Extract references from `bindings` and declarations from
    /// `declarations`, then link them.
    pub fn build_graph(&self, bindings: &[&Document], declarations: &[&Document]) -> SymbolGraph {
        let references: Vec<SymbolReference> = bindings
            .iter()
            .flat_map(|doc| self.extract_references(doc))
            .collect();

        let declared: Vec<Vec<SymbolDeclaration>> = declarations
            .par_iter()
            .map(|doc| self.extract_declarations(doc))
            .collect();
        let table: SymbolTable = declared.into_iter().flatten().collect();

        tracing::info!(
            references = references.len(),
            declared = table.len(),
            redeclared = table.redeclared().len(),
            "symbol graph built"
        );
        SymbolGraph::new(references, table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Category;
    use preflight_core::config::DEFAULT_BINDING_PATTERN;

    fn builder() -> SymbolGraphBuilder {
        SymbolGraphBuilder::new(DEFAULT_BINDING_PATTERN, false).unwrap()
    }

    const MENU: &str = "function onOpen() {\n  SpreadsheetApp.getUi().createMenu('Tools')\n    .addItem('Run report', 'runReport')\n    .addItem(\"Clear\", \"clearAll\")\n    .addToUi();\n}\n";

    #[test]
    fn test_extract_references_with_lines() {
        let doc = Document::new("client/Menu.gs", Category::Client, MENU);
        let refs = builder().extract_references(&doc);
        assert_eq!(refs.len(), 2);
        assert_eq!((refs[0].label.as_str(), refs[0].name.as_str(), refs[0].line), ("Run report", "runReport", 3));
        assert_eq!((refs[1].label.as_str(), refs[1].name.as_str(), refs[1].line), ("Clear", "clearAll", 4));
    }

    #[test]
    fn test_only_column_zero_declarations_by_default() {
        let text = "function outer() {\n  function inner() {}\n}\nfunction  spaced (a) {}\n";
        let doc = Document::new("client/A.gs", Category::Client, text);

        let top = builder().extract_declarations(&doc);
        let names: Vec<_> = top.iter().map(|d| (d.name.as_str(), d.line)).collect();
        assert_eq!(names, vec![("outer", 1), ("spaced", 4)]);

        let all = SymbolGraphBuilder::new(DEFAULT_BINDING_PATTERN, true)
            .unwrap()
            .extract_declarations(&doc);
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].name, "inner");
        assert_eq!(all[1].line, 2);
    }

    #[test]
    fn test_binding_pattern_requires_named_groups() {
        let err = SymbolGraphBuilder::new(r"\.addItem\('([^']+)'\)", false).unwrap_err();
        assert!(matches!(err, PatternError::MissingCaptureGroup { .. }));

        let err = SymbolGraphBuilder::new(r"(?P<label>[", false).unwrap_err();
        assert!(matches!(err, PatternError::InvalidRegex { .. }));
    }

    #[test]
    fn test_build_graph_across_documents() {
        let menu = Document::new("client/Menu.gs", Category::Client, MENU);
        let a = Document::new("client/Report.gs", Category::Client, "function runReport() {}\n");
        let b = Document::new("web/Web.gs", Category::Web, "function doGet(e) {}\n");

        let graph = builder().build_graph(&[&menu], &[&menu, &a, &b]);
        let missing: Vec<_> = graph.missing().iter().map(|r| r.name.clone()).collect();
        assert_eq!(missing, vec!["clearAll"]);

        let reserved: Vec<String> = vec!["onOpen".into(), "doGet".into()];
        assert!(graph.unused(&reserved).is_empty());
    }
}
