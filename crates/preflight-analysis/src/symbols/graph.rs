//! Declared-vs-referenced graph.

use rustc_hash::{FxHashMap, FxHashSet};

use super::types::*;
use crate::diagnostics::{Finding, FindingKind, Locator, Severity};

/// Bidirectional mapping between binding references and declarations.
#[derive(Debug, Clone, Default)]
pub struct SymbolGraph {
    references: Vec<SymbolReference>,
    declarations: SymbolTable,
    /// name -> indices into `references`
    referenced_by: FxHashMap<String, Vec<usize>>,
}

impl SymbolGraph {
    pub fn new(references: Vec<SymbolReference>, declarations: SymbolTable) -> Self {
        let mut referenced_by: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        for (idx, reference) in references.iter().enumerate() {
            referenced_by.entry(reference.name.clone()).or_default().push(idx);
        }
        Self {
            references,
            declarations,
            referenced_by,
        }
    }

    pub fn references(&self) -> &[SymbolReference] {
        &self.references
    }

    pub fn declarations(&self) -> &SymbolTable {
        &self.declarations
    }

    /// Bindings that target `name`.
    pub fn references_to(&self, name: &str) -> Vec<&SymbolReference> {
        self.referenced_by
            .get(name)
            .map(|idxs| idxs.iter().map(|&i| &self.references[i]).collect())
            .unwrap_or_default()
    }

    /// Declaration sites a reference resolves to (empty when missing).
    pub fn resolve(&self, reference: &SymbolReference) -> &[DeclarationSite] {
        self.declarations.sites(&reference.name)
    }

    /// References whose target is not declared anywhere.
    pub fn missing(&self) -> Vec<&SymbolReference> {
        self.references
            .iter()
            .filter(|r| !self.declarations.contains(&r.name))
            .collect()
    }

    /// Declared names neither referenced nor reserved, sorted by name.
    /// Each entry points at the first declaration site.
    pub fn unused(&self, reserved: &[String]) -> Vec<SymbolDeclaration> {
        let reserved: FxHashSet<&str> = reserved.iter().map(String::as_str).collect();
        self.declarations
            .names()
            .into_iter()
            .filter(|name| !self.referenced_by.contains_key(*name) && !reserved.contains(name))
            .filter_map(|name| {
                self.declarations.sites(name).first().map(|site| SymbolDeclaration {
                    name: name.to_string(),
                    file: site.file.clone(),
                    line: site.line,
                })
            })
            .collect()
    }

    pub fn report(&self, reserved: &[String]) -> SymbolReport {
        let missing: Vec<SymbolReference> = self.missing().into_iter().cloned().collect();
        SymbolReport {
            references_total: self.references.len(),
            resolved: self.references.len() - missing.len(),
            declared_count: self.declarations.len(),
            missing,
            unused: self.unused(reserved),
            missing_binding_documents: Vec::new(),
        }
    }
}

/// Missing references and absent binding documents are defects;
/// unused declarations are informational.
pub fn symbol_findings(report: &SymbolReport) -> Vec<Finding> {
    let mut findings = Vec::new();
    for path in &report.missing_binding_documents {
        findings.push(Finding::new(
            FindingKind::MissingBindingDocument,
            Severity::Defect,
            Locator::line(path, 0),
            "binding document not found",
        ));
    }
    for reference in &report.missing {
        findings.push(Finding::new(
            FindingKind::MissingSymbol,
            Severity::Defect,
            Locator::line(&reference.file, reference.line),
            format!(
                "'{}' is bound to {}() which is not declared",
                reference.label, reference.name
            ),
        ));
    }
    for declaration in &report.unused {
        findings.push(Finding::new(
            FindingKind::UnusedSymbol,
            Severity::Info,
            Locator::line(&declaration.file, declaration.line),
            format!("{}() is declared but never bound", declaration.name),
        ));
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(name: &str, file: &str, line: u32) -> SymbolDeclaration {
        SymbolDeclaration {
            name: name.into(),
            file: file.into(),
            line,
        }
    }

    fn reference(label: &str, name: &str, line: u32) -> SymbolReference {
        SymbolReference {
            label: label.into(),
            name: name.into(),
            file: "client/Menu.gs".into(),
            line,
        }
    }

    #[test]
    fn test_missing_reference() {
        let table: SymbolTable = vec![decl("foo", "a.gs", 1), decl("bar", "a.gs", 5)]
            .into_iter()
            .collect();
        let graph = SymbolGraph::new(vec![reference("X", "foo", 2), reference("Y", "baz", 3)], table);

        let missing = graph.missing();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].label, "Y");
        assert_eq!(missing[0].name, "baz");
    }

    #[test]
    fn test_unused_excludes_reserved_and_referenced() {
        let table: SymbolTable = vec![
            decl("onOpen", "a.gs", 1),
            decl("zeta", "a.gs", 4),
            decl("alpha", "b.gs", 2),
            decl("used", "b.gs", 9),
        ]
        .into_iter()
        .collect();
        let graph = SymbolGraph::new(vec![reference("U", "used", 1)], table);

        let unused = graph.unused(&["onOpen".to_string()]);
        let names: Vec<_> = unused.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_duplicate_declarations_are_not_errors() {
        let table: SymbolTable = vec![decl("dup", "a.gs", 1), decl("dup", "b.gs", 7)]
            .into_iter()
            .collect();
        assert_eq!(table.len(), 1);
        assert_eq!(table.redeclared(), vec!["dup"]);

        let graph = SymbolGraph::new(vec![reference("D", "dup", 1)], table);
        assert!(graph.missing().is_empty());
        assert_eq!(graph.resolve(&graph.references()[0]).len(), 2);
    }

    #[test]
    fn test_reverse_index() {
        let table: SymbolTable = vec![decl("foo", "a.gs", 1)].into_iter().collect();
        let graph = SymbolGraph::new(
            vec![reference("A", "foo", 1), reference("B", "foo", 2)],
            table,
        );
        let labels: Vec<_> = graph.references_to("foo").iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B"]);
        assert!(graph.references_to("nope").is_empty());
    }

    #[test]
    fn test_report_and_findings() {
        let table: SymbolTable = vec![decl("foo", "a.gs", 1), decl("idle", "a.gs", 3)]
            .into_iter()
            .collect();
        let graph = SymbolGraph::new(vec![reference("X", "foo", 2), reference("Y", "baz", 3)], table);
        let report = graph.report(&[]);
        assert_eq!(report.references_total, 2);
        assert_eq!(report.resolved, 1);
        assert_eq!(report.declared_count, 2);

        let findings = symbol_findings(&report);
        let blocking: Vec<_> = findings.iter().filter(|f| f.is_blocking()).collect();
        assert_eq!(blocking.len(), 1);
        assert_eq!(blocking[0].kind, FindingKind::MissingSymbol);
        assert_eq!(blocking[0].locator, Locator::line("client/Menu.gs", 3));
        assert!(findings
            .iter()
            .any(|f| f.kind == FindingKind::UnusedSymbol && f.severity == Severity::Info));
    }
}
