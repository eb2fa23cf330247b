//! The aggregator: loads documents, runs checks, builds a `RunReport`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use preflight_core::config::PreflightConfig;
use preflight_core::errors::{ConfigError, LoadError, PipelineError};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use super::report::{CheckId, CheckReport, RunReport};
use crate::balance::{balance_findings, BalanceChecker, BalanceMode, DelimiterPair};
use crate::diagnostics::{Finding, FindingKind, Locator, Severity};
use crate::heuristics::{heuristic_findings, HeuristicAnalyzer, HeuristicSet};
use crate::patterns::{pattern_findings, PatternScanner, PatternSet};
use crate::scanner::{Category, Document, DocumentLoader, LoadReport};
use crate::structure::{analyze_structure, StructureReport};
use crate::symbols::{symbol_findings, SymbolGraphBuilder, SymbolReport};

/// Configured validation pipeline for one project root.
pub struct Preflight {
    root: PathBuf,
    config: PreflightConfig,
    balance: BalanceChecker,
    symbols: SymbolGraphBuilder,
    patterns: PatternSet,
    heuristics: HeuristicSet,
}

impl Preflight {
    /// Compile every configured matcher up front so a bad pattern fails
    /// before any file is read.
    pub fn from_config(root: impl Into<PathBuf>, config: &PreflightConfig) -> Result<Self, PipelineError> {
        let pairs = config
            .balance
            .effective_pairs()
            .iter()
            .map(|name| {
                DelimiterPair::from_name(name).ok_or_else(|| ConfigError::InvalidValue {
                    field: "balance.pairs".to_string(),
                    message: format!("unknown delimiter pair '{name}'"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mode = BalanceMode::from_name(config.balance.effective_mode()).ok_or_else(|| {
            ConfigError::InvalidValue {
                field: "balance.mode".to_string(),
                message: format!("unknown mode '{}'", config.balance.effective_mode()),
            }
        })?;

        Ok(Self {
            root: root.into(),
            config: config.clone(),
            balance: BalanceChecker::new(pairs)
                .with_mode(mode)
                .with_line_threshold(config.balance.effective_line_threshold()),
            symbols: SymbolGraphBuilder::from_config(&config.symbols)?,
            patterns: PatternSet::from_config(&config.patterns)?,
            heuristics: HeuristicSet::from_config(&config.heuristics)?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &PreflightConfig {
        &self.config
    }

    /// Load the configured category directories.
    pub fn load(&self) -> Result<LoadReport, LoadError> {
        let loader = DocumentLoader::from_config(&self.root, &self.config.scan);
        loader.load(&DocumentLoader::specs_from_config(&self.config.scan))
    }

    /// Load every matching file under the root.
    pub fn load_tree(&self) -> Result<LoadReport, LoadError> {
        DocumentLoader::from_config(&self.root, &self.config.scan).load_tree()
    }

    pub fn run_all(&self, load: &LoadReport) -> RunReport {
        self.run(&CheckId::ALL, load)
    }

    /// Run the selected checks. They share no state, so they run in
    /// parallel; the report keeps the order of `checks`.
    pub fn run(&self, checks: &[CheckId], load: &LoadReport) -> RunReport {
        let start = Instant::now();
        let reports: Vec<CheckReport> = checks
            .par_iter()
            .map(|check| self.run_check(*check, load))
            .collect();

        let report = RunReport::new(
            load.root.clone(),
            load.documents.len(),
            load.failures.clone(),
            reports,
        );
        tracing::info!(
            checks = checks.len(),
            documents = report.documents,
            status = ?report.status(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "preflight run complete"
        );
        report
    }

    pub fn run_check(&self, check: CheckId, load: &LoadReport) -> CheckReport {
        match check {
            CheckId::Encoding => self.check_encoding(load),
            CheckId::Balance => self.check_balance(load),
            CheckId::Symbols => self.check_symbols(load),
            CheckId::Patterns => self.check_patterns(load),
            CheckId::Heuristics => self.check_heuristics(load),
        }
    }

    pub fn structure(&self, load: &LoadReport) -> StructureReport {
        analyze_structure(&load.documents)
    }

    fn check_encoding(&self, load: &LoadReport) -> CheckReport {
        let mut findings = Vec::new();
        let mut failed = 0;
        for doc in &load.documents {
            if doc.warnings.is_empty() {
                continue;
            }
            failed += 1;
            findings.extend(doc.warnings.iter().map(|w| {
                Finding::new(
                    FindingKind::Encoding,
                    Severity::Warning,
                    Locator::line(&doc.path, w.line()),
                    w.message(),
                )
            }));
        }
        CheckReport::new(CheckId::Encoding, load.documents.len(), failed, findings)
    }

    fn check_balance(&self, load: &LoadReport) -> CheckReport {
        let reports = self.balance.check_all(&load.documents);
        let by_path: FxHashMap<&str, &Document> =
            load.documents.iter().map(|d| (d.path.as_str(), d)).collect();
        let mut findings = Vec::new();
        let mut unbalanced_files: Vec<&str> = Vec::new();
        for report in &reports {
            if !report.is_balanced() && unbalanced_files.last() != Some(&report.file.as_str()) {
                unbalanced_files.push(&report.file);
            }
            findings.extend(balance_findings(report, by_path.get(report.file.as_str()).copied()));
        }
        CheckReport::new(
            CheckId::Balance,
            load.documents.len(),
            unbalanced_files.len(),
            findings,
        )
    }

    /// Binding documents listed in config but not loaded are defects.
    pub fn symbol_report(&self, load: &LoadReport) -> SymbolReport {
        let symbols = &self.config.symbols;
        let mut bindings: Vec<&Document> = Vec::new();
        let mut absent = Vec::new();
        for path in symbols.effective_binding_files() {
            match load.find(&path) {
                Some(doc) => bindings.push(doc),
                None => absent.push(path),
            }
        }

        let declaration_categories: Vec<Category> = symbols
            .effective_declaration_categories()
            .iter()
            .filter_map(|name| Category::from_name(name))
            .collect();
        let declarations: Vec<&Document> = load
            .documents
            .iter()
            .filter(|d| declaration_categories.contains(&d.category))
            .collect();

        let graph = self.symbols.build_graph(&bindings, &declarations);
        let mut report = graph.report(&symbols.effective_reserved_entry_points());
        report.missing_binding_documents = absent;
        report
    }

    fn check_symbols(&self, load: &LoadReport) -> CheckReport {
        let report = self.symbol_report(load);
        let failed = report.missing.len() + report.missing_binding_documents.len();
        CheckReport::new(
            CheckId::Symbols,
            report.references_total + report.missing_binding_documents.len(),
            failed,
            symbol_findings(&report),
        )
    }

    fn check_patterns(&self, load: &LoadReport) -> CheckReport {
        let report = PatternScanner::new(self.patterns.clone()).scan(&load.documents);
        CheckReport::new(
            CheckId::Patterns,
            report.files_scanned,
            report.files_with_matches(),
            pattern_findings(&report),
        )
    }

    fn check_heuristics(&self, load: &LoadReport) -> CheckReport {
        let categories: Vec<Category> = self
            .config
            .heuristics
            .effective_categories()
            .iter()
            .filter_map(|name| Category::from_name(name))
            .collect();
        let docs: Vec<Document> = load
            .documents
            .iter()
            .filter(|d| categories.contains(&d.category))
            .cloned()
            .collect();

        let report = HeuristicAnalyzer::new(self.heuristics.clone()).analyze(&docs);
        CheckReport::new(
            CheckId::Heuristics,
            report.functions_inspected + report.call_sites_inspected,
            report.findings.len(),
            heuristic_findings(&report),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(docs: Vec<Document>) -> LoadReport {
        LoadReport {
            root: "/project".to_string(),
            documents: docs,
            ..Default::default()
        }
    }

    fn pipeline() -> Preflight {
        Preflight::from_config("/project", &PreflightConfig::default()).unwrap()
    }

    #[test]
    fn test_missing_binding_document_is_a_defect() {
        let report = pipeline().run(
            &[CheckId::Symbols],
            &load(vec![Document::new("client/A.gs", Category::Client, "function a() {}\n")]),
        );
        let symbols = report.check(CheckId::Symbols).unwrap();
        assert_eq!(symbols.findings[0].kind, FindingKind::MissingBindingDocument);
        assert_eq!(symbols.findings[0].locator, Locator::line("client/Menu.gs", 0));
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_only_unused_symbols_pass() {
        let menu = "function onOpen() {\n  ui.addItem('Go', 'go');\n}\n";
        let docs = vec![
            Document::new("client/Menu.gs", Category::Client, menu),
            Document::new("client/Go.gs", Category::Client, "function go() {}\nfunction spare() {}\n"),
        ];
        let report = pipeline().run(&[CheckId::Symbols], &load(docs));
        let symbols = report.check(CheckId::Symbols).unwrap();
        assert_eq!((symbols.total, symbols.passed, symbols.failed), (1, 1, 0));
        assert_eq!(symbols.count(Severity::Info), 1);
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_heuristics_respect_categories() {
        let text = "function save(p) {\n  write(p);\n}\n";
        let docs = vec![
            Document::new("server/S.gs", Category::Server, text),
            Document::new("tests/T.gs", Category::Tests, text),
        ];
        let report = pipeline().run(&[CheckId::Heuristics], &load(docs));
        let heuristics = report.check(CheckId::Heuristics).unwrap();
        assert_eq!(heuristics.findings.len(), 1);
        assert_eq!(heuristics.findings[0].locator.file, "server/S.gs");
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_byte_order_mark_file_is_still_analyzed() {
        let menu = "function onOpen() {\n  ui.addItem('Run', 'runReport');\n}\n";
        let docs = vec![
            Document::new("client/Menu.gs", Category::Client, menu),
            Document::from_bytes(
                "client/Report.gs",
                Category::Client,
                "\u{feff}function runReport() {}\n".as_bytes(),
            ),
            Document::from_bytes("server/Merge.gs", Category::Server, "\u{feff}<<<<<<< HEAD\n".as_bytes()),
        ];
        let report = pipeline().run(&[CheckId::Symbols, CheckId::Patterns], &load(docs));

        let symbols = report.check(CheckId::Symbols).unwrap();
        assert_eq!(symbols.failed, 0);
        assert!(!symbols.has_defects());

        let conflicts: Vec<_> = report
            .check(CheckId::Patterns)
            .unwrap()
            .findings
            .iter()
            .filter(|f| f.kind == FindingKind::ConflictMarker)
            .map(|f| (f.locator.file.as_str(), f.locator.line))
            .collect();
        assert_eq!(conflicts, vec![("server/Merge.gs", 1)]);
    }

    #[test]
    fn test_encoding_warnings_do_not_fail() {
        let docs = vec![Document::new("client/B.gs", Category::Client, "\u{feff}var a = 1;")];
        let report = pipeline().run(&[CheckId::Encoding], &load(docs));
        let encoding = report.check(CheckId::Encoding).unwrap();
        assert_eq!(encoding.failed, 1);
        assert_eq!(encoding.findings[0].kind, FindingKind::Encoding);
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_invalid_binding_pattern_is_fatal() {
        let mut config = PreflightConfig::default();
        config.symbols.binding_pattern = Some("(".to_string());
        let err = Preflight::from_config("/project", &config).err().unwrap();
        assert!(matches!(err, PipelineError::Pattern(_)));
    }

    #[test]
    fn test_balance_findings_carry_their_own_snippets() {
        let docs = vec![
            Document::new("a.gs", Category::Other, "ok();\nfirst());\n"),
            Document::new("b.gs", Category::Other, "second());\n"),
        ];
        let report = pipeline().run(&[CheckId::Balance], &load(docs));
        let snippets: Vec<_> = report
            .findings()
            .map(|f| (f.locator.file.as_str(), f.snippet.as_deref()))
            .collect();
        assert_eq!(
            snippets,
            vec![("a.gs", Some("first());")), ("b.gs", Some("second());"))]
        );
    }

    #[test]
    fn test_checks_keep_requested_order() {
        let report = pipeline().run(
            &[CheckId::Patterns, CheckId::Balance],
            &load(vec![Document::new("a.gs", Category::Other, "x();")]),
        );
        let ids: Vec<_> = report.checks.iter().map(|c| c.check).collect();
        assert_eq!(ids, vec![CheckId::Patterns, CheckId::Balance]);
    }
}
