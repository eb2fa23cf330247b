//! Windowed call-site heuristics.
//!
//! Both checks look at syntactic proximity only. A guard two lines past the
//! window, or a try block opened in a caller, is invisible to them.

use std::sync::LazyLock;

use aho_corasick::{AhoCorasick, MatchKind};
use preflight_core::config::HeuristicsConfig;
use preflight_core::errors::PatternError;
use rayon::prelude::*;
use regex::Regex;

use super::types::*;
use crate::diagnostics::{Finding, FindingKind, Locator, Severity};
use crate::lexer::{has_comment_prefix, line_start_contexts, LexContext};
use crate::scanner::Document;

static RE_DECLARATION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^function\s+([A-Za-z_$][\w$]*)\s*\(([^)]*)").ok());

static RE_NEGATED_GUARD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"if\s*\(\s*!").ok());

static RE_PROTECTIVE_SCOPE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"try\s*\{|catch\s*[({]").ok());

static RE_PARAMETER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\.\.\.)?([A-Za-z_$][\w$]*)").ok());

/// Guard lookup after function declarations.
#[derive(Debug, Clone)]
pub struct ValidationHeuristic {
    /// Lines after the declaration to inspect
    pub window: usize,
    pub mode: ValidationMode,
}

/// Protective-scope lookup around risky calls.
#[derive(Debug, Clone)]
pub struct ErrorHandlingHeuristic {
    /// Lines before and after the call to inspect
    pub window: usize,
    names: Vec<String>,
    matcher: AhoCorasick,
}

impl ErrorHandlingHeuristic {
    pub fn new(window: usize, names: Vec<String>) -> Result<Self, PatternError> {
        if names.iter().any(|n| n.trim().is_empty()) {
            return Err(PatternError::InvalidNameSet(
                "risky function names must not be empty".to_string(),
            ));
        }
        let matcher = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&names)
            .map_err(|e| PatternError::InvalidNameSet(e.to_string()))?;
        Ok(Self {
            window,
            names,
            matcher,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// First risky call on a line: name at an identifier boundary followed
    /// by `(`, not the name's own declaration.
    fn risky_call<'a>(&'a self, line: &str) -> Option<&'a str> {
        self.matcher.find_iter(line).find_map(|m| {
            let before = &line[..m.start()];
            let after = line[m.end()..].trim_start();
            let boundary = before.chars().next_back().map_or(true, |c| !is_ident_char(c));
            let declaration = before.trim_end().ends_with("function");
            (boundary && after.starts_with('(') && !declaration)
                .then(|| self.names[m.pattern().as_usize()].as_str())
        })
    }
}

/// The heuristics to run. Either may be disabled.
#[derive(Debug, Clone, Default)]
pub struct HeuristicSet {
    pub validation: Option<ValidationHeuristic>,
    pub error_handling: Option<ErrorHandlingHeuristic>,
}

impl HeuristicSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validation(mut self, window: usize, mode: ValidationMode) -> Self {
        self.validation = Some(ValidationHeuristic { window, mode });
        self
    }

    pub fn with_error_handling(
        mut self,
        window: usize,
        risky: Vec<String>,
    ) -> Result<Self, PatternError> {
        self.error_handling = Some(ErrorHandlingHeuristic::new(window, risky)?);
        Ok(self)
    }

    pub fn from_config(config: &HeuristicsConfig) -> Result<Self, PatternError> {
        let mode = ValidationMode::from_name(config.effective_validation_mode()).unwrap_or_default();
        let set = Self::new().with_validation(config.effective_validation_window(), mode);
        let risky = config.effective_risky_functions();
        if risky.is_empty() {
            return Ok(set);
        }
        set.with_error_handling(config.effective_error_handling_window(), risky)
    }
}

#[derive(Default)]
struct DocumentOutcome {
    findings: Vec<HeuristicFinding>,
    functions: usize,
    calls: usize,
}

/// Runs a `HeuristicSet` over documents.
#[derive(Debug, Clone)]
pub struct HeuristicAnalyzer {
    set: HeuristicSet,
}

impl HeuristicAnalyzer {
    pub fn new(set: HeuristicSet) -> Self {
        Self { set }
    }

    pub fn analyze(&self, docs: &[Document]) -> HeuristicReport {
        let outcomes: Vec<DocumentOutcome> =
            docs.par_iter().map(|doc| self.analyze_document(doc)).collect();

        let mut report = HeuristicReport {
            files_analyzed: docs.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            report.functions_inspected += outcome.functions;
            report.call_sites_inspected += outcome.calls;
            report.findings.extend(outcome.findings);
        }
        tracing::info!(
            files = report.files_analyzed,
            functions = report.functions_inspected,
            call_sites = report.call_sites_inspected,
            findings = report.findings.len(),
            "heuristic analysis complete"
        );
        report
    }

    /// Findings for one document, in line order.
    pub fn analyze_one(&self, doc: &Document) -> Vec<HeuristicFinding> {
        self.analyze_document(doc).findings
    }

    fn analyze_document(&self, doc: &Document) -> DocumentOutcome {
        let mut outcome = DocumentOutcome::default();
        let starts = line_start_contexts(&doc.lines);

        for (idx, line) in doc.lines.iter().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let in_comment = has_comment_prefix(trimmed)
                || starts.get(idx).copied() == Some(LexContext::BlockComment);

            if in_comment {
                continue;
            }

            if let Some(validation) = &self.set.validation {
                if let Some(finding) = check_validation(validation, doc, idx, trimmed, &mut outcome) {
                    outcome.findings.push(finding);
                }
            }

            if let Some(handling) = &self.set.error_handling {
                if let Some(name) = handling.risky_call(trimmed) {
                    outcome.calls += 1;
                    let from = idx.saturating_sub(handling.window);
                    let to = idx.saturating_add(handling.window).min(doc.lines.len() - 1);
                    if !window_matches(&doc.lines[from..=to], RE_PROTECTIVE_SCOPE.as_ref()) {
                        outcome.findings.push(HeuristicFinding {
                            file: doc.path.clone(),
                            line: (idx + 1) as u32,
                            kind: HeuristicKind::MissingErrorHandling,
                            function: Some(name.to_string()),
                            snippet: trimmed.to_string(),
                        });
                    }
                }
            }
        }

        outcome
    }
}

fn check_validation(
    validation: &ValidationHeuristic,
    doc: &Document,
    idx: usize,
    trimmed: &str,
    outcome: &mut DocumentOutcome,
) -> Option<HeuristicFinding> {
    if trimmed.contains("//") {
        return None;
    }
    let caps = RE_DECLARATION.as_ref()?.captures(trimmed)?;
    let name = caps.get(1)?.as_str();
    let params = parameter_names(caps.get(2).map_or("", |m| m.as_str()));

    if validation.mode == ValidationMode::ParameterAware && params.is_empty() {
        return None;
    }
    outcome.functions += 1;

    let from = (idx + 1).min(doc.lines.len());
    let to = (idx + 1).saturating_add(validation.window).min(doc.lines.len());
    let window = &doc.lines[from..to];

    let guarded = match validation.mode {
        ValidationMode::AnyNegation => window_matches(window, RE_NEGATED_GUARD.as_ref()),
        ValidationMode::ParameterAware => params.iter().any(|p| {
            parameter_guard(p).is_some_and(|guard| window_matches(window, Some(&guard)))
        }),
    };
    if guarded {
        return None;
    }
    Some(HeuristicFinding {
        file: doc.path.clone(),
        line: (idx + 1) as u32,
        kind: HeuristicKind::MissingValidation,
        function: Some(name.to_string()),
        snippet: trimmed.to_string(),
    })
}

fn window_matches(lines: &[String], pattern: Option<&Regex>) -> bool {
    match pattern {
        Some(re) => lines.iter().any(|l| re.is_match(l)),
        None => true,
    }
}

/// Plain parameter names from a declaration's parameter list text.
fn parameter_names(list: &str) -> Vec<String> {
    let Some(re) = RE_PARAMETER.as_ref() else {
        return Vec::new();
    };
    list.split(',')
        .filter_map(|part| re.captures(part))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// A conditional that tests `param` for absence or type.
fn parameter_guard(param: &str) -> Option<Regex> {
    let p = regex::escape(param);
    let pattern = format!(
        r"if\s*\(.*(?:!\s*{p}\b|\b{p}\s*[=!]==?\s*(?:null|undefined)\b|typeof\s+{p}\b)"
    );
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(param, error = %e, "cannot build parameter guard");
            None
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Heuristic findings are always advisory warnings.
pub fn heuristic_findings(report: &HeuristicReport) -> Vec<Finding> {
    report
        .findings
        .iter()
        .map(|h| {
            let kind = match h.kind {
                HeuristicKind::MissingValidation => FindingKind::MissingValidation,
                HeuristicKind::MissingErrorHandling => FindingKind::MissingErrorHandling,
            };
            Finding::new(kind, Severity::Warning, Locator::line(&h.file, h.line), h.message())
                .with_snippet(h.snippet.clone())
        })
        .collect()
}
