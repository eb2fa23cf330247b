//! Stack-based delimiter matching.

use rayon::prelude::*;

use super::types::*;
use crate::diagnostics::{Finding, FindingKind, Locator, Severity};
use crate::lexer::{LexContext, LexicalScanner};
use crate::scanner::Document;

/// Matches delimiter pairs and localizes every unmatched marker.
#[derive(Debug, Clone)]
pub struct BalanceChecker {
    pairs: Vec<DelimiterPair>,
    mode: BalanceMode,
    line_threshold: u32,
}

impl Default for BalanceChecker {
    fn default() -> Self {
        Self::new(vec![DelimiterPair::Paren, DelimiterPair::Brace])
    }
}

impl BalanceChecker {
    pub fn new(pairs: Vec<DelimiterPair>) -> Self {
        Self {
            pairs,
            mode: BalanceMode::Raw,
            line_threshold: 1,
        }
    }

    pub fn with_mode(mut self, mode: BalanceMode) -> Self {
        self.mode = mode;
        self
    }

    /// Lines whose |opens - closes| exceeds `threshold` get a line warning.
    pub fn with_line_threshold(mut self, threshold: u32) -> Self {
        self.line_threshold = threshold;
        self
    }

    pub fn pairs(&self) -> &[DelimiterPair] {
        &self.pairs
    }

    /// Scan one document for one pair.
    pub fn check_balance(&self, doc: &Document, pair: DelimiterPair) -> BalanceReport {
        let (open, close) = (pair.open(), pair.close());
        let mut stack: Vec<DelimiterEvent> = Vec::new();
        let mut unmatched_closes = Vec::new();
        let mut line_warnings = Vec::new();
        let mut open_count = 0u32;
        let mut close_count = 0u32;
        let mut lexer = LexicalScanner::new();

        for (idx, line) in doc.lines.iter().enumerate() {
            let line_no = (idx + 1) as u32;
            let mut opens = 0u32;
            let mut closes = 0u32;

            let mut on_char = |col: usize, c: char| {
                if c == open {
                    opens += 1;
                    stack.push(DelimiterEvent {
                        kind: DelimiterKind::Open,
                        line: line_no,
                        column: (col + 1) as u32,
                    });
                } else if c == close {
                    closes += 1;
                    if stack.pop().is_none() {
                        unmatched_closes.push(DelimiterEvent {
                            kind: DelimiterKind::Close,
                            line: line_no,
                            column: (col + 1) as u32,
                        });
                    }
                }
            };

            match self.mode {
                BalanceMode::Raw => {
                    for (col, c) in line.chars().enumerate() {
                        on_char(col, c);
                    }
                }
                BalanceMode::Lexical => {
                    lexer.scan_line(line, |col, c, ctx| {
                        if ctx == LexContext::Code {
                            on_char(col, c);
                        }
                    });
                }
            }

            open_count += opens;
            close_count += closes;
            let delta = i64::from(opens) - i64::from(closes);
            if delta.unsigned_abs() > u64::from(self.line_threshold) {
                line_warnings.push(LineImbalance {
                    line: line_no,
                    opens,
                    closes,
                    delta,
                    snippet: line.trim().to_string(),
                });
            }
        }

        BalanceReport {
            file: doc.path.clone(),
            pair,
            open_count,
            close_count,
            unmatched_opens: stack,
            unmatched_closes,
            line_warnings,
        }
    }

    /// Every configured pair for one document.
    pub fn check_document(&self, doc: &Document) -> Vec<BalanceReport> {
        self.pairs
            .iter()
            .map(|pair| self.check_balance(doc, *pair))
            .collect()
    }

    /// Every configured pair for every document, in document order.
    pub fn check_all(&self, docs: &[Document]) -> Vec<BalanceReport> {
        let reports: Vec<BalanceReport> = docs
            .par_iter()
            .flat_map_iter(|doc| self.check_document(doc))
            .collect();
        let unbalanced = reports.iter().filter(|r| !r.is_balanced()).count();
        tracing::info!(
            documents = docs.len(),
            reports = reports.len(),
            unbalanced,
            mode = ?self.mode,
            "balance check complete"
        );
        reports
    }
}

/// Findings for a balance report: unmatched markers are defects,
/// line imbalances are warnings.
pub fn balance_findings(report: &BalanceReport, doc: Option<&Document>) -> Vec<Finding> {
    let snippet = |line: u32| doc.map(|d| d.snippet(line).to_string()).unwrap_or_default();
    let mut findings = Vec::new();

    for event in &report.unmatched_closes {
        findings.push(
            Finding::new(
                FindingKind::UnmatchedClose,
                Severity::Defect,
                Locator::at(&report.file, event.line, event.column),
                format!("unmatched '{}'", report.pair.close()),
            )
            .with_snippet(snippet(event.line)),
        );
    }
    for event in &report.unmatched_opens {
        findings.push(
            Finding::new(
                FindingKind::UnmatchedOpen,
                Severity::Defect,
                Locator::at(&report.file, event.line, event.column),
                format!("'{}' is never closed", report.pair.open()),
            )
            .with_snippet(snippet(event.line)),
        );
    }
    for warning in &report.line_warnings {
        findings.push(
            Finding::new(
                FindingKind::LineImbalance,
                Severity::Warning,
                Locator::line(&report.file, warning.line),
                format!(
                    "line has {} '{}' and {} '{}' (net {:+})",
                    warning.opens,
                    report.pair.open(),
                    warning.closes,
                    report.pair.close(),
                    warning.delta
                ),
            )
            .with_snippet(warning.snippet.clone()),
        );
    }
    findings
}
