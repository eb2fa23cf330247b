//! Line-oriented pattern scanning with comment/string awareness.

use rayon::prelude::*;

use super::rules::{PatternRule, PatternSet};
use super::types::*;
use crate::diagnostics::{Finding, FindingKind, Locator};
use crate::lexer::{has_comment_prefix, LexContext, LexicalScanner};
use crate::scanner::Document;

/// Applies a `PatternSet` to documents.
#[derive(Debug, Clone)]
pub struct PatternScanner {
    set: PatternSet,
}

impl PatternScanner {
    pub fn new(set: PatternSet) -> Self {
        Self { set }
    }

    pub fn pattern_set(&self) -> &PatternSet {
        &self.set
    }

    /// Scan every document. Matches keep document order.
    pub fn scan(&self, docs: &[Document]) -> PatternScanReport {
        let per_doc: Vec<Vec<PatternMatch>> =
            docs.par_iter().map(|doc| self.scan_document(doc)).collect();
        let report = PatternScanReport {
            files_scanned: docs.len(),
            matches: per_doc.into_iter().flatten().collect(),
        };
        tracing::info!(
            files = report.files_scanned,
            matches = report.matches.len(),
            rules = self.set.len(),
            "pattern scan complete"
        );
        report
    }

    pub fn scan_document(&self, doc: &Document) -> Vec<PatternMatch> {
        let rules: Vec<&PatternRule> = self
            .set
            .rules()
            .iter()
            .filter(|rule| !rule.is_exempt(doc))
            .collect();
        if rules.is_empty() {
            return Vec::new();
        }

        let mut lexer = LexicalScanner::new();
        let mut matches = Vec::new();

        for (idx, line) in doc.lines.iter().enumerate() {
            let starts_in = lexer.state();
            let mut contexts = Vec::with_capacity(line.len());
            lexer.scan_line(line, |_, _, ctx| contexts.push(ctx));

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let comment_line = has_comment_prefix(trimmed) || starts_in == LexContext::BlockComment;
            let indent = line.chars().take_while(|c| c.is_whitespace()).count();

            for rule in &rules {
                if rule.exclusion != ContextExclusion::None && comment_line {
                    continue;
                }
                for found in rule.matcher.find_iter(trimmed) {
                    let char_idx = indent + trimmed[..found.start()].chars().count();
                    if rule.exclusion == ContextExclusion::CommentsAndStrings {
                        let ctx = contexts.get(char_idx).copied().unwrap_or(LexContext::Code);
                        if ctx != LexContext::Code {
                            continue;
                        }
                    }
                    matches.push(PatternMatch {
                        file: doc.path.clone(),
                        line: (idx + 1) as u32,
                        column: (char_idx + 1) as u32,
                        matched_text: found.as_str().to_string(),
                        category: rule.category,
                        rule_id: rule.id.clone(),
                        severity: rule.severity,
                        message: rule.message.clone(),
                        snippet: trimmed.to_string(),
                    });
                }
            }
        }

        if !matches.is_empty() {
            tracing::debug!(path = %doc.path, matches = matches.len(), "pattern matches");
        }
        matches
    }
}

/// One finding per match, severity taken from the rule.
pub fn pattern_findings(report: &PatternScanReport) -> Vec<Finding> {
    report
        .matches
        .iter()
        .map(|m| {
            let kind = match m.category {
                PatternCategory::ConflictMarker => FindingKind::ConflictMarker,
                PatternCategory::ForbiddenReference => FindingKind::ForbiddenReference,
                PatternCategory::SuspiciousReturn => FindingKind::SuspiciousReturn,
            };
            Finding::new(
                kind,
                m.severity,
                Locator::at(&m.file, m.line, m.column),
                format!("{} [{}]", m.message, m.rule_id),
            )
            .with_snippet(m.snippet.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::scanner::Category;
    use preflight_core::config::PatternsConfig;

    fn scan(text: &str) -> Vec<PatternMatch> {
        let doc = Document::new("server/Api.gs", Category::Server, text);
        PatternScanner::new(PatternSet::builtin()).scan_document(&doc)
    }

    fn conflicts(text: &str) -> usize {
        scan(text)
            .iter()
            .filter(|m| m.category == PatternCategory::ConflictMarker)
            .count()
    }

    #[test]
    fn test_marker_in_line_comment_is_ignored() {
        assert_eq!(conflicts("// <<<<<<< example"), 0);
    }

    #[test]
    fn test_marker_at_column_zero_is_reported() {
        let matches = scan("<<<<<<< HEAD");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].category, PatternCategory::ConflictMarker);
        assert_eq!((matches[0].line, matches[0].column), (1, 1));
        assert_eq!(matches[0].matched_text, "<<<<<<<");
        assert_eq!(matches[0].severity, Severity::Defect);
    }

    #[test]
    fn test_full_conflict_block() {
        let text = "var a = 1;\n<<<<<<< HEAD\nvar b = 2;\n=======\nvar b = 3;\n>>>>>>> feature\n";
        let lines: Vec<u32> = scan(text).iter().map(|m| m.line).collect();
        assert_eq!(lines, vec![2, 4, 6]);
    }

    #[test]
    fn test_markers_inside_block_comment_and_template_are_ignored() {
        let text = "/*\n<<<<<<< documented\n*/\nvar help = `\n=======\n`;\n";
        assert_eq!(conflicts(text), 0);
    }

    #[test]
    fn test_indented_marker_reports_real_column() {
        let matches = scan("  >>>>>>> branch");
        assert_eq!(matches[0].column, 3);
    }

    #[test]
    fn test_suspicious_returns_skip_comment_lines() {
        let text = "function f() {\n  // return null;\n  return null;\n  return;\n}\n";
        let returns: Vec<u32> = scan(text)
            .iter()
            .filter(|m| m.category == PatternCategory::SuspiciousReturn)
            .map(|m| m.line)
            .collect();
        assert_eq!(returns, vec![3, 4]);
    }

    #[test]
    fn test_forbidden_logger_respects_context_and_exemptions() {
        let set = PatternSet::from_config(&PatternsConfig::default()).unwrap();
        let scanner = PatternScanner::new(set);
        let text = "logger.log('x');\nLogger.log('y');\nvar s = 'logger.z';\nfoo(); // logger.w\n";

        let live = Document::new("server/Api.gs", Category::Server, text);
        let hits: Vec<_> = scanner
            .scan_document(&live)
            .into_iter()
            .filter(|m| m.category == PatternCategory::ForbiddenReference)
            .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].line, 1);
        assert_eq!(hits[0].severity, Severity::Warning);

        let archived = Document::new("server/archive/Old.gs", Category::Server, text);
        assert!(scanner.scan_document(&archived).is_empty());
        let test = Document::new("tests/T.gs", Category::Tests, text);
        assert!(scanner.scan_document(&test).is_empty());
    }

    #[test]
    fn test_scan_report_and_findings() {
        let docs = vec![
            Document::new("a.gs", Category::Client, "<<<<<<< HEAD\n"),
            Document::new("b.gs", Category::Client, "return null;\n"),
        ];
        let report = PatternScanner::new(PatternSet::builtin()).scan(&docs);
        assert_eq!(report.files_scanned, 2);
        assert_eq!(report.files_with_matches(), 2);

        let findings = pattern_findings(&report);
        assert_eq!(findings[0].kind, FindingKind::ConflictMarker);
        assert!(findings[0].is_blocking());
        assert_eq!(findings[1].kind, FindingKind::SuspiciousReturn);
        assert!(!findings[1].is_blocking());
    }

    #[test]
    fn test_scan_is_idempotent() {
        let docs = vec![Document::new("a.gs", Category::Client, "=======\nreturn undefined;\n")];
        let scanner = PatternScanner::new(PatternSet::builtin());
        let first = serde_json::to_string(&scanner.scan(&docs)).unwrap();
        let second = serde_json::to_string(&scanner.scan(&docs)).unwrap();
        assert_eq!(first, second);
    }
}
