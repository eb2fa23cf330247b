//! Pattern scanner types.

use serde::Serialize;

use crate::diagnostics::Severity;

/// What kind of pattern a rule looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternCategory {
    /// Unresolved merge-conflict markers
    ConflictMarker,
    /// Disallowed identifiers such as a removed logging object
    ForbiddenReference,
    /// `return null`, `return undefined`, bare `return;`
    SuspiciousReturn,
}

impl PatternCategory {
    pub fn name(self) -> &'static str {
        match self {
            PatternCategory::ConflictMarker => "conflict_marker",
            PatternCategory::ForbiddenReference => "forbidden_reference",
            PatternCategory::SuspiciousReturn => "suspicious_return",
        }
    }
}

/// Which lines or spans a rule ignores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextExclusion {
    /// Every line is eligible.
    None,
    /// Lines whose trimmed text opens with a comment marker, and lines
    /// inside a block comment.
    #[default]
    CommentLines,
    /// Comment lines plus any match starting inside a comment or string literal.
    CommentsAndStrings,
}

/// One rule hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternMatch {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub matched_text: String,
    pub category: PatternCategory,
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub snippet: String,
}

/// All matches over a document set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatternScanReport {
    pub files_scanned: usize,
    /// Matches in document order, then line order
    pub matches: Vec<PatternMatch>,
}

impl PatternScanReport {
    /// Number of distinct files with at least one match.
    pub fn files_with_matches(&self) -> usize {
        let mut files: Vec<&str> = self.matches.iter().map(|m| m.file.as_str()).collect();
        files.dedup();
        files.len()
    }
}
