//! Shared diagnostic types.
//!
//! Every finding carries a `Locator`. Line 0 addresses a file as a whole
//! (used only when the file itself is absent).

use std::fmt;

use serde::Serialize;

/// How a finding affects the run outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Structural defect: fails the run
    Defect,
    /// Advisory finding worth a human look
    Warning,
    /// Informational only
    Info,
}

impl Severity {
    pub fn is_blocking(self) -> bool {
        matches!(self, Severity::Defect)
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Defect => "defect",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// What a finding reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    UnmatchedOpen,
    UnmatchedClose,
    LineImbalance,
    MissingSymbol,
    MissingBindingDocument,
    UnusedSymbol,
    ConflictMarker,
    ForbiddenReference,
    SuspiciousReturn,
    MissingValidation,
    MissingErrorHandling,
    Encoding,
}

impl FindingKind {
    pub fn name(self) -> &'static str {
        match self {
            FindingKind::UnmatchedOpen => "unmatched_open",
            FindingKind::UnmatchedClose => "unmatched_close",
            FindingKind::LineImbalance => "line_imbalance",
            FindingKind::MissingSymbol => "missing_symbol",
            FindingKind::MissingBindingDocument => "missing_binding_document",
            FindingKind::UnusedSymbol => "unused_symbol",
            FindingKind::ConflictMarker => "conflict_marker",
            FindingKind::ForbiddenReference => "forbidden_reference",
            FindingKind::SuspiciousReturn => "suspicious_return",
            FindingKind::MissingValidation => "missing_validation",
            FindingKind::MissingErrorHandling => "missing_error_handling",
            FindingKind::Encoding => "encoding",
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// (document, line[, column]) address of a finding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Locator {
    pub file: String,
    /// 1-based line
    pub line: u32,
    /// 1-based column, when the check resolves one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl Locator {
    pub fn line(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column: None,
        }
    }

    pub fn at(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column: Some(column),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(col) => write!(f, "{}:{}:{}", self.file, self.line, col),
            None => write!(f, "{}:{}", self.file, self.line),
        }
    }
}

/// One diagnostic in a check report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    pub locator: Locator,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl Finding {
    pub fn new(
        kind: FindingKind,
        severity: Severity,
        locator: Locator,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            locator,
            message: message.into(),
            snippet: None,
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        let snippet = snippet.into();
        if !snippet.is_empty() {
            self.snippet = Some(truncate(&snippet, 80));
        }
        self
    }

    pub fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }
}

/// Truncate to at most `max` characters on a char boundary.
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
