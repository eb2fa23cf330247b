//! Run and per-check report data.

use std::fmt;

use serde::Serialize;

use crate::diagnostics::{Finding, Severity};
use crate::scanner::LoadFailure;
use crate::structure::StructureReport;

/// Identifies one check in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckId {
    Encoding,
    Balance,
    Symbols,
    Patterns,
    Heuristics,
}

impl CheckId {
    pub const ALL: [CheckId; 5] = [
        CheckId::Encoding,
        CheckId::Balance,
        CheckId::Symbols,
        CheckId::Patterns,
        CheckId::Heuristics,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CheckId::Encoding => "encoding",
            CheckId::Balance => "balance",
            CheckId::Symbols => "symbols",
            CheckId::Patterns => "patterns",
            CheckId::Heuristics => "heuristics",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CheckId::Encoding => "byte-order marks, control characters, invalid UTF-8",
            CheckId::Balance => "matched delimiters",
            CheckId::Symbols => "bindings resolve to declared functions",
            CheckId::Patterns => "conflict markers and forbidden patterns",
            CheckId::Heuristics => "input validation and error handling (advisory)",
        }
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Counts plus typed findings for one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub check: CheckId,
    /// Units inspected (documents, references, functions and call sites)
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub findings: Vec<Finding>,
}

impl CheckReport {
    pub fn new(check: CheckId, total: usize, failed: usize, findings: Vec<Finding>) -> Self {
        Self {
            check,
            total,
            passed: total.saturating_sub(failed),
            failed,
            findings,
        }
    }

    pub fn has_defects(&self) -> bool {
        self.findings.iter().any(Finding::is_blocking)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Passed,
    Failed,
}

/// Everything one validation run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub root: String,
    pub status: RunStatus,
    pub documents: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub load_failures: Vec<LoadFailure>,
    pub checks: Vec<CheckReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure: Option<StructureReport>,
}

impl RunReport {
    pub fn new(
        root: impl Into<String>,
        documents: usize,
        load_failures: Vec<LoadFailure>,
        checks: Vec<CheckReport>,
    ) -> Self {
        let status = if checks.iter().any(CheckReport::has_defects) {
            RunStatus::Failed
        } else {
            RunStatus::Passed
        };
        Self {
            root: root.into(),
            status,
            documents,
            load_failures,
            checks,
            structure: None,
        }
    }

    pub fn with_structure(mut self, structure: StructureReport) -> Self {
        self.structure = Some(structure);
        self
    }

    /// `Failed` iff any finding is a defect.
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// 0 when no blocking defects were found, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self.status {
            RunStatus::Passed => 0,
            RunStatus::Failed => 1,
        }
    }

    pub fn check(&self, id: CheckId) -> Option<&CheckReport> {
        self.checks.iter().find(|c| c.check == id)
    }

    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.checks.iter().flat_map(|c| c.findings.iter())
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings().filter(|f| f.severity == severity).count()
    }
}
