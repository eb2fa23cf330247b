//! Console reporter: human-readable output with optional color codes.

use std::fmt::Write as _;

use preflight_core::errors::ReportError;

use super::Reporter;
use crate::diagnostics::Severity;
use crate::enforcement::report::{CheckReport, RunReport, RunStatus};

/// Console reporter for human-readable terminal output.
pub struct ConsoleReporter {
    pub use_color: bool,
    /// Show informational findings (unused symbols)
    pub show_info: bool,
}

impl ConsoleReporter {
    pub fn new(use_color: bool) -> Self {
        Self {
            use_color,
            show_info: true,
        }
    }

    fn status_symbol(&self, check: &CheckReport) -> &'static str {
        if check.has_defects() {
            "✗"
        } else if check.findings.iter().any(|f| f.severity == Severity::Warning) {
            "⚠"
        } else {
            "✓"
        }
    }

    fn color_start(&self, severity: Severity) -> &'static str {
        if !self.use_color {
            return "";
        }
        match severity {
            Severity::Defect => "\x1b[31m",  // red
            Severity::Warning => "\x1b[33m", // yellow
            Severity::Info => "\x1b[36m",    // cyan
        }
    }

    fn color_end(&self) -> &'static str {
        if self.use_color {
            "\x1b[0m"
        } else {
            ""
        }
    }

    fn write_report(&self, report: &RunReport, out: &mut String) -> std::fmt::Result {
        writeln!(out, "Preflight report for {}", report.root)?;
        writeln!(out, "{} document(s) loaded", report.documents)?;
        for failure in &report.load_failures {
            writeln!(out, "  unreadable: {}: {}", failure.path, failure.message)?;
        }
        writeln!(out)?;

        for check in &report.checks {
            writeln!(
                out,
                "{} {} ({}): {}/{} passed",
                self.status_symbol(check),
                check.check,
                check.check.description(),
                check.passed,
                check.total
            )?;
            for finding in &check.findings {
                if finding.severity == Severity::Info && !self.show_info {
                    continue;
                }
                writeln!(
                    out,
                    "  {}{}{}: {}: {}",
                    self.color_start(finding.severity),
                    finding.severity.label(),
                    self.color_end(),
                    finding.locator,
                    finding.message
                )?;
                if let Some(snippet) = &finding.snippet {
                    writeln!(out, "      | {snippet}")?;
                }
            }
            writeln!(out)?;
        }

        if let Some(structure) = &report.structure {
            writeln!(out, "{:<10} {:>7} {:>10} {:>8}", "category", "files", "functions", "lines")?;
            for entry in &structure.categories {
                writeln!(
                    out,
                    "{:<10} {:>7} {:>10} {:>8}",
                    entry.category.name(),
                    entry.stats.files,
                    entry.stats.functions,
                    entry.stats.lines
                )?;
            }
            writeln!(
                out,
                "{:<10} {:>7} {:>10} {:>8}",
                "total", structure.total.files, structure.total.functions, structure.total.lines
            )?;
            writeln!(out)?;
        }

        writeln!(
            out,
            "─── Summary: {} defect(s), {} warning(s), {} info ───",
            report.count(Severity::Defect),
            report.count(Severity::Warning),
            report.count(Severity::Info)
        )?;
        match report.status() {
            RunStatus::Passed => writeln!(out, "Result: PASSED ✓"),
            RunStatus::Failed => writeln!(out, "Result: FAILED ✗"),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Reporter for ConsoleReporter {
    fn name(&self) -> &'static str {
        "console"
    }

    fn generate(&self, report: &RunReport) -> Result<String, ReportError> {
        let mut output = String::new();
        self.write_report(report, &mut output)
            .map_err(|e| ReportError::Serialization(e.to_string()))?;
        Ok(output)
    }
}
