//! Reporters: output formats for run reports.

pub mod console;
pub mod json;

use preflight_core::errors::ReportError;

use crate::enforcement::report::RunReport;

/// Renders a run report. Reporters never print; callers decide where the
/// text goes.
pub trait Reporter: Send + Sync {
    fn name(&self) -> &'static str;
    fn generate(&self, report: &RunReport) -> Result<String, ReportError>;
}

/// Create a reporter by format name.
pub fn create_reporter(format: &str) -> Result<Box<dyn Reporter>, ReportError> {
    match format {
        "console" => Ok(Box::new(console::ConsoleReporter::default())),
        "json" => Ok(Box::new(json::JsonReporter)),
        other => Err(ReportError::UnknownFormat(other.to_string())),
    }
}

/// List all available reporter format names.
pub fn available_formats() -> &'static [&'static str] {
    &["console", "json"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_format_is_constructible() {
        for format in available_formats() {
            let reporter = create_reporter(format).unwrap();
            assert_eq!(reporter.name(), *format);
        }
    }

    #[test]
    fn test_unknown_format() {
        assert!(matches!(
            create_reporter("sarif"),
            Err(ReportError::UnknownFormat(f)) if f == "sarif"
        ));
    }
}
