//! JSON reporter: the run report as pretty-printed serde_json.

use preflight_core::errors::ReportError;

use super::Reporter;
use crate::enforcement::report::RunReport;

pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn generate(&self, report: &RunReport) -> Result<String, ReportError> {
        serde_json::to_string_pretty(report).map_err(|e| ReportError::Serialization(e.to_string()))
    }
}
