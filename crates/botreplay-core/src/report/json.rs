//! JSON report generation

use anyhow::Result;

use super::ReplayReport;

/// JSON report generator
pub struct JsonReporter;

impl JsonReporter {
    pub fn generate(report: &ReplayReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}
