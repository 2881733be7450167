//! JSON reporter
//!
//! Outputs the full QualityReport as pretty-printed JSON.
//! The report carries no timestamp, so unchanged input gives identical output.

use crate::models::QualityReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &QualityReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
