//! Output reporters for pyquality analysis results
//!
//! Supports two output formats:
//! - `text` - Terminal output with ANSI colors
//! - `json` - Machine-readable JSON (the serialized `QualityReport`)

mod json;
mod text;

use crate::models::QualityReport;
use anyhow::{anyhow, Result};
use std::str::FromStr;

pub use text::TextOptions;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render a quality report using an OutputFormat enum
pub fn report_with_format(report: &QualityReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report, &TextOptions::default()),
        OutputFormat::Json => json::render(report),
    }
}

/// Render as text with explicit options (color, timestamp)
pub fn render_text(report: &QualityReport, options: &TextOptions) -> Result<String> {
    text::render(report, options)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Create a small QualityReport for testing
    pub(crate) fn test_report() -> QualityReport {
        use crate::models::{FileSummary, Issue, IssueKind, Metrics, Severity, Summary};
        use std::path::PathBuf;

        let issues = vec![
            Issue::new(
                "proj/app.py",
                3,
                IssueKind::NamingConvention,
                Severity::Warning,
                "Function 'doThing' should use snake_case naming",
            )
            .with_suggestion("Rename function to use snake_case (e.g., 'my_function')"),
            Issue::new(
                "proj/broken.py",
                1,
                IssueKind::SyntaxError,
                Severity::Error,
                "Syntax error: invalid syntax",
            ),
        ];
        let metrics = Metrics {
            lines_of_code: 40,
            comment_lines: 4,
            blank_lines: 6,
            function_count: 3,
            class_count: 1,
            complexity: 5,
            maintainability_index: 61.5,
        };

        QualityReport {
            project_path: PathBuf::from("proj"),
            total_files: 2,
            total_issues: issues.len(),
            metrics,
            summary: Summary::count(&issues, 85.0),
            files: vec![
                FileSummary {
                    path: PathBuf::from("proj/app.py"),
                    issues: 1,
                    metrics,
                    quality_score: 88.0,
                },
                FileSummary {
                    path: PathBuf::from("proj/broken.py"),
                    issues: 1,
                    metrics: Metrics::default(),
                    quality_score: 47.0,
                },
            ],
            issues,
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("sarif").is_err());
    }

    #[test]
    fn test_report_dispatches_by_format() {
        let report = test_report();
        let json = report_with_format(&report, OutputFormat::Json).expect("render json");
        assert!(json.trim_start().starts_with('{'));
        let text = report_with_format(&report, OutputFormat::Text).expect("render text");
        assert!(text.contains("CODE QUALITY REPORT"));
    }
}
