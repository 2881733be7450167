//! Core data models for pyquality
//!
//! These models are shared by the engine, the reporters and the CLI.
//! Everything here is plain serde data so a report can be written as JSON
//! or rendered as text without touching the engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Severity levels for issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Error, Severity::Warning, Severity::Info];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    /// Rank for threshold comparisons (higher = more severe)
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Error => 3,
            Severity::Warning => 2,
            Severity::Info => 1,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            other => Err(format!(
                "Unknown severity '{other}'. Valid severities: error, warning, info"
            )),
        }
    }
}

/// What kind of problem an issue describes.
///
/// Serialized as a snake_case tag; reports group and count by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    SyntaxError,
    ParsingError,
    LineTooLong,
    NamingConvention,
    HighComplexity,
    HighClassComplexity,
    LineLengthAnalysisError,
    NamingAnalysisError,
    ComplexityAnalysisError,
    Flake8,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::SyntaxError => "syntax_error",
            IssueKind::ParsingError => "parsing_error",
            IssueKind::LineTooLong => "line_too_long",
            IssueKind::NamingConvention => "naming_convention",
            IssueKind::HighComplexity => "high_complexity",
            IssueKind::HighClassComplexity => "high_class_complexity",
            IssueKind::LineLengthAnalysisError => "line_length_analysis_error",
            IssueKind::NamingAnalysisError => "naming_analysis_error",
            IssueKind::ComplexityAnalysisError => "complexity_analysis_error",
            IssueKind::Flake8 => "flake8",
        }
    }

    /// Title-cased label for human-readable output ("line_too_long" -> "Line Too Long")
    pub fn label(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single quality issue found in a file.
///
/// `line_number` is 1-based; 0 marks a file-level issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub file_path: PathBuf,
    pub line_number: u32,
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub suggestion: Option<String>,
}

impl Issue {
    pub fn new(
        file_path: impl Into<PathBuf>,
        line_number: u32,
        kind: IssueKind,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            line_number,
            kind,
            severity,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Structural metrics for one file, or project totals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub lines_of_code: u64,
    pub comment_lines: u64,
    pub blank_lines: u64,
    pub function_count: u64,
    pub class_count: u64,
    /// Sum of per-function cyclomatic complexity
    pub complexity: u64,
    pub maintainability_index: f64,
}

/// Issue counts and the overall score
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub issues_by_severity: BTreeMap<Severity, usize>,
    pub issues_by_kind: BTreeMap<IssueKind, usize>,
    pub quality_score: f64,
}

impl Summary {
    /// Count issues per severity and per kind
    pub fn count(issues: &[Issue], quality_score: f64) -> Self {
        let mut summary = Self {
            quality_score,
            ..Self::default()
        };
        for issue in issues {
            *summary.issues_by_severity.entry(issue.severity).or_insert(0) += 1;
            *summary.issues_by_kind.entry(issue.kind).or_insert(0) += 1;
        }
        summary
    }

    pub fn severity_count(&self, severity: Severity) -> usize {
        self.issues_by_severity.get(&severity).copied().unwrap_or(0)
    }
}

/// Per-file line of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSummary {
    pub path: PathBuf,
    pub issues: usize,
    pub metrics: Metrics,
    pub quality_score: f64,
}

/// Complete quality report for a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub project_path: PathBuf,
    pub total_files: usize,
    pub total_issues: usize,
    pub metrics: Metrics,
    /// All issues, ordered by (file path, line number)
    pub issues: Vec<Issue>,
    pub summary: Summary,
    pub files: Vec<FileSummary>,
}

impl QualityReport {
    /// Issues at or above the given severity
    pub fn issues_at_least(&self, min: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity.rank() >= min.rank())
            .count()
    }
}
