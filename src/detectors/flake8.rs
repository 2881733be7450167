//! flake8 integration
//!
//! The linter is optional. Running it has two distinct outcomes:
//! `Reported` (possibly with zero issues) when flake8 ran, and `Unavailable`
//! when it is not installed, timed out or failed. Unavailability is never an
//! error; it is logged at debug level and contributes nothing to the report.

use super::external_tool::{run_external_tool, ExternalToolResult};
use crate::models::{Issue, IssueKind, Severity};
use regex::Regex;
use serde_json::Value as JsonValue;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// Outcome of running an external linter on one file
#[derive(Debug, Clone, PartialEq)]
pub enum LinterOutcome {
    /// The tool could not be used; the reason is for logs only
    Unavailable(String),
    Reported(Vec<Issue>),
}

impl LinterOutcome {
    /// Issues to merge into the file's results (none when unavailable)
    pub fn into_issues(self) -> Vec<Issue> {
        match self {
            LinterOutcome::Unavailable(_) => Vec::new(),
            LinterOutcome::Reported(issues) => issues,
        }
    }
}

/// A third-party linter run once per file
pub trait ExternalLinter: Send + Sync {
    fn name(&self) -> &'static str;

    fn lint(&self, path: &Path) -> LinterOutcome;
}

/// Runs `flake8 <file> --format=json`
#[derive(Debug, Clone)]
pub struct Flake8Linter {
    program: String,
    timeout_secs: u64,
}

impl Flake8Linter {
    pub fn new(timeout_secs: u64) -> Self {
        Self::with_program("flake8", timeout_secs)
    }

    /// Use a different executable (a wrapper script, a venv binary...)
    pub fn with_program(program: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            program: program.into(),
            timeout_secs,
        }
    }

    fn outcome(&self, path: &Path, result: ExternalToolResult) -> LinterOutcome {
        if !result.success {
            let reason = result
                .error
                .unwrap_or_else(|| "flake8 failed".to_string());
            return LinterOutcome::Unavailable(reason);
        }

        match result.return_code {
            Some(0) => LinterOutcome::Reported(Vec::new()),
            code if result.stdout.trim().is_empty() => LinterOutcome::Unavailable(format!(
                "flake8 exited with {:?}: {}",
                code,
                result.stderr.trim()
            )),
            _ => LinterOutcome::Reported(parse_output(&result.stdout, path)),
        }
    }
}

impl ExternalLinter for Flake8Linter {
    fn name(&self) -> &'static str {
        "flake8"
    }

    fn lint(&self, path: &Path) -> LinterOutcome {
        let cmd = vec![
            self.program.clone(),
            path.to_string_lossy().to_string(),
            "--format=json".to_string(),
        ];
        let result = run_external_tool(&cmd, "flake8", self.timeout_secs, None);
        let outcome = self.outcome(path, result);
        if let LinterOutcome::Unavailable(reason) = &outcome {
            debug!("flake8 unavailable for {}: {}", path.display(), reason);
        }
        outcome
    }
}

fn severity_for_code(code: &str) -> Severity {
    if code.starts_with('W') {
        Severity::Warning
    } else {
        Severity::Error
    }
}

static TEXT_LINE: OnceLock<Regex> = OnceLock::new();

fn text_line_regex() -> &'static Regex {
    TEXT_LINE.get_or_init(|| {
        Regex::new(r"^(?P<path>.+?):(?P<line>\d+):(?:(?P<col>\d+):)?\s*(?P<rest>.*)$")
            .expect("valid regex")
    })
}

/// Parse flake8 output for one file.
///
/// Accepts the JSON formatter's output (a list of entries, or an object
/// mapping file names to lists) and falls back to the default
/// `path:line:col: CODE message` text format.
pub fn parse_output(stdout: &str, path: &Path) -> Vec<Issue> {
    match serde_json::from_str::<JsonValue>(stdout) {
        Ok(json) => parse_json(&json, path),
        Err(_) => parse_text(stdout, path),
    }
}

fn parse_json(json: &JsonValue, path: &Path) -> Vec<Issue> {
    let entries: Vec<&JsonValue> = match json {
        JsonValue::Array(items) => items.iter().collect(),
        JsonValue::Object(files) => files
            .values()
            .filter_map(JsonValue::as_array)
            .flatten()
            .collect(),
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|entry| {
            let code = entry.get("code")?.as_str()?;
            let text = entry.get("text").and_then(JsonValue::as_str).unwrap_or("");
            let line = entry
                .get("line_number")
                .and_then(JsonValue::as_u64)
                .unwrap_or(0);
            Some(Issue::new(
                path,
                u32::try_from(line).unwrap_or(u32::MAX),
                IssueKind::Flake8,
                severity_for_code(code),
                format!("{}: {}", code, text),
            ))
        })
        .collect()
}

fn parse_text(stdout: &str, path: &Path) -> Vec<Issue> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let caps = text_line_regex().captures(line.trim())?;
            let line_number = caps["line"].parse::<u32>().ok()?;
            let rest = caps["rest"].trim();
            let severity = rest
                .split_whitespace()
                .next()
                .map(severity_for_code)
                .unwrap_or(Severity::Warning);
            Some(Issue::new(
                path,
                line_number,
                IssueKind::Flake8,
                severity,
                rest.to_string(),
            ))
        })
        .collect()
}
