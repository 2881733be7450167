//! Text (terminal) reporter with colors and formatting

use crate::models::{Issue, QualityReport, Severity};
use anyhow::Result;
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::path::PathBuf;

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const RULE_WIDE: usize = 60;
const RULE_NARROW: usize = 40;

/// Rendering options for the text report
#[derive(Debug, Clone)]
pub struct TextOptions {
    /// Emit ANSI escape codes
    pub color: bool,
    /// Timestamp printed as the analysis date
    pub generated_at: DateTime<Local>,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            color: console::colors_enabled(),
            generated_at: Local::now(),
        }
    }
}

/// Severity colors
fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31m",   // Red
        Severity::Warning => "\x1b[33m", // Yellow
        Severity::Info => "\x1b[34m",    // Blue
    }
}

fn score_color(score: f64) -> &'static str {
    if score >= 80.0 {
        "\x1b[32m"
    } else if score >= 60.0 {
        "\x1b[33m"
    } else {
        "\x1b[31m"
    }
}

/// Applies or drops ANSI codes depending on the options
struct Painter {
    color: bool,
}

impl Painter {
    fn paint(&self, code: &str, text: impl std::fmt::Display) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn heading(&self, out: &mut String, title: &str) {
        let _ = writeln!(out, "\n{}", self.paint(DIM, "-".repeat(RULE_NARROW)));
        let _ = writeln!(out, "{}", self.paint(BOLD, title));
        let _ = writeln!(out, "{}", self.paint(DIM, "-".repeat(RULE_NARROW)));
    }
}

/// Render report as formatted terminal output
pub fn render(report: &QualityReport, options: &TextOptions) -> Result<String> {
    let p = Painter {
        color: options.color,
    };
    let mut out = String::new();

    // Header
    let score = report.summary.quality_score;
    writeln!(out, "\n{}", p.paint(DIM, "=".repeat(RULE_WIDE)))?;
    writeln!(out, "{}", p.paint(BOLD, "CODE QUALITY REPORT"))?;
    writeln!(out, "{}", p.paint(DIM, "=".repeat(RULE_WIDE)))?;
    writeln!(out, "Project: {}", report.project_path.display())?;
    writeln!(
        out,
        "Analysis Date: {}",
        options.generated_at.format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(out, "Total Files: {}", report.total_files)?;
    writeln!(out, "Total Issues: {}", report.total_issues)?;
    writeln!(
        out,
        "Quality Score: {}/100",
        p.paint(score_color(score), format!("{score:.2}"))
    )?;

    // Metrics
    let m = &report.metrics;
    p.heading(&mut out, "METRICS");
    writeln!(out, "Lines of Code: {}", m.lines_of_code)?;
    writeln!(out, "Comment Lines: {}", m.comment_lines)?;
    writeln!(out, "Blank Lines: {}", m.blank_lines)?;
    writeln!(out, "Functions: {}", m.function_count)?;
    writeln!(out, "Classes: {}", m.class_count)?;
    writeln!(out, "Total Complexity: {}", m.complexity)?;
    writeln!(out, "Avg Maintainability Index: {:.2}", m.maintainability_index)?;

    // Summary
    p.heading(&mut out, "ISSUES BY SEVERITY");
    for severity in Severity::ALL {
        let count = report.summary.severity_count(severity);
        if count > 0 {
            let label = capitalize(severity.as_str());
            writeln!(out, "{}: {}", p.paint(severity_color(severity), label), count)?;
        }
    }

    p.heading(&mut out, "ISSUES BY TYPE");
    for (kind, count) in &report.summary.issues_by_kind {
        writeln!(out, "{}: {}", kind.label(), count)?;
    }

    // Per-file scores, worst first
    if report.files.len() > 1 {
        p.heading(&mut out, "FILES");
        let mut files: Vec<_> = report.files.iter().collect();
        files.sort_by(|a, b| {
            a.quality_score
                .total_cmp(&b.quality_score)
                .then_with(|| a.path.cmp(&b.path))
        });
        for file in files.iter().take(10) {
            writeln!(
                out,
                "  {}  {}  {}",
                p.paint(score_color(file.quality_score), format!("{:>6.2}", file.quality_score)),
                p.paint(DIM, format!("{:>3} issues", file.issues)),
                file.path.display()
            )?;
        }
        let remaining = files.len().saturating_sub(10);
        if remaining > 0 {
            writeln!(out, "  {}", p.paint(DIM, format!("...and {remaining} more")))?;
        }
    }

    // Detailed issues grouped by file (already sorted by path, line)
    if !report.issues.is_empty() {
        p.heading(&mut out, "DETAILED ISSUES");
        for (path, issues) in group_by_file(&report.issues) {
            writeln!(out, "\n{}:", p.paint(BOLD, path.display()))?;
            for issue in issues {
                let tag = format!("[{}]", issue.severity.as_str().to_uppercase());
                writeln!(
                    out,
                    "  Line {}: {} {}",
                    issue.line_number,
                    p.paint(severity_color(issue.severity), tag),
                    issue.message
                )?;
                if let Some(suggestion) = &issue.suggestion {
                    writeln!(out, "    {}", p.paint(DIM, format!("Suggestion: {suggestion}")))?;
                }
            }
        }
    }

    Ok(out)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Consecutive runs of issues sharing a file
fn group_by_file(issues: &[Issue]) -> Vec<(PathBuf, Vec<&Issue>)> {
    let mut groups: Vec<(PathBuf, Vec<&Issue>)> = Vec::new();
    for issue in issues {
        match groups.last_mut() {
            Some((path, group)) if *path == issue.file_path => group.push(issue),
            _ => groups.push((issue.file_path.clone(), vec![issue])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;
    use chrono::TimeZone;

    fn plain() -> TextOptions {
        TextOptions {
            color: false,
            generated_at: Local
                .with_ymd_and_hms(2024, 3, 1, 12, 30, 0)
                .single()
                .expect("valid date"),
        }
    }

    #[test]
    fn test_text_header_and_metrics() {
        let text = render(&test_report(), &plain()).expect("render text");
        assert!(text.contains("CODE QUALITY REPORT"));
        assert!(text.contains("Project: proj"));
        assert!(text.contains("Analysis Date: 2024-03-01 12:30:00"));
        assert!(text.contains("Quality Score: 85.00/100"));
        assert!(text.contains("Avg Maintainability Index: 61.50"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_text_summary_sections() {
        let text = render(&test_report(), &plain()).expect("render text");
        assert!(text.contains("Error: 1"));
        assert!(text.contains("Warning: 1"));
        assert!(!text.contains("Info: "));
        assert!(text.contains("Naming Convention: 1"));
        assert!(text.contains("Syntax Error: 1"));
    }

    #[test]
    fn test_text_issues_grouped_with_suggestions() {
        let text = render(&test_report(), &plain()).expect("render text");
        assert!(text.contains("proj/app.py:"));
        assert!(text.contains("  Line 3: [WARNING] Function 'doThing' should use snake_case naming"));
        assert!(text.contains("Suggestion: Rename function"));
        assert!(text.contains("  Line 1: [ERROR] Syntax error: invalid syntax"));
    }

    #[test]
    fn test_text_color_codes() {
        let options = TextOptions {
            color: true,
            ..plain()
        };
        let text = render(&test_report(), &options).expect("render text");
        assert!(text.contains("\x1b[31m[ERROR]\x1b[0m"));
    }

    #[test]
    fn test_files_listed_worst_first() {
        let text = render(&test_report(), &plain()).expect("render text");
        let broken = text.find(" 47.00").expect("broken score");
        let app = text.find(" 88.00").expect("app score");
        assert!(broken < app);
    }
}
