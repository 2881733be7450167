//! Line length detector
//!
//! Flags physical lines longer than `max_line_length` characters. The line
//! terminator is not counted; length is in characters, not bytes.

use super::base::{ensure_line, Detector, DetectorError, FileContext};
use crate::models::{Issue, IssueKind, Severity};
use crate::parsers::physical_lines;

pub struct LineLengthDetector;

impl Detector for LineLengthDetector {
    fn name(&self) -> &'static str {
        "line_length"
    }

    fn description(&self) -> &'static str {
        "line length"
    }

    fn error_kind(&self) -> IssueKind {
        IssueKind::LineLengthAnalysisError
    }

    fn detect(&self, ctx: &FileContext<'_>) -> Result<Vec<Issue>, DetectorError> {
        let max_length = ctx.config.max_line_length;
        let mut issues = Vec::new();

        for (index, line) in physical_lines(ctx.source).enumerate() {
            let length = line.chars().count();
            if length <= max_length {
                continue;
            }
            let line_num = ensure_line(ctx, index as u32 + 1)?;
            issues.push(
                Issue::new(
                    ctx.path,
                    line_num,
                    IssueKind::LineTooLong,
                    Severity::Warning,
                    format!(
                        "Line {} is {} characters long (max {})",
                        line_num, length, max_length
                    ),
                )
                .with_suggestion("Break the line into multiple lines or use line continuation"),
            );
        }

        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QualityConfig;
    use crate::parsers::python::parse_source;
    use std::path::Path;

    fn detect(source: &str, max_line_length: usize) -> Vec<Issue> {
        let path = Path::new("lines.py");
        let tree = parse_source(source, path).expect("parse");
        let config = QualityConfig {
            max_line_length,
            ..QualityConfig::default()
        };
        let ctx = FileContext {
            path,
            source,
            tree: &tree,
            config: &config,
        };
        LineLengthDetector.detect(&ctx).expect("detect")
    }

    #[test]
    fn test_exactly_at_limit_is_fine() {
        let source = format!("x = '{}'\n", "a".repeat(10));
        let len = source.trim_end().len();
        assert!(detect(&source, len).is_empty());
        assert_eq!(detect(&source, len - 1).len(), 1);
    }

    #[test]
    fn test_reports_line_number_and_lengths() {
        let source = "a = 1\nbbbbbbbbbb = 2\nc = 3\n";
        let issues = detect(source, 10);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line_number, 2);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].message, "Line 2 is 14 characters long (max 10)");
        assert!(issues[0].suggestion.is_some());
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // 10 characters, 14 bytes
        let source = "s = 'éééé'\n";
        assert!(detect(source, 10).is_empty());
    }

    #[test]
    fn test_crlf_terminator_not_counted() {
        let source = "abc = 1\r\n";
        assert!(detect(source, 7).is_empty());
    }

    #[test]
    fn test_cr_only_lines_reported_at_their_own_line() {
        let source = "a = 1\rbbbbbbbbbb = 2\rc = 3\r";
        let issues = detect(source, 10);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line_number, 2);
    }
}
