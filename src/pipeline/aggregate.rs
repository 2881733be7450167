//! Report aggregation
//!
//! Folds per-file results into one `QualityReport`. The fold only depends on
//! the order of its input (discovery order), never on which worker finished
//! first, and the display list of issues is re-sorted by (path, line).

use super::FileAnalysis;
use crate::config::SeverityWeights;
use crate::models::{FileSummary, Issue, Metrics, QualityReport, Summary};
use crate::scoring::QualityScorer;
use std::path::Path;

/// Running totals for the project
#[derive(Debug, Clone, Default)]
struct Totals {
    issues: Vec<Issue>,
    metrics: Metrics,
    maintainability_sum: f64,
    files: Vec<FileSummary>,
}

/// Merges per-file results and scores the project once
#[derive(Debug, Clone, Default)]
pub struct ReportAggregator {
    scorer: QualityScorer,
}

impl ReportAggregator {
    pub fn new(weights: SeverityWeights) -> Self {
        Self {
            scorer: QualityScorer::new(weights),
        }
    }

    pub fn aggregate(&self, project_path: &Path, results: Vec<FileAnalysis>) -> QualityReport {
        let totals = results
            .into_iter()
            .fold(Totals::default(), |totals, file| self.fold_file(totals, file));

        let total_files = totals.files.len();
        let mut metrics = totals.metrics;
        metrics.maintainability_index = if total_files == 0 {
            0.0
        } else {
            totals.maintainability_sum / total_files as f64
        };

        let quality_score = if total_files == 0 {
            100.0
        } else {
            self.scorer.score(&totals.issues, &metrics)
        };

        // Counts come from the canonical (discovery-order) list
        let summary = Summary::count(&totals.issues, quality_score);
        let total_issues = totals.issues.len();

        let mut issues = totals.issues;
        issues.sort_by(|a, b| {
            a.file_path
                .cmp(&b.file_path)
                .then(a.line_number.cmp(&b.line_number))
        });

        QualityReport {
            project_path: project_path.to_path_buf(),
            total_files,
            total_issues,
            metrics,
            issues,
            summary,
            files: totals.files,
        }
    }

    fn fold_file(&self, mut totals: Totals, file: FileAnalysis) -> Totals {
        let FileAnalysis {
            path,
            issues,
            metrics,
        } = file;

        totals.files.push(FileSummary {
            quality_score: self.scorer.score(&issues, &metrics),
            issues: issues.len(),
            metrics,
            path,
        });
        totals.metrics = sum_counts(&totals.metrics, &metrics);
        totals.maintainability_sum += metrics.maintainability_index;
        totals.issues.extend(issues);
        totals
    }
}

/// Field-wise sum of the integer metrics (maintainability is handled separately)
fn sum_counts(a: &Metrics, b: &Metrics) -> Metrics {
    Metrics {
        lines_of_code: a.lines_of_code + b.lines_of_code,
        comment_lines: a.comment_lines + b.comment_lines,
        blank_lines: a.blank_lines + b.blank_lines,
        function_count: a.function_count + b.function_count,
        class_count: a.class_count + b.class_count,
        complexity: a.complexity + b.complexity,
        maintainability_index: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IssueKind, Severity};
    use std::path::PathBuf;

    fn file(path: &str, lines: &[u32], mi: f64, complexity: u64) -> FileAnalysis {
        FileAnalysis {
            path: PathBuf::from(path),
            issues: lines
                .iter()
                .map(|&line| {
                    Issue::new(path, line, IssueKind::LineTooLong, Severity::Warning, "long")
                })
                .collect(),
            metrics: Metrics {
                lines_of_code: 10,
                function_count: 1,
                complexity,
                maintainability_index: mi,
                ..Metrics::default()
            },
        }
    }

    #[test]
    fn test_zero_files() {
        let report = ReportAggregator::default().aggregate(Path::new("."), Vec::new());
        assert_eq!(report.total_files, 0);
        assert_eq!(report.total_issues, 0);
        assert_eq!(report.metrics, Metrics::default());
        assert_eq!(report.summary.quality_score, 100.0);
    }

    #[test]
    fn test_sums_counts_and_averages_maintainability() {
        let report = ReportAggregator::default().aggregate(
            Path::new("proj"),
            vec![file("b.py", &[3], 100.0, 1), file("a.py", &[], 50.0, 2)],
        );
        assert_eq!(report.total_files, 2);
        assert_eq!(report.metrics.lines_of_code, 20);
        assert_eq!(report.metrics.function_count, 2);
        assert_eq!(report.metrics.complexity, 3);
        assert_eq!(report.metrics.maintainability_index, 75.0);
        // one warning (2) + complexity 3 (6)
        assert_eq!(report.summary.quality_score, 92.0);
    }

    #[test]
    fn test_issues_sorted_for_display_and_files_in_discovery_order() {
        let report = ReportAggregator::default().aggregate(
            Path::new("proj"),
            vec![file("b.py", &[9, 2], 100.0, 1), file("a.py", &[5], 100.0, 1)],
        );
        let order: Vec<_> = report
            .issues
            .iter()
            .map(|i| (i.file_path.to_string_lossy().to_string(), i.line_number))
            .collect();
        assert_eq!(
            order,
            vec![
                ("a.py".to_string(), 5),
                ("b.py".to_string(), 2),
                ("b.py".to_string(), 9)
            ]
        );
        assert_eq!(report.files[0].path, PathBuf::from("b.py"));
        assert_eq!(report.files[0].issues, 2);
        assert_eq!(report.total_issues, 3);
    }

    #[test]
    fn test_failed_file_counts_toward_mean() {
        let failed = FileAnalysis {
            path: PathBuf::from("bad.py"),
            issues: vec![Issue::new(
                "bad.py",
                1,
                IssueKind::SyntaxError,
                Severity::Error,
                "Syntax error",
            )],
            metrics: Metrics::default(),
        };
        let report = ReportAggregator::default()
            .aggregate(Path::new("proj"), vec![file("ok.py", &[], 100.0, 0), failed]);
        assert_eq!(report.metrics.maintainability_index, 50.0);
        assert_eq!(report.summary.severity_count(Severity::Error), 1);
    }
}
