//! Engine-level tests through the library API
//!
//! Exercises the analyzer on in-memory sources and real files without the
//! CLI or any external tool.

use pyquality::config::ConfigError;
use pyquality::pipeline::ReportAggregator;
use pyquality::detectors::{ExternalLinter, LinterOutcome};
use pyquality::{analyze_project, Analyzer, Issue, IssueKind, QualityConfig, Severity};
use std::path::{Path, PathBuf};

const CLEAN: &str = "\
import os


def read(path):
    if os.path.exists(path):
        return open(path).read()
    return ''
";

const BUSY: &str = "\
class dataStore:
    def Load(self, items):
        for item in items:
            if item and item.ok or item.retry:
                yield item
            elif item is None:
                continue
";

fn analyzer() -> Analyzer {
    Analyzer::new(QualityConfig::default()).expect("valid config")
}

#[test]
fn test_analysis_is_idempotent() {
    let analyzer = analyzer();
    let path = Path::new("busy.py");
    let first = analyzer.analyze_bytes(path, BUSY.as_bytes());
    let second = analyzer.analyze_bytes(path, BUSY.as_bytes());
    assert_eq!(first, second);
}

#[test]
fn test_invalid_syntax_yields_exactly_one_issue() {
    let analyzer = analyzer();
    let analysis = analyzer.analyze_bytes(Path::new("bad.py"), b"def broken(:\n    return 1\n");
    assert_eq!(analysis.issues.len(), 1);
    let issue = &analysis.issues[0];
    assert_eq!(issue.kind, IssueKind::SyntaxError);
    assert_eq!(issue.severity, Severity::Error);
    assert_eq!(issue.line_number, 1);
    assert_eq!(analysis.metrics, Default::default());
}

#[test]
fn test_undecodable_file_is_parsing_error() {
    let analysis = analyzer().analyze_bytes(Path::new("latin.py"), b"x = '\xe9'\n");
    assert_eq!(analysis.issues.len(), 1);
    assert_eq!(analysis.issues[0].kind, IssueKind::ParsingError);
    assert_eq!(analysis.issues[0].line_number, 0);
}

#[test]
fn test_detectors_and_metrics_on_valid_source() {
    let analysis = analyzer().analyze_bytes(Path::new("busy.py"), BUSY.as_bytes());
    let kinds: Vec<_> = analysis.issues.iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        vec![IssueKind::NamingConvention, IssueKind::NamingConvention]
    );
    assert_eq!(analysis.metrics.function_count, 1);
    assert_eq!(analysis.metrics.class_count, 1);
    // base + for + if + and + or + elif
    assert_eq!(analysis.metrics.complexity, 6);
}

#[test]
fn test_thresholds_come_from_config() {
    let config = QualityConfig {
        max_function_complexity: 3,
        max_class_complexity: 3,
        ..QualityConfig::default()
    };
    let analysis = Analyzer::new(config)
        .expect("valid config")
        .analyze_bytes(Path::new("busy.py"), BUSY.as_bytes());
    assert!(analysis
        .issues
        .iter()
        .any(|i| i.kind == IssueKind::HighComplexity && i.message.contains("complexity 6 (max 3)")));
    assert!(analysis
        .issues
        .iter()
        .any(|i| i.kind == IssueKind::HighClassComplexity));
}

#[test]
fn test_total_issues_is_partition_independent() {
    let analyzer = analyzer();
    let sources = [
        ("a.py", CLEAN.as_bytes()),
        ("b.py", BUSY.as_bytes()),
        ("c.py", b"def broken(:\n".as_slice()),
        ("d.py", b"X = 1\ncamelCase = 2\n".as_slice()),
    ];
    let results: Vec<_> = sources
        .iter()
        .map(|(name, bytes)| analyzer.analyze_bytes(Path::new(name), bytes))
        .collect();

    let aggregator = ReportAggregator::default();
    let whole = aggregator.aggregate(Path::new("proj"), results.clone());

    for split in 0..=results.len() {
        let (left, right) = results.split_at(split);
        let left = aggregator.aggregate(Path::new("proj"), left.to_vec());
        let right = aggregator.aggregate(Path::new("proj"), right.to_vec());
        assert_eq!(left.total_issues + right.total_issues, whole.total_issues);
        assert_eq!(left.total_files + right.total_files, whole.total_files);
    }
}

#[test]
fn test_analyze_project_reads_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clean = dir.path().join("clean.py");
    let busy = dir.path().join("busy.py");
    std::fs::write(&clean, CLEAN).expect("write clean");
    std::fs::write(&busy, BUSY).expect("write busy");
    let missing = dir.path().join("missing.py");

    let paths: Vec<PathBuf> = vec![clean, busy, missing];
    let report =
        analyze_project(dir.path(), &paths, &QualityConfig::default()).expect("valid config");

    assert_eq!(report.total_files, 3);
    assert_eq!(report.total_issues, report.issues.len());
    assert_eq!(report.summary.issues_by_kind.get(&IssueKind::ParsingError), Some(&1));
    assert_eq!(report.files.len(), 3);
    assert_eq!(report.files[0].path, paths[0]);
    assert_eq!(report.files[0].issues, 0);
    assert!(report.summary.quality_score < 100.0);
}

#[test]
fn test_clean_project_scores_100() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clean = dir.path().join("clean.py");
    std::fs::write(&clean, "VALUE = 1\n").expect("write clean");

    let report =
        analyze_project(dir.path(), &[clean], &QualityConfig::default()).expect("valid config");
    assert_eq!(report.total_issues, 0);
    assert_eq!(report.summary.quality_score, 100.0);
}

#[test]
fn test_invalid_config_is_rejected_up_front() {
    let dir = tempfile::tempdir().expect("tempdir");
    let wide = dir.path().join("wide.py");
    std::fs::write(&wide, format!("def f():\n    return '{}'\n", "x".repeat(90)))
        .expect("write wide");

    let config = QualityConfig {
        max_line_length: 0,
        max_function_complexity: 0,
        ..QualityConfig::default()
    };
    let result = analyze_project(dir.path(), &[wide], &config);
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_cr_only_file_keeps_line_numbers() {
    let analysis = analyzer().analyze_bytes(Path::new("mac.py"), b"x = 1\rfooBar = 2\ry = 3\r");
    assert_eq!(analysis.metrics.lines_of_code, 3);
    assert_eq!(analysis.issues.len(), 1);
    assert_eq!(analysis.issues[0].kind, IssueKind::NamingConvention);
    assert_eq!(analysis.issues[0].line_number, 2);
}

/// Reports two errors for `service.py` and nothing elsewhere
struct ServiceLinter;

impl ExternalLinter for ServiceLinter {
    fn name(&self) -> &'static str {
        "service"
    }

    fn lint(&self, path: &Path) -> LinterOutcome {
        if path.ends_with("service.py") {
            LinterOutcome::Reported(vec![
                Issue::new(
                    path,
                    1,
                    IssueKind::Flake8,
                    Severity::Error,
                    "F401: 'os' imported but unused",
                ),
                Issue::new(
                    path,
                    2,
                    IssueKind::Flake8,
                    Severity::Error,
                    "F821: undefined name 'db'",
                ),
            ])
        } else {
            LinterOutcome::Reported(Vec::new())
        }
    }
}

#[test]
fn test_warning_errors_and_invalid_file_total_four() {
    let analyzer = analyzer().with_linter(Box::new(ServiceLinter));
    let results = vec![
        analyzer.analyze_bytes(Path::new("proj/style.py"), b"def doThing():\n    return 1\n"),
        analyzer.analyze_bytes(Path::new("proj/service.py"), b"import os\nrows = db\n"),
        analyzer.analyze_bytes(Path::new("proj/broken.py"), b"def broken(:\n"),
    ];
    assert_eq!(results[0].issues.len(), 1);
    assert_eq!(results[0].issues[0].severity, Severity::Warning);
    assert_eq!(results[1].issues.len(), 2);
    assert!(results[1].issues.iter().all(|i| i.severity == Severity::Error));
    assert_eq!(results[2].issues.len(), 1);
    assert_eq!(results[2].issues[0].kind, IssueKind::SyntaxError);

    let report = ReportAggregator::default().aggregate(Path::new("proj"), results);
    assert_eq!(report.total_files, 3);
    assert_eq!(report.total_issues, 4);
    assert_eq!(report.summary.severity_count(Severity::Error), 3);
    assert_eq!(report.summary.severity_count(Severity::Warning), 1);
    assert!(report.summary.quality_score < 100.0);
}
