//! Analysis pipeline
//!
//! Orchestrates the per-file analysis and the project report:
//! 1. Read and parse each file (a failure becomes one issue, zero metrics)
//! 2. Run the detectors and collect metrics on the tree
//! 3. Optionally run an external linter on the file
//! 4. Fold all per-file results into a `QualityReport`
//!
//! Step 1-3 are a pure function of one file and the shared config, so files
//! are analyzed in parallel with rayon. Results keep discovery order.

mod aggregate;

pub use aggregate::ReportAggregator;

use crate::config::{ConfigError, QualityConfig};
use crate::detectors::{DetectorEngine, ExternalLinter, FileContext};
use crate::metrics::collect_metrics;
use crate::models::{Issue, Metrics, QualityReport};
use crate::parsers::{decode_source, python, ParseFailure};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything produced for a single file
#[derive(Debug, Clone, PartialEq)]
pub struct FileAnalysis {
    pub path: PathBuf,
    pub issues: Vec<Issue>,
    pub metrics: Metrics,
}

/// Project analyzer: configuration, detectors and an optional linter
pub struct Analyzer {
    config: QualityConfig,
    engine: DetectorEngine,
    linter: Option<Box<dyn ExternalLinter>>,
}

impl Analyzer {
    /// Build an analyzer; an invalid configuration is rejected here, before
    /// any file is read
    pub fn new(config: QualityConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let engine = DetectorEngine::default();
        debug!("Detectors: {}", engine.detector_names().join(", "));
        Ok(Self {
            config,
            engine,
            linter: None,
        })
    }

    /// Also run an external linter on every parseable file
    pub fn with_linter(mut self, linter: Box<dyn ExternalLinter>) -> Self {
        debug!("External linter: {}", linter.name());
        self.linter = Some(linter);
        self
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Analyze one file
    pub fn analyze_file(&self, path: &Path) -> FileAnalysis {
        match std::fs::read(path) {
            Ok(bytes) => self.analyze_bytes(path, &bytes),
            Err(e) => failed(path, ParseFailure::from(e)),
        }
    }

    /// Analyze file content already in memory
    pub fn analyze_bytes(&self, path: &Path, bytes: &[u8]) -> FileAnalysis {
        let source = match decode_source(bytes) {
            Ok(source) => source,
            Err(failure) => return failed(path, failure),
        };
        let tree = match python::parse_source(source, path) {
            Ok(tree) => tree,
            Err(failure) => return failed(path, failure),
        };

        let ctx = FileContext {
            path,
            source,
            tree: &tree,
            config: &self.config,
        };
        let mut issues = self.engine.run(&ctx);
        let metrics = collect_metrics(source, &tree);

        if let Some(linter) = &self.linter {
            issues.extend(linter.lint(path).into_issues());
        }

        FileAnalysis {
            path: path.to_path_buf(),
            issues,
            metrics,
        }
    }

    /// Analyze files in parallel; `on_file` is called once per finished file
    pub fn analyze_files_with_progress<F>(&self, paths: &[PathBuf], on_file: F) -> Vec<FileAnalysis>
    where
        F: Fn(&Path) + Sync,
    {
        paths
            .par_iter()
            .map(|path| {
                let analysis = self.analyze_file(path);
                on_file(path);
                analysis
            })
            .collect()
    }

    pub fn analyze_files(&self, paths: &[PathBuf]) -> Vec<FileAnalysis> {
        self.analyze_files_with_progress(paths, |_| {})
    }

    /// Analyze every path and build the project report
    pub fn analyze(&self, project_path: &Path, paths: &[PathBuf]) -> QualityReport {
        let results = self.analyze_files(paths);
        self.report(project_path, results)
    }

    /// Fold per-file results into the project report
    pub fn report(&self, project_path: &Path, results: Vec<FileAnalysis>) -> QualityReport {
        let report = ReportAggregator::new(self.config.severity_weights.clone())
            .aggregate(project_path, results);
        info!(
            "Analyzed {} files: {} issues, quality score {:.2}",
            report.total_files, report.total_issues, report.summary.quality_score
        );
        report
    }
}

fn failed(path: &Path, failure: ParseFailure) -> FileAnalysis {
    debug!("Could not parse {}: {}", path.display(), failure);
    FileAnalysis {
        path: path.to_path_buf(),
        issues: vec![failure.into_issue(path)],
        metrics: Metrics::default(),
    }
}

/// Analyze an already-filtered list of files with the built-in detectors.
///
/// No external linter is run. `project_path` is only recorded in the report.
/// An invalid configuration fails before any file is read.
pub fn analyze_project(
    project_path: &Path,
    paths: &[PathBuf],
    config: &QualityConfig,
) -> Result<QualityReport, ConfigError> {
    Ok(Analyzer::new(config.clone())?.analyze(project_path, paths))
}
