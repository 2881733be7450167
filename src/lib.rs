//! pyquality - static quality analysis for Python projects
//!
//! Parses Python sources, runs line-length, naming and complexity checks,
//! collects size and maintainability metrics, and folds everything into a
//! single 0-100 quality score.
//!
//! ```no_run
//! use pyquality::{analyze_project, QualityConfig};
//! use std::path::{Path, PathBuf};
//!
//! let files = vec![PathBuf::from("app.py")];
//! let report = analyze_project(Path::new("."), &files, &QualityConfig::default())?;
//! println!("score: {:.2}", report.summary.quality_score);
//! # Ok::<(), pyquality::config::ConfigError>(())
//! ```

pub mod cli;
pub mod config;
pub mod detectors;
pub mod metrics;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod reporters;
pub mod scoring;

pub use config::QualityConfig;
pub use models::{Issue, IssueKind, Metrics, QualityReport, Severity};
pub use pipeline::{analyze_project, Analyzer, FileAnalysis};
