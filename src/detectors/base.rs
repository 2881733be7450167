//! Base detector trait and types
//!
//! This module defines the core abstractions for per-file issue detection:
//! - `Detector` trait that all rule checks implement
//! - `FileContext`, the read-only input every detector sees
//! - `DetectorError` for failures that should not abort the file

use crate::config::QualityConfig;
use crate::models::{Issue, IssueKind};
use crate::parsers::SyntaxTree;
use std::path::Path;
use thiserror::Error;

/// Everything a detector may look at for one file
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    pub path: &'a Path,
    /// Decoded source text (BOM removed)
    pub source: &'a str,
    pub tree: &'a SyntaxTree,
    pub config: &'a QualityConfig,
}

/// A detector could not finish on this file
#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("line {line} is outside the file ({line_count} lines)")]
    InvalidLocation { line: u32, line_count: u32 },

    #[error("{0}")]
    Failed(String),
}

/// Trait for the per-file rule checks
///
/// # Example Implementation
///
/// ```ignore
/// pub struct TodoDetector;
///
/// impl Detector for TodoDetector {
///     fn name(&self) -> &'static str {
///         "todo"
///     }
///
///     fn description(&self) -> &'static str {
///         "todo comments"
///     }
///
///     fn error_kind(&self) -> IssueKind {
///         IssueKind::NamingAnalysisError
///     }
///
///     fn detect(&self, ctx: &FileContext<'_>) -> Result<Vec<Issue>, DetectorError> {
///         Ok(vec![])
///     }
/// }
/// ```
pub trait Detector: Send + Sync {
    /// Short identifier ("line_length", "naming", "complexity")
    fn name(&self) -> &'static str;

    /// What the detector analyzes, as used in failure messages
    /// ("Failed to analyze naming conventions: ...")
    fn description(&self) -> &'static str;

    /// Kind recorded when this detector fails on a file
    fn error_kind(&self) -> IssueKind;

    /// Run detection on one parsed file
    ///
    /// Implementations must be pure functions of the context: the engine may
    /// call them from any worker thread, in any order.
    fn detect(&self, ctx: &FileContext<'_>) -> Result<Vec<Issue>, DetectorError>;
}

/// Check that a reported line lies inside the file
pub fn ensure_line(ctx: &FileContext<'_>, line: u32) -> Result<u32, DetectorError> {
    let line_count = ctx.tree.line_count;
    if line == 0 || line > line_count {
        return Err(DetectorError::InvalidLocation { line, line_count });
    }
    Ok(line)
}
