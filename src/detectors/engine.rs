//! Detector engine
//!
//! Runs every registered detector against one file. Detectors are isolated
//! from each other: an error result or a panic in one is turned into a
//! single `<detector>_analysis_error` issue and the others still run.

use super::base::{Detector, FileContext};
use super::{ComplexityDetector, LineLengthDetector, NamingDetector};
use crate::models::{Issue, Severity};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, error, warn};

/// Ordered set of detectors applied to each parsed file
pub struct DetectorEngine {
    detectors: Vec<Box<dyn Detector>>,
}

impl Default for DetectorEngine {
    fn default() -> Self {
        Self::new(vec![
            Box::new(LineLengthDetector),
            Box::new(ComplexityDetector),
            Box::new(NamingDetector),
        ])
    }
}

impl DetectorEngine {
    pub fn new(detectors: Vec<Box<dyn Detector>>) -> Self {
        Self { detectors }
    }

    pub fn detector_names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Run all detectors on one file, in registration order
    pub fn run(&self, ctx: &FileContext<'_>) -> Vec<Issue> {
        let mut issues = Vec::new();
        for detector in &self.detectors {
            issues.extend(self.run_single_detector(detector.as_ref(), ctx));
        }
        issues
    }

    fn run_single_detector(&self, detector: &dyn Detector, ctx: &FileContext<'_>) -> Vec<Issue> {
        let name = detector.name();

        // Wrap in catch_unwind to handle panics
        let detect_result = catch_unwind(AssertUnwindSafe(|| detector.detect(ctx)));

        let failure = match detect_result {
            Ok(Ok(issues)) => {
                debug!(
                    "Detector {} found {} issues in {}",
                    name,
                    issues.len(),
                    ctx.path.display()
                );
                return issues;
            }
            Ok(Err(e)) => {
                warn!("Detector {} failed on {}: {}", name, ctx.path.display(), e);
                e.to_string()
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                error!(
                    "Detector {} panicked on {}: {}",
                    name,
                    ctx.path.display(),
                    panic_msg
                );
                format!("Panic: {}", panic_msg)
            }
        };

        vec![Issue::new(
            ctx.path,
            0,
            detector.error_kind(),
            Severity::Error,
            format!("Failed to analyze {}: {}", detector.description(), failure),
        )]
    }
}
