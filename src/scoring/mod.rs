//! Quality scoring
//!
//! Converts issues and metrics into a single 0-100 score.
//!
//! # Scoring Formula
//!
//! ```text
//! score   = max(0, 100 - penalty), rounded to 2 decimals
//! penalty = Σ severity_weight(issue)            (error 3, warning 2, info 1)
//!         + min(2 × complexity, 20)
//!         + max(0, 50 - maintainability_index)
//! ```
//!
//! The metric terms apply even when there are no issues, so a clean but
//! very complex project still scores below 100.

use crate::config::SeverityWeights;
use crate::models::{Issue, Metrics};

/// Cap on the complexity term
pub const MAX_COMPLEXITY_PENALTY: f64 = 20.0;

/// Maintainability index below which a penalty applies
pub const MAINTAINABILITY_FLOOR: f64 = 50.0;

/// Individual penalty terms behind a score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub issue_penalty: f64,
    pub complexity_penalty: f64,
    pub maintainability_penalty: f64,
    pub score: f64,
}

/// Scores a set of issues and metrics using configured severity weights
#[derive(Debug, Clone, Default)]
pub struct QualityScorer {
    weights: SeverityWeights,
}

impl QualityScorer {
    pub fn new(weights: SeverityWeights) -> Self {
        Self { weights }
    }

    /// Score in [0, 100], rounded to 2 decimal places
    pub fn score(&self, issues: &[Issue], metrics: &Metrics) -> f64 {
        self.breakdown(issues, metrics).score
    }

    pub fn breakdown(&self, issues: &[Issue], metrics: &Metrics) -> ScoreBreakdown {
        let issue_penalty: f64 = issues
            .iter()
            .map(|issue| f64::from(self.weights.weight(issue.severity)))
            .sum();
        let complexity_penalty = (2.0 * metrics.complexity as f64).min(MAX_COMPLEXITY_PENALTY);
        let maintainability_penalty =
            (MAINTAINABILITY_FLOOR - metrics.maintainability_index).max(0.0);

        let penalty = issue_penalty + complexity_penalty + maintainability_penalty;
        let score = round2((100.0 - penalty).max(0.0));

        ScoreBreakdown {
            issue_penalty,
            complexity_penalty,
            maintainability_penalty,
            score,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
