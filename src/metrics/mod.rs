//! Per-file structural metrics
//!
//! Line counts come from the raw text; function/class counts and complexity
//! come from the syntax tree. Both feed the maintainability index.

pub mod complexity;

pub use complexity::{class_complexity, function_complexity};

use crate::models::Metrics;
use crate::parsers::{physical_lines, Node, SyntaxTree};

/// Maintainability index, floored at 0 and never clamped above.
///
/// `171 - 5.2 * complexity - 0.23 * lines_of_code - 16.2 * function_count`
pub fn maintainability_index(complexity: u64, lines_of_code: u64, function_count: u64) -> f64 {
    let mi = 171.0
        - 5.2 * complexity as f64
        - 0.23 * lines_of_code as f64
        - 16.2 * function_count as f64;
    mi.max(0.0)
}

/// Line breakdown of a source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineCounts {
    pub total: u64,
    pub comments: u64,
    pub blank: u64,
}

impl LineCounts {
    pub fn of(source: &str) -> Self {
        let mut counts = Self::default();
        for line in physical_lines(source) {
            counts.total += 1;
            let stripped = line.trim();
            if stripped.is_empty() {
                counts.blank += 1;
            } else if stripped.starts_with('#') {
                counts.comments += 1;
            }
        }
        counts
    }

    pub fn code(&self) -> u64 {
        self.total - self.comments - self.blank
    }
}

/// Compute the metrics for one parsed file
pub fn collect_metrics(source: &str, tree: &SyntaxTree) -> Metrics {
    let lines = LineCounts::of(source);

    let mut function_count = 0u64;
    let mut class_count = 0u64;
    let mut complexity = 0u64;
    for node in tree.walk() {
        match node {
            Node::Function(f) => {
                function_count += 1;
                complexity += u64::from(function_complexity(f));
            }
            Node::Class(_) => class_count += 1,
            Node::Branch(_)
            | Node::Loop(_)
            | Node::Handler(_)
            | Node::BoolOp(_)
            | Node::Binding(_) => {}
        }
    }

    let lines_of_code = lines.code();
    Metrics {
        lines_of_code,
        comment_lines: lines.comments,
        blank_lines: lines.blank,
        function_count,
        class_count,
        complexity,
        maintainability_index: maintainability_index(complexity, lines_of_code, function_count),
    }
}
