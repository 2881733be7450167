//! Complexity threshold detector
//!
//! Reports functions whose cyclomatic complexity exceeds
//! `max_function_complexity` and classes whose summed method complexity
//! exceeds `max_class_complexity`.

use super::base::{ensure_line, Detector, DetectorError, FileContext};
use crate::metrics::{class_complexity, function_complexity};
use crate::models::{Issue, IssueKind, Severity};
use crate::parsers::Node;

pub struct ComplexityDetector;

impl Detector for ComplexityDetector {
    fn name(&self) -> &'static str {
        "complexity"
    }

    fn description(&self) -> &'static str {
        "complexity"
    }

    fn error_kind(&self) -> IssueKind {
        IssueKind::ComplexityAnalysisError
    }

    fn detect(&self, ctx: &FileContext<'_>) -> Result<Vec<Issue>, DetectorError> {
        let max_function = ctx.config.max_function_complexity;
        let max_class = ctx.config.max_class_complexity;
        let mut issues = Vec::new();

        for node in ctx.tree.walk() {
            match node {
                Node::Function(f) => {
                    let complexity = function_complexity(f);
                    if complexity > max_function {
                        issues.push(
                            Issue::new(
                                ctx.path,
                                ensure_line(ctx, f.line)?,
                                IssueKind::HighComplexity,
                                Severity::Warning,
                                format!(
                                    "Function '{}' has complexity {} (max {})",
                                    f.name, complexity, max_function
                                ),
                            )
                            .with_suggestion(
                                "Consider breaking down the function into smaller, simpler functions",
                            ),
                        );
                    }
                }
                Node::Class(c) => {
                    let complexity = class_complexity(c);
                    if complexity > max_class {
                        issues.push(
                            Issue::new(
                                ctx.path,
                                ensure_line(ctx, c.line)?,
                                IssueKind::HighClassComplexity,
                                Severity::Warning,
                                format!(
                                    "Class '{}' has complexity {} (max {})",
                                    c.name, complexity, max_class
                                ),
                            )
                            .with_suggestion("Consider splitting the class into multiple classes"),
                        );
                    }
                }
                Node::Branch(_)
                | Node::Loop(_)
                | Node::Handler(_)
                | Node::BoolOp(_)
                | Node::Binding(_) => {}
            }
        }

        Ok(issues)
    }
}
