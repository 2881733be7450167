//! Naming convention detector
//!
//! Function names should be snake_case, class names PascalCase and assigned
//! variables snake_case (fully upper-case names are accepted as constants).
//! The predicates are loose: a name passes the function/variable
//! check if it is lower-case *or* contains an underscore.

use super::base::{ensure_line, Detector, DetectorError, FileContext};
use crate::models::{Issue, IssueKind, Severity};
use crate::parsers::Node;

pub struct NamingDetector;

/// True if the name has at least one cased character and none upper-case
fn is_lower(name: &str) -> bool {
    let mut cased = false;
    for c in name.chars() {
        if c.is_uppercase() {
            return false;
        }
        cased |= c.is_lowercase();
    }
    cased
}

/// True if the name has at least one cased character and none lower-case
fn is_upper(name: &str) -> bool {
    let mut cased = false;
    for c in name.chars() {
        if c.is_lowercase() {
            return false;
        }
        cased |= c.is_uppercase();
    }
    cased
}

pub fn is_valid_function_name(name: &str) -> bool {
    is_lower(name) || name.contains('_')
}

pub fn is_valid_class_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase) && !name.contains('_')
}

pub fn is_valid_variable_name(name: &str) -> bool {
    is_valid_function_name(name) || is_upper(name)
}

impl Detector for NamingDetector {
    fn name(&self) -> &'static str {
        "naming"
    }

    fn description(&self) -> &'static str {
        "naming conventions"
    }

    fn error_kind(&self) -> IssueKind {
        IssueKind::NamingAnalysisError
    }

    fn detect(&self, ctx: &FileContext<'_>) -> Result<Vec<Issue>, DetectorError> {
        let mut issues = Vec::new();

        for node in ctx.tree.walk() {
            let issue = match node {
                Node::Function(f) if !is_valid_function_name(&f.name) => Issue::new(
                    ctx.path,
                    ensure_line(ctx, f.line)?,
                    IssueKind::NamingConvention,
                    Severity::Warning,
                    format!("Function '{}' should use snake_case naming", f.name),
                )
                .with_suggestion("Rename function to use snake_case (e.g., 'my_function')"),
                Node::Class(c) if !is_valid_class_name(&c.name) => Issue::new(
                    ctx.path,
                    ensure_line(ctx, c.line)?,
                    IssueKind::NamingConvention,
                    Severity::Warning,
                    format!("Class '{}' should use PascalCase naming", c.name),
                )
                .with_suggestion("Rename class to use PascalCase (e.g., 'MyClass')"),
                Node::Binding(b) if !is_valid_variable_name(&b.name) => Issue::new(
                    ctx.path,
                    ensure_line(ctx, b.line)?,
                    IssueKind::NamingConvention,
                    Severity::Info,
                    format!("Variable '{}' should use snake_case naming", b.name),
                )
                .with_suggestion("Rename variable to use snake_case (e.g., 'my_variable')"),
                Node::Function(_)
                | Node::Class(_)
                | Node::Binding(_)
                | Node::Branch(_)
                | Node::Loop(_)
                | Node::Handler(_)
                | Node::BoolOp(_) => continue,
            };
            issues.push(issue);
        }

        Ok(issues)
    }
}
