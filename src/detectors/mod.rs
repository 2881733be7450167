//! Issue detectors
//!
//! Three built-in rule checks run on every parsed file:
//!
//! - `LineLengthDetector` - physical lines over `max_line_length`
//! - `NamingDetector` - function, class and variable naming conventions
//! - `ComplexityDetector` - function and class cyclomatic complexity
//!
//! The `DetectorEngine` runs them in isolation from each other. External
//! linters (flake8) live behind the `ExternalLinter` trait and are driven by
//! the pipeline, since they work on the file path rather than the tree.

mod base;
mod complexity;
mod engine;
mod external_tool;
mod flake8;
mod line_length;
mod naming;

pub use base::{ensure_line, Detector, DetectorError, FileContext};
pub use complexity::ComplexityDetector;
pub use engine::DetectorEngine;
pub use external_tool::{run_external_tool, ExternalToolResult};
pub use flake8::{parse_output as parse_flake8_output, ExternalLinter, Flake8Linter, LinterOutcome};
pub use line_length::LineLengthDetector;
pub use naming::{
    is_valid_class_name, is_valid_function_name, is_valid_variable_name, NamingDetector,
};
