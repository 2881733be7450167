//! CLI command definitions and handlers

mod analyze;
mod files;
mod init;

pub use files::collect_python_files;

use crate::config::ConfigOverrides;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// pyquality - static quality analysis for Python projects
///
/// Checks line length, naming conventions and cyclomatic complexity, collects
/// size and maintainability metrics, and rolls everything into one score.
#[derive(Parser, Debug)]
#[command(name = "pyquality")]
#[command(
    version,
    about = "Static quality analysis for Python projects",
    long_about = "pyquality parses every Python file in a project, checks line length, \
naming conventions and cyclomatic complexity, collects size and maintainability \
metrics, and combines them into a single 0-100 quality score.\n\n\
Run without a subcommand to analyze the current directory:\n  \
pyquality .",
    after_help = "\
Examples:
  pyquality .                              Analyze current directory
  pyquality . --format json                JSON output for scripting
  pyquality /path/to/project --max-line-length 100
  pyquality . --fail-on error              Exit code 1 only for errors (CI mode)
  pyquality init                           Write a default pyquality.toml"
)]
pub struct Cli {
    /// Path to the project (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers (1-64, default: one per CPU)
    #[arg(long, global = true, value_parser = parse_workers)]
    pub workers: Option<usize>,

    #[command(flatten)]
    pub analyze: AnalyzeArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a project (the default when no subcommand is given)
    #[command(after_help = "\
Examples:
  pyquality analyze .                              Analyze current directory
  pyquality analyze . --format json -o report.json Write JSON to a file
  pyquality analyze . --external off               Built-in checks only
  pyquality analyze . --config quality.json        Use an explicit config file")]
    Analyze,

    /// Write a pyquality.toml with the default settings
    Init,
}

/// Options for the analyze command
#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Output format: text or json
    #[arg(long, short = 'f', global = true, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Output file path (default: stdout)
    #[arg(long, short = 'o', global = true)]
    pub output: Option<PathBuf>,

    /// Maximum line length (default: 79)
    #[arg(long, global = true)]
    pub max_line_length: Option<usize>,

    /// Maximum cyclomatic complexity per function (default: 10)
    #[arg(long, global = true)]
    pub max_function_complexity: Option<u32>,

    /// Maximum summed method complexity per class (default: 20)
    #[arg(long, global = true)]
    pub max_class_complexity: Option<u32>,

    /// Config file (TOML if it ends in .toml, JSON otherwise)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Control external tool execution: on (default, flake8 when installed), off (built-in only)
    #[arg(long, global = true, default_value = "on", value_parser = ["on", "off"])]
    pub external: String,

    /// Exit with code 1 only if issues at or above this severity exist
    /// (default: any issue fails)
    #[arg(long, global = true, value_parser = ["error", "warning", "info"])]
    pub fail_on: Option<String>,
}

impl AnalyzeArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            max_line_length: self.max_line_length,
            max_function_complexity: self.max_function_complexity,
            max_class_complexity: self.max_class_complexity,
        }
    }
}

/// Run the parsed command line
pub fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Some(Commands::Init) => {
            init::run(&cli.path)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Analyze) | None => analyze::run(&cli.path, &cli.analyze, cli.workers),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["pyquality"]).expect("parse");
        assert_eq!(cli.path, PathBuf::from("."));
        assert_eq!(cli.analyze.format, "text");
        assert_eq!(cli.analyze.external, "on");
        assert!(cli.command.is_none());
        assert!(cli.workers.is_none());
    }

    #[test]
    fn test_analyze_subcommand_with_flags() {
        let cli = Cli::try_parse_from([
            "pyquality",
            "analyze",
            "proj",
            "--format",
            "json",
            "--max-line-length",
            "100",
            "--fail-on",
            "error",
        ])
        .expect("parse");
        assert!(matches!(cli.command, Some(Commands::Analyze)));
        assert_eq!(cli.path, PathBuf::from("proj"));
        assert_eq!(cli.analyze.format, "json");
        assert_eq!(cli.analyze.overrides().max_line_length, Some(100));
        assert_eq!(cli.analyze.fail_on.as_deref(), Some("error"));
    }

    #[test]
    fn test_flags_without_subcommand() {
        let cli = Cli::try_parse_from(["pyquality", "src", "--external", "off", "--workers", "2"])
            .expect("parse");
        assert_eq!(cli.path, PathBuf::from("src"));
        assert_eq!(cli.analyze.external, "off");
        assert_eq!(cli.workers, Some(2));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["pyquality", "--format", "xml"]).is_err());
        assert!(Cli::try_parse_from(["pyquality", "--workers", "0"]).is_err());
        assert!(Cli::try_parse_from(["pyquality", "--max-line-length", "-5"]).is_err());
    }

    #[test]
    fn test_parse_workers() {
        assert_eq!(parse_workers("8"), Ok(8));
        assert!(parse_workers("65").is_err());
        assert!(parse_workers("many").is_err());
    }
}
