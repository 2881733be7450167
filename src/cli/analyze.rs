//! Analyze command
//!
//! Loads configuration, discovers files, runs the pipeline with a progress
//! bar, renders the report and maps it to an exit code.

use super::files::collect_python_files;
use super::AnalyzeArgs;
use crate::config::{load_config_file, load_project_config, QualityConfig};
use crate::detectors::Flake8Linter;
use crate::models::{QualityReport, Severity};
use crate::pipeline::Analyzer;
use crate::reporters::{self, OutputFormat, TextOptions};
use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::process::ExitCode;
use std::str::FromStr;
use tracing::debug;

/// Run the analyze command
pub fn run(path: &Path, args: &AnalyzeArgs, workers: Option<usize>) -> Result<ExitCode> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let format = OutputFormat::from_str(&args.format)?;
    let fail_on = args
        .fail_on
        .as_deref()
        .map(Severity::from_str)
        .transpose()
        .map_err(anyhow::Error::msg)?;

    let config = load_config(path, args)?;
    debug!("Effective config: {:?}", config);

    let files = collect_python_files(path, &config)?;
    debug!("Discovered {} Python files", files.len());

    let mut analyzer = Analyzer::new(config)?;
    if args.external != "off" {
        let timeout = analyzer.config().external_tool_timeout_secs;
        analyzer = analyzer.with_linter(Box::new(Flake8Linter::new(timeout)));
    }

    let bar = if format == OutputFormat::Text {
        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(bar_style());
        bar.set_message("Analyzing files...");
        bar
    } else {
        ProgressBar::hidden()
    };

    let results = with_workers(workers, || {
        analyzer.analyze_files_with_progress(&files, |_| bar.inc(1))
    })?;
    bar.finish_and_clear();

    let report = analyzer.report(path, results);

    let rendered = match format {
        OutputFormat::Text => {
            let options = TextOptions {
                color: args.output.is_none() && console::colors_enabled(),
                ..TextOptions::default()
            };
            reporters::render_text(&report, &options)?
        }
        OutputFormat::Json => reporters::report_with_format(&report, format)?,
    };

    match &args.output {
        Some(output) => {
            std::fs::write(output, &rendered)
                .with_context(|| format!("Failed to write report to {}", output.display()))?;
            eprintln!(
                "{} Report written to {}",
                style("✓").green(),
                style(output.display()).cyan()
            );
        }
        None => {
            print!("{}", rendered);
            if format == OutputFormat::Json {
                println!();
            }
        }
    }

    if should_fail(&report, fail_on) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Explicit `--config` file, else project config, then CLI overrides
fn load_config(path: &Path, args: &AnalyzeArgs) -> Result<QualityConfig> {
    let config = match &args.config {
        Some(file) => load_config_file(file)
            .with_context(|| format!("Failed to load config file {}", file.display()))?,
        None => {
            let root = if path.is_file() {
                path.parent().unwrap_or(Path::new("."))
            } else {
                path
            };
            load_project_config(root).context("Failed to load project configuration")?
        }
    };

    let config = config.with_overrides(&args.overrides());
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Run `f` on a dedicated pool when a worker count is given
fn with_workers<T: Send>(workers: Option<usize>, f: impl FnOnce() -> T + Send) -> Result<T> {
    match workers {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .context("Failed to start worker pool")?;
            Ok(pool.install(f))
        }
        None => Ok(f()),
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .expect("valid template")
        .progress_chars("█▓▒░  ")
}

/// True when anything at or above the threshold was found.
///
/// Without `--fail-on`, any issue fails the run.
fn should_fail(report: &QualityReport, fail_on: Option<Severity>) -> bool {
    match fail_on {
        Some(threshold) => {
            let failing = report.issues_at_least(threshold) > 0;
            if failing {
                eprintln!("Failing due to --fail-on={} threshold", threshold);
            }
            failing
        }
        None => report.total_issues > 0,
    }
}
