//! Init command - write a default pyquality.toml

use crate::config::{CONFIG_FILE_NAMES, DEFAULT_CONFIG_TEMPLATE};
use anyhow::{Context, Result};
use console::style;
use std::path::{Path, PathBuf};

/// Run the init command
pub fn run(path: &Path) -> Result<()> {
    let config_path = write_default_config(path)?;
    println!(
        "\n{} Edit {} to tune thresholds and ignore patterns",
        style("✨").bold(),
        style(config_path.display()).cyan()
    );
    println!("  {} Run analysis", style("pyquality .").cyan());
    Ok(())
}

/// Write the default config into `path` unless one already exists.
///
/// Returns the path of the config in effect.
fn write_default_config(path: &Path) -> Result<PathBuf> {
    let project = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !project.is_dir() {
        anyhow::bail!("Path is not a directory: {}", project.display());
    }

    if let Some(existing) = CONFIG_FILE_NAMES
        .iter()
        .map(|name| project.join(name))
        .find(|candidate| candidate.is_file())
    {
        println!(
            "{} Config already exists at {}",
            style("✓").green(),
            style(existing.display()).cyan()
        );
        return Ok(existing);
    }

    let config_path = project.join(CONFIG_FILE_NAMES[0]);
    std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );
    Ok(config_path)
}
