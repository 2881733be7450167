//! Project-level configuration support
//!
//! Loads per-project configuration from `pyquality.toml` or `.pyqualityrc.json`
//! in the project root, or from an explicit file passed with `--config`.
//!
//! # Configuration Format
//!
//! ```toml
//! # pyquality.toml
//! max_line_length = 100
//! max_function_complexity = 12
//! max_class_complexity = 30
//! ignore_patterns = ["build", "*.pyc"]
//!
//! [severity_weights]
//! error = 5
//! ```
//!
//! Every field is optional. Severity weights are merged over the defaults, so
//! overriding `error` keeps `warning = 2` and `info = 1`.

use crate::models::Severity;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Config files searched in the project root, in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &["pyquality.toml", ".pyqualityrc.json"];

/// Built-in ignore patterns applied by file discovery.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    "__pycache__",
    ".git",
    ".venv",
    "venv",
    "node_modules",
    "*.pyc",
    "*.pyo",
];

/// Template written by `pyquality init`
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# pyquality configuration
# Every setting is optional; the values below are the defaults.

# Lines longer than this are reported (trailing newline excluded)
max_line_length = 79

# Cyclomatic complexity thresholds
max_function_complexity = 10
max_class_complexity = 20

# Paths containing any of these are skipped (patterns with '*' are globs)
ignore_patterns = ["__pycache__", ".git", ".venv", "venv", "node_modules", "*.pyc", "*.pyo"]

# Seconds before an external linter run is abandoned
external_tool_timeout_secs = 30

# Score penalty per issue, by severity
[severity_weights]
error = 3
warning = 2
info = 1
"#;

/// Errors raised while loading or validating configuration.
///
/// All of these are fatal: the run stops before any file is analyzed.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid ignore pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Penalty weight per severity, keyed by severity name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeverityWeights(BTreeMap<String, u32>);

impl SeverityWeights {
    /// Weight applied when a severity has no configured entry
    pub const FALLBACK_WEIGHT: u32 = 1;

    /// Weight for a severity (1 when not configured)
    pub fn weight(&self, severity: Severity) -> u32 {
        self.0
            .get(severity.as_str())
            .copied()
            .unwrap_or(Self::FALLBACK_WEIGHT)
    }

    /// Set a single weight
    pub fn set(&mut self, severity: Severity, weight: u32) {
        self.0.insert(severity.as_str().to_string(), weight);
    }

    /// Configured keys that are not a known severity
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.0
            .keys()
            .filter(|key| key.parse::<Severity>().is_err())
            .map(String::as_str)
            .collect()
    }

    fn merged_with(mut self, overrides: BTreeMap<String, u32>) -> Self {
        for (key, weight) in overrides {
            self.0.insert(key.to_lowercase(), weight);
        }
        self
    }
}

impl Default for SeverityWeights {
    fn default() -> Self {
        let mut weights = BTreeMap::new();
        weights.insert("error".to_string(), 3);
        weights.insert("warning".to_string(), 2);
        weights.insert("info".to_string(), 1);
        Self(weights)
    }
}

impl<'de> Deserialize<'de> for SeverityWeights {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let overrides = BTreeMap::<String, u32>::deserialize(deserializer)?;
        Ok(SeverityWeights::default().merged_with(overrides))
    }
}

/// Analysis configuration shared (read-only) by every file task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Maximum physical line length (default: 79)
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,

    /// Maximum cyclomatic complexity per function (default: 10)
    #[serde(default = "default_max_function_complexity")]
    pub max_function_complexity: u32,

    /// Maximum summed method complexity per class (default: 20)
    #[serde(default = "default_max_class_complexity")]
    pub max_class_complexity: u32,

    /// Score penalty per issue severity (default: error 3, warning 2, info 1)
    #[serde(default)]
    pub severity_weights: SeverityWeights,

    /// Path patterns skipped by file discovery
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    /// Timeout for one external linter run (default: 30s)
    #[serde(default = "default_external_tool_timeout_secs")]
    pub external_tool_timeout_secs: u64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            max_line_length: default_max_line_length(),
            max_function_complexity: default_max_function_complexity(),
            max_class_complexity: default_max_class_complexity(),
            severity_weights: SeverityWeights::default(),
            ignore_patterns: default_ignore_patterns(),
            external_tool_timeout_secs: default_external_tool_timeout_secs(),
        }
    }
}

fn default_max_line_length() -> usize {
    79
}
fn default_max_function_complexity() -> u32 {
    10
}
fn default_max_class_complexity() -> u32 {
    20
}
fn default_ignore_patterns() -> Vec<String> {
    DEFAULT_IGNORE_PATTERNS.iter().map(|s| s.to_string()).collect()
}
fn default_external_tool_timeout_secs() -> u64 {
    30
}

/// Values given on the command line; they win over file values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub max_line_length: Option<usize>,
    pub max_function_complexity: Option<u32>,
    pub max_class_complexity: Option<u32>,
}

impl QualityConfig {
    /// Reject values that would make the analysis meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_line_length == 0 {
            return Err(ConfigError::Invalid(
                "max_line_length must be at least 1".to_string(),
            ));
        }
        if self.max_function_complexity == 0 {
            return Err(ConfigError::Invalid(
                "max_function_complexity must be at least 1".to_string(),
            ));
        }
        if self.max_class_complexity == 0 {
            return Err(ConfigError::Invalid(
                "max_class_complexity must be at least 1".to_string(),
            ));
        }
        if self.external_tool_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "external_tool_timeout_secs must be at least 1".to_string(),
            ));
        }
        IgnoreMatcher::new(&self.ignore_patterns)?;
        for key in self.severity_weights.unknown_keys() {
            warn!("Ignoring weight for unknown severity '{}'", key);
        }
        Ok(())
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(v) = overrides.max_line_length {
            self.max_line_length = v;
        }
        if let Some(v) = overrides.max_function_complexity {
            self.max_function_complexity = v;
        }
        if let Some(v) = overrides.max_class_complexity {
            self.max_class_complexity = v;
        }
        self
    }

    /// Compile `ignore_patterns` for file discovery
    pub fn ignore_matcher(&self) -> Result<IgnoreMatcher, ConfigError> {
        IgnoreMatcher::new(&self.ignore_patterns)
    }
}

/// Compiled ignore patterns.
///
/// Patterns containing `*`, `?` or `[` are globs, matched against the whole
/// path and against its final component. Anything else matches as a
/// substring of the path.
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    substrings: Vec<String>,
    globs: GlobSet,
}

impl IgnoreMatcher {
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let mut substrings = Vec::new();
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            if is_glob(pattern) {
                let glob = Glob::new(pattern).map_err(|source| ConfigError::Pattern {
                    pattern: pattern.clone(),
                    source,
                })?;
                builder.add(glob);
            } else {
                substrings.push(pattern.clone());
            }
        }
        let globs = builder.build().map_err(|source| ConfigError::Pattern {
            pattern: patterns.join(", "),
            source,
        })?;
        Ok(Self { substrings, globs })
    }

    pub fn is_match(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        if self
            .substrings
            .iter()
            .any(|pattern| path_str.contains(pattern.as_str()))
        {
            return true;
        }
        self.globs.is_match(path)
            || path
                .file_name()
                .is_some_and(|name| self.globs.is_match(name))
    }
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Load configuration from the project root.
///
/// Searches `pyquality.toml`, then `.pyqualityrc.json`. Returns defaults if
/// neither exists. A file that exists but fails to load is an error.
pub fn load_project_config(root: &Path) -> Result<QualityConfig, ConfigError> {
    for name in CONFIG_FILE_NAMES {
        let path = root.join(name);
        if path.is_file() {
            let config = load_config_file(&path)?;
            debug!("Loaded project config from {}", path.display());
            return Ok(config);
        }
    }

    debug!("No project config found, using defaults");
    let config = QualityConfig::default();
    config.validate()?;
    Ok(config)
}

/// Load and validate a config file (TOML for `.toml`, JSON otherwise)
pub fn load_config_file(path: &Path) -> Result<QualityConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let config: QualityConfig = if is_toml {
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?
    };

    config.validate()?;
    Ok(config)
}
