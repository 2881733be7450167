//! Configuration module for pyquality
//!
//! This module handles:
//! - Project-level configuration (pyquality.toml / .pyqualityrc.json)
//! - Explicit `--config` files
//! - Threshold and severity-weight defaults
//! - Validation (an invalid configuration aborts the run)

mod project_config;

pub use project_config::{
    load_config_file,
    load_project_config,
    ConfigError,
    ConfigOverrides,
    IgnoreMatcher,
    QualityConfig,
    SeverityWeights,
    CONFIG_FILE_NAMES,
    DEFAULT_CONFIG_TEMPLATE,
    DEFAULT_IGNORE_PATTERNS,
};
