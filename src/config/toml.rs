//! TOML workload file parsing
//!
//! ```toml
//! root = "/mnt/test"
//! load = 10
//! threads = 4
//! report = "summary"          # or "detailed", "full-lat", "res-lat"
//! termination = "time-bound"  # or "count-bound", "time-based", "no-time"
//!
//! [workload]
//! kind = "stat"
//! num_dirs = 16
//! files_per_dir = 1000
//! ```

use super::WorkloadConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<WorkloadConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<WorkloadConfig> {
    let config: WorkloadConfig =
        ::toml::from_str(contents).context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Render a configuration as TOML (used by `--dry-run`)
pub fn to_toml_string(config: &WorkloadConfig) -> Result<String> {
    ::toml::to_string_pretty(config).context("Failed to serialize configuration")
}
