//! Workload definition enums

use serde::{Deserialize, Serialize};
use std::fmt;

/// What each worker iteration does
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WorkloadKind {
    /// create + stat + unlink on a fresh file under the root
    Mix,
    /// stat on `<root>/<dir>/<file>` with dir in `[0, num_dirs)`, file in `[0, files_per_dir)`
    Stat { num_dirs: u64, files_per_dir: u64 },
}

impl Default for WorkloadKind {
    fn default() -> Self {
        Self::Mix
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkloadKind::Mix => write!(f, "mix"),
            WorkloadKind::Stat {
                num_dirs,
                files_per_dir,
            } => write!(f, "stat ({} dirs x {} files)", num_dirs, files_per_dir),
        }
    }
}

/// How results are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Every retained sample (`full-lat`)
    #[serde(alias = "full-lat")]
    Detailed,
    /// Arithmetic mean per dimension (`res-lat`)
    #[serde(alias = "res-lat")]
    Summary,
}

impl Default for ReportMode {
    fn default() -> Self {
        Self::Summary
    }
}

/// What bounds a worker's loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerminationMode {
    /// `load` is the number of operations per worker (`no-time`)
    #[serde(alias = "no-time")]
    CountBound,
    /// `load` is the per-worker duration in seconds (`time-based`)
    #[serde(alias = "time-based")]
    TimeBound,
}

impl Default for TerminationMode {
    fn default() -> Self {
        Self::CountBound
    }
}

impl fmt::Display for TerminationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationMode::CountBound => write!(f, "count-bound"),
            TerminationMode::TimeBound => write!(f, "time-bound"),
        }
    }
}
