//! Configuration module
//!
//! Handles CLI argument parsing, TOML workload files, and validation.
//!
//! A [`WorkloadConfig`] is built once (from the command line or a TOML file),
//! validated, and then shared read-only with every worker for the rest of the run.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;
pub mod workload;

use crate::engine::OperationKind;
use crate::util::clock::NANOS_PER_SEC;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
pub use workload::*;

/// Complete benchmark configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Directory under which all benchmark paths live
    pub root: PathBuf,
    /// Operations per worker (count-bound) or seconds per worker (time-bound)
    pub load: u64,
    /// Number of worker threads
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Detailed (every sample) or summary (mean) output
    #[serde(default)]
    pub report: ReportMode,
    /// How `load` bounds each worker
    #[serde(default)]
    pub termination: TerminationMode,
    /// Process-level seed for path selection (entropy when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Operation performed per iteration
    #[serde(default)]
    pub workload: WorkloadKind,
}

fn default_threads() -> usize {
    1
}

impl WorkloadConfig {
    /// Operation kind executed by every worker
    pub fn kind(&self) -> OperationKind {
        OperationKind::from(&self.workload)
    }

    /// Result slots each worker owns in every latency column
    ///
    /// Count-bound workers keep one slot per operation; time-bound workers keep
    /// only their running mean.
    pub fn slots_per_worker(&self) -> usize {
        match self.termination {
            TerminationMode::CountBound => self.load as usize,
            TerminationMode::TimeBound => 1,
        }
    }

    /// Per-worker duration in nanoseconds for time-bound runs
    ///
    /// `None` for count-bound runs or when the duration does not fit in `u64`.
    pub fn duration_ns(&self) -> Option<u64> {
        match self.termination {
            TerminationMode::CountBound => None,
            TerminationMode::TimeBound => self.load.checked_mul(NANOS_PER_SEC),
        }
    }
}

impl fmt::Display for WorkloadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let load = match self.termination {
            TerminationMode::CountBound => format!("{} ops/thread", self.load),
            TerminationMode::TimeBound => format!("{}s/thread", self.load),
        };
        write!(
            f,
            "{} on {}, {} thread(s), {}, {:?} report",
            self.workload,
            self.root.display(),
            self.threads,
            load,
            self.report
        )?;
        if let Some(seed) = self.seed {
            write!(f, ", seed={}", seed)?;
        }
        Ok(())
    }
}
