//! Operation executors
//!
//! An executor performs one logical unit of filesystem metadata work and reports
//! how long each step took. The worker loop drives an executor repeatedly and is
//! agnostic to what the unit of work is, the same way it would be agnostic to the
//! kernel interface behind an IO engine.
//!
//! # Executors
//!
//! - **Mix**: create (zero-length regular file) + stat + unlink on a fresh path
//! - **Stat**: a single stat on a uniformly chosen path of a pre-built tree
//! - **Mock**: scripted latencies and injected failures, no syscalls (tests)
//!
//! # Example
//!
//! ```no_run
//! use fsbench::engine::{OperationExecutor, mix::MixExecutor};
//!
//! let mut executor = MixExecutor::new("/mnt/bench".into(), 0);
//! let latencies = executor.execute(0)?;
//! println!("create={}ns stat={}ns unlink={}ns",
//!     latencies.get(0), latencies.get(1), latencies.get(2));
//! # Ok::<(), fsbench::engine::OperationError>(())
//! ```

pub mod mix;
pub mod mock;
pub mod stat;
pub mod syscall;

use crate::config::{WorkloadConfig, WorkloadKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum number of timed steps in one operation (create, stat, unlink)
pub const MAX_STEPS: usize = 3;

/// A single timed filesystem step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    Create,
    Stat,
    Unlink,
}

impl Step {
    /// Name of the syscall that implements this step
    pub fn syscall(&self) -> &'static str {
        match self {
            Step::Create => "mknod",
            Step::Stat => "stat",
            Step::Unlink => "unlink",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}()", self.syscall())
    }
}

/// Kind of operation an executor performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// create + stat + unlink
    Mix,
    /// bare stat
    Stat,
}

impl OperationKind {
    /// Steps measured per operation, in report column order
    pub fn steps(&self) -> &'static [Step] {
        match self {
            OperationKind::Mix => &[Step::Create, Step::Stat, Step::Unlink],
            OperationKind::Stat => &[Step::Stat],
        }
    }

    /// Number of latency columns this kind produces
    pub fn dimensions(&self) -> usize {
        self.steps().len()
    }

    /// Report column of `step`, if this kind measures it
    pub fn column_of(&self, step: Step) -> Option<usize> {
        self.steps().iter().position(|s| *s == step)
    }
}

impl From<&WorkloadKind> for OperationKind {
    fn from(kind: &WorkloadKind) -> Self {
        match kind {
            WorkloadKind::Mix => OperationKind::Mix,
            WorkloadKind::Stat { .. } => OperationKind::Stat,
        }
    }
}

/// Latencies of one completed operation, one value per step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepLatencies {
    values: [u64; MAX_STEPS],
    len: usize,
}

impl StepLatencies {
    /// Latency of a single-step operation
    pub fn single(nanos: u64) -> Self {
        Self {
            values: [nanos, 0, 0],
            len: 1,
        }
    }

    /// Latencies of a create/stat/unlink mix
    pub fn mix(create: u64, stat: u64, unlink: u64) -> Self {
        Self {
            values: [create, stat, unlink],
            len: 3,
        }
    }

    /// Number of steps measured
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Latency of the step in column `index`
    pub fn get(&self, index: usize) -> u64 {
        self.as_slice()[index]
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.values[..self.len]
    }

    /// Sum of all step latencies (time spent in this operation)
    pub fn total(&self) -> u64 {
        self.as_slice().iter().fold(0u64, |acc, v| acc.saturating_add(*v))
    }
}

/// A create/stat/unlink syscall failed
#[derive(Debug, Error)]
#[error("{step} failed on {}: {source}", path.display())]
pub struct OperationError {
    /// Step that failed; later steps of the same operation were not attempted
    pub step: Step,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl OperationError {
    pub fn new(step: Step, path: &Path, source: std::io::Error) -> Self {
        Self {
            step,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Executor of one logical unit of benchmark work
///
/// Executors are created inside the worker thread that owns them and are never
/// shared, so they only need to be `Send`.
pub trait OperationExecutor: Send {
    /// Kind of operation performed (determines the number of latency columns)
    fn kind(&self) -> OperationKind;

    /// Perform the operation for the given iteration of the owning worker
    ///
    /// # Errors
    ///
    /// Returns the first failing step. Steps after it are skipped and their
    /// latencies are never reported.
    fn execute(&mut self, iteration: u64) -> Result<StepLatencies, OperationError>;
}

/// Seed of a worker's generator, derived from the process-level seed
pub fn worker_seed(process_seed: u64, worker_id: usize) -> u64 {
    process_seed.wrapping_add(worker_id as u64)
}

/// Create the executor for one worker based on the workload configuration
pub fn create_executor(
    config: &WorkloadConfig,
    worker_id: usize,
    process_seed: u64,
) -> Box<dyn OperationExecutor> {
    match config.workload {
        WorkloadKind::Mix => Box::new(mix::MixExecutor::new(config.root.clone(), worker_id)),
        WorkloadKind::Stat {
            num_dirs,
            files_per_dir,
        } => Box::new(stat::StatExecutor::new(
            config.root.clone(),
            num_dirs,
            files_per_dir,
            worker_seed(process_seed, worker_id),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_steps() {
        assert_eq!(OperationKind::Mix.dimensions(), 3);
        assert_eq!(OperationKind::Stat.dimensions(), 1);
        assert_eq!(OperationKind::Mix.column_of(Step::Unlink), Some(2));
        assert_eq!(OperationKind::Stat.column_of(Step::Stat), Some(0));
        assert_eq!(OperationKind::Stat.column_of(Step::Create), None);
    }

    #[test]
    fn test_step_latencies_total() {
        let mix = StepLatencies::mix(10, 20, 30);
        assert_eq!(mix.len(), 3);
        assert_eq!(mix.total(), 60);
        assert_eq!(mix.as_slice(), &[10, 20, 30]);

        let single = StepLatencies::single(7);
        assert_eq!(single.len(), 1);
        assert_eq!(single.total(), 7);
        assert_eq!(single.get(0), 7);
    }

    #[test]
    fn test_operation_error_display() {
        let err = OperationError::new(
            Step::Stat,
            Path::new("/tmp/x/3/4"),
            std::io::Error::from_raw_os_error(libc::ENOENT),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("stat() failed on /tmp/x/3/4"));
    }

    #[test]
    fn test_worker_seed_distinct() {
        assert_ne!(worker_seed(42, 0), worker_seed(42, 1));
        assert_eq!(worker_seed(u64::MAX, 1), 0);
    }
}
