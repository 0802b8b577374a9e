//! Stat-only executor
//!
//! Stats a uniformly chosen `<root>/<dir>/<file>` of the fixture built by
//! [`crate::target::tree::StatTree`]. The directory index is drawn first, then
//! the file index, from the worker's own generator.

use super::syscall;
use super::{OperationError, OperationExecutor, OperationKind, Step, StepLatencies};
use crate::distribution::{uniform::UniformDistribution, Distribution};
use crate::util::clock::{ClockSource, MonotonicClock};
use std::path::PathBuf;

/// Executor for the stat workload
pub struct StatExecutor<C: ClockSource = MonotonicClock> {
    root: PathBuf,
    num_dirs: u64,
    files_per_dir: u64,
    distribution: Box<dyn Distribution>,
    clock: C,
}

impl StatExecutor<MonotonicClock> {
    /// Create a stat executor with a seeded uniform distribution
    pub fn new(root: PathBuf, num_dirs: u64, files_per_dir: u64, seed: u64) -> Self {
        Self::with_parts(
            root,
            num_dirs,
            files_per_dir,
            Box::new(UniformDistribution::with_seed(seed)),
            MonotonicClock,
        )
    }
}

impl<C: ClockSource> StatExecutor<C> {
    /// Create a stat executor from an explicit distribution and clock
    pub fn with_parts(
        root: PathBuf,
        num_dirs: u64,
        files_per_dir: u64,
        distribution: Box<dyn Distribution>,
        clock: C,
    ) -> Self {
        Self {
            root,
            num_dirs,
            files_per_dir,
            distribution,
            clock,
        }
    }

    /// Draw the next target path
    fn next_path(&mut self) -> PathBuf {
        let dir = self.distribution.next_index(self.num_dirs);
        let file = self.distribution.next_index(self.files_per_dir);
        self.root.join(dir.to_string()).join(file.to_string())
    }
}

impl<C: ClockSource> OperationExecutor for StatExecutor<C> {
    fn kind(&self) -> OperationKind {
        OperationKind::Stat
    }

    fn execute(&mut self, _iteration: u64) -> Result<StepLatencies, OperationError> {
        let path = self.next_path();
        let c_path = syscall::path_to_cstring(&path)
            .map_err(|e| OperationError::new(Step::Stat, &path, e))?;

        let begin = self.clock.now();
        syscall::stat(&c_path).map_err(|e| OperationError::new(Step::Stat, &path, e))?;
        let end = self.clock.now();

        Ok(StepLatencies::single(end.saturating_sub(begin)))
    }
}
