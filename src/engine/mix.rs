//! create + stat + unlink mix executor
//!
//! Each iteration creates a zero-length regular file named
//! `mix-<worker>-<iteration>` directly under the root, stats it and unlinks it.
//! Every step is bounded by its own pair of clock reads. A failing step ends the
//! operation; the remaining steps are not attempted. If the file was created,
//! it is unlinked again outside the timed region before the error is returned.

use super::syscall;
use super::{OperationError, OperationExecutor, OperationKind, Step, StepLatencies};
use crate::util::clock::{ClockSource, MonotonicClock};
use std::ffi::CStr;
use std::io;
use std::path::{Path, PathBuf};

type PathOp = fn(&CStr) -> io::Result<()>;

/// The call behind each step
#[derive(Clone, Copy)]
struct StepOps {
    create: PathOp,
    stat: PathOp,
    unlink: PathOp,
}

const SYSCALL_OPS: StepOps = StepOps {
    create: syscall::mknod_regular,
    stat: syscall::stat,
    unlink: syscall::unlink,
};

/// Executor for the create/stat/unlink mix
pub struct MixExecutor<C: ClockSource = MonotonicClock> {
    root: PathBuf,
    worker_id: usize,
    clock: C,
    ops: StepOps,
}

impl MixExecutor<MonotonicClock> {
    /// Create a mix executor for `worker_id` rooted at `root`
    pub fn new(root: PathBuf, worker_id: usize) -> Self {
        Self::with_clock(root, worker_id, MonotonicClock)
    }
}

impl<C: ClockSource> MixExecutor<C> {
    /// Create a mix executor with a specific clock
    pub fn with_clock(root: PathBuf, worker_id: usize, clock: C) -> Self {
        Self {
            root,
            worker_id,
            clock,
            ops: SYSCALL_OPS,
        }
    }

    /// Path used by `iteration` of this worker
    pub fn path_for(&self, iteration: u64) -> PathBuf {
        self.root.join(format!("mix-{}-{}", self.worker_id, iteration))
    }

    #[inline(always)]
    fn timed(
        &self,
        step: Step,
        path: &Path,
        c_path: &CStr,
        op: PathOp,
    ) -> Result<u64, OperationError> {
        let begin = self.clock.now();
        op(c_path).map_err(|e| OperationError::new(step, path, e))?;
        let end = self.clock.now();
        Ok(end.saturating_sub(begin))
    }
}

impl<C: ClockSource> OperationExecutor for MixExecutor<C> {
    fn kind(&self) -> OperationKind {
        OperationKind::Mix
    }

    fn execute(&mut self, iteration: u64) -> Result<StepLatencies, OperationError> {
        let path = self.path_for(iteration);
        let c_path = syscall::path_to_cstring(&path)
            .map_err(|e| OperationError::new(Step::Create, &path, e))?;

        let create = self.timed(Step::Create, &path, &c_path, self.ops.create)?;
        let rest = self
            .timed(Step::Stat, &path, &c_path, self.ops.stat)
            .and_then(|stat| {
                let unlink = self.timed(Step::Unlink, &path, &c_path, self.ops.unlink)?;
                Ok((stat, unlink))
            });

        match rest {
            Ok((stat, unlink)) => Ok(StepLatencies::mix(create, stat, unlink)),
            Err(e) => {
                // Untimed; the step error is what gets reported
                if let Err(cleanup) = (self.ops.unlink)(&c_path) {
                    tracing::debug!(path = %path.display(), %cleanup, "cleanup unlink failed");
                }
                Err(e)
            }
        }
    }
}
