//! Worker thread implementation
//!
//! A [`Worker`] drives one [`OperationExecutor`] in a loop and writes the measured
//! latencies into its own [`WorkerSlice`] of the latency store.
//!
//! # Termination
//!
//! - **Count-bound**: exactly `load` operations; operation `i` is stored at slot `i`
//! - **Time-bound**: operations repeat while the accumulated latency of all steps
//!   is below the duration; the per-step running means are stored at slot 0
//!
//! The time-bound check happens before each operation, so a worker always
//! completes at least one operation and may overshoot the duration by at most
//! one operation.
//!
//! # Failure
//!
//! The first failing step stops the worker. The failed step's column is marked
//! at the current slot and the error is returned in the [`WorkerReport`]; other
//! workers are unaffected.
//!
//! # Example
//!
//! ```
//! use fsbench::engine::{OperationKind, StepLatencies};
//! use fsbench::engine::mock::MockExecutor;
//! use fsbench::stats::LatencyStore;
//! use fsbench::worker::{Bound, Worker, WorkerState};
//!
//! let mut store = LatencyStore::new(OperationKind::Stat, 1, 4).unwrap();
//! let slice = store.partition().pop().unwrap();
//! let executor = MockExecutor::constant(OperationKind::Stat, StepLatencies::single(100));
//!
//! let report = Worker::new(slice, Box::new(executor), Bound::Count(4)).run();
//! assert_eq!(report.state, WorkerState::Completed);
//! assert_eq!(report.iterations, 4);
//! ```

pub mod pool;

use crate::config::{TerminationMode, WorkloadConfig};
use crate::engine::{OperationError, OperationExecutor, StepLatencies, MAX_STEPS};
use crate::stats::WorkerSlice;
use crate::util::time::{calculate_rate, format_nanos, format_rate};

/// What stops a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Number of operations
    Count(u64),
    /// Accumulated step latency in nanoseconds
    Time(u64),
}

impl Bound {
    /// Bound of every worker of a validated configuration
    pub fn from_config(config: &WorkloadConfig) -> Self {
        match config.termination {
            TerminationMode::CountBound => Bound::Count(config.load),
            TerminationMode::TimeBound => Bound::Time(config.duration_ns().unwrap_or(u64::MAX)),
        }
    }
}

/// Lifecycle of a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Running,
    Completed,
    Failed,
}

/// Outcome of one worker
#[derive(Debug)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub state: WorkerState,
    /// Operations completed successfully
    pub iterations: u64,
    /// Sum of all measured step latencies
    pub elapsed_ns: u64,
    /// Set when `state` is `Failed`
    pub error: Option<OperationError>,
}

impl WorkerReport {
    /// Operations per second over the measured time
    pub fn rate(&self) -> f64 {
        calculate_rate(self.iterations, self.elapsed_ns)
    }
}

/// Worker execution unit
///
/// Owns its executor and its slice of the latency store; shares nothing.
pub struct Worker<'a> {
    id: usize,
    executor: Box<dyn OperationExecutor>,
    slice: WorkerSlice<'a>,
    bound: Bound,
    state: WorkerState,
    iterations: u64,
    elapsed_ns: u64,
    /// Per-step sums for the time-bound mean
    sums: [u128; MAX_STEPS],
    error: Option<OperationError>,
}

impl<'a> Worker<'a> {
    pub fn new(slice: WorkerSlice<'a>, executor: Box<dyn OperationExecutor>, bound: Bound) -> Self {
        Self {
            id: slice.worker_id(),
            executor,
            slice,
            bound,
            state: WorkerState::Running,
            iterations: 0,
            elapsed_ns: 0,
            sums: [0; MAX_STEPS],
            error: None,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Advance by at most one operation
    ///
    /// Returns the state after the step. Calling `step` on a finished worker is
    /// a no-op.
    pub fn step(&mut self) -> WorkerState {
        if self.state != WorkerState::Running {
            return self.state;
        }

        if self.should_stop() {
            self.finish();
            return self.state;
        }

        match self.executor.execute(self.iterations) {
            Ok(latencies) => self.record(&latencies),
            Err(err) => self.fail(err),
        }
        self.state
    }

    /// Run until completion or failure
    pub fn run(mut self) -> WorkerReport {
        tracing::debug!(worker = self.id, bound = ?self.bound, "worker started");
        while self.step() == WorkerState::Running {}
        self.into_report()
    }

    pub fn into_report(self) -> WorkerReport {
        match &self.error {
            None => tracing::debug!(
                worker = self.id,
                ops = self.iterations,
                elapsed = %format_nanos(self.elapsed_ns),
                rate = %format_rate(calculate_rate(self.iterations, self.elapsed_ns)),
                "worker completed"
            ),
            Some(err) => tracing::warn!(
                worker = self.id,
                ops = self.iterations,
                error = %err,
                "worker stopped on error"
            ),
        }

        WorkerReport {
            worker_id: self.id,
            state: self.state,
            iterations: self.iterations,
            elapsed_ns: self.elapsed_ns,
            error: self.error,
        }
    }

    fn should_stop(&self) -> bool {
        match self.bound {
            Bound::Count(count) => self.iterations >= count,
            Bound::Time(duration_ns) => self.elapsed_ns >= duration_ns,
        }
    }

    /// Slot the current operation writes to
    fn slot(&self) -> usize {
        match self.bound {
            Bound::Count(_) => self.iterations as usize,
            Bound::Time(_) => 0,
        }
    }

    fn record(&mut self, latencies: &StepLatencies) {
        let slot = self.slot();
        match self.bound {
            Bound::Count(_) => self.slice.record(slot, latencies),
            Bound::Time(_) => {
                for (sum, value) in self.sums.iter_mut().zip(latencies.as_slice()) {
                    *sum += u128::from(*value);
                }
            }
        }
        self.elapsed_ns = self.elapsed_ns.saturating_add(latencies.total());
        self.iterations += 1;
    }

    fn fail(&mut self, err: OperationError) {
        let slot = self.slot();
        if let Some(column) = self.executor.kind().column_of(err.step) {
            self.slice.mark_failed(slot, column);
        }
        self.error = Some(err);
        self.state = WorkerState::Failed;
    }

    fn finish(&mut self) {
        if let Bound::Time(_) = self.bound {
            let iterations = u128::from(self.iterations.max(1));
            let dims = self.executor.kind().dimensions();
            let mut means = [0u64; MAX_STEPS];
            for (mean, sum) in means.iter_mut().zip(&self.sums).take(dims) {
                *mean = (sum / iterations) as u64;
            }
            let latencies = match dims {
                1 => StepLatencies::single(means[0]),
                _ => StepLatencies::mix(means[0], means[1], means[2]),
            };
            self.slice.record(0, &latencies);
        }
        self.state = WorkerState::Completed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockExecutor;
    use crate::engine::{OperationKind, Step};
    use crate::stats::{LatencySample, LatencyStore};

    fn run_single(
        kind: OperationKind,
        slots: usize,
        executor: MockExecutor,
        bound: Bound,
    ) -> (LatencyStore, WorkerReport) {
        let mut store = LatencyStore::new(kind, 1, slots).unwrap();
        let report = {
            let slice = store.partition().pop().unwrap();
            Worker::new(slice, Box::new(executor), bound).run()
        };
        (store, report)
    }

    #[test]
    fn test_count_bound_fills_slots_in_order() {
        let executor = MockExecutor::new(
            OperationKind::Mix,
            vec![StepLatencies::mix(1, 2, 3), StepLatencies::mix(4, 5, 6)],
        );
        let (store, report) = run_single(OperationKind::Mix, 3, executor.clone(), Bound::Count(3));

        assert_eq!(report.state, WorkerState::Completed);
        assert_eq!(report.iterations, 3);
        assert_eq!(report.elapsed_ns, 6 + 15 + 6);
        assert!(report.error.is_none());
        assert_eq!(executor.executed(), vec![0, 1, 2]);
        assert_eq!(
            store.column(0),
            &[LatencySample::Recorded(1), LatencySample::Recorded(4), LatencySample::Recorded(1)]
        );
        assert_eq!(store.column(2)[1], LatencySample::Recorded(6));
    }

    #[test]
    fn test_time_bound_stops_after_duration() {
        // 3ms per operation against a 1s budget
        let executor = MockExecutor::constant(
            OperationKind::Mix,
            StepLatencies::mix(1_000_000, 1_000_000, 1_000_000),
        );
        let duration = 1_000_000_000;
        let (store, report) = run_single(OperationKind::Mix, 1, executor, Bound::Time(duration));

        assert_eq!(report.state, WorkerState::Completed);
        assert!(report.elapsed_ns >= duration);
        assert!(report.elapsed_ns < duration + 3_000_000);
        assert_eq!(report.iterations, 334);
        for column in 0..3 {
            assert_eq!(store.column(column), &[LatencySample::Recorded(1_000_000)]);
        }
    }

    #[test]
    fn test_time_bound_mean_truncates() {
        let executor = MockExecutor::new(
            OperationKind::Stat,
            vec![StepLatencies::single(10), StepLatencies::single(11)],
        );
        let (store, report) = run_single(OperationKind::Stat, 1, executor, Bound::Time(21));

        assert_eq!(report.iterations, 2);
        assert_eq!(store.column(0), &[LatencySample::Recorded(10)]);
    }

    #[test]
    fn test_time_bound_runs_at_least_once() {
        let executor = MockExecutor::constant(OperationKind::Stat, StepLatencies::single(5_000));
        let (store, report) = run_single(OperationKind::Stat, 1, executor, Bound::Time(1));

        assert_eq!(report.iterations, 1);
        assert_eq!(store.column(0), &[LatencySample::Recorded(5_000)]);
    }

    #[test]
    fn test_failure_marks_step_column() {
        let mut executor = MockExecutor::constant(OperationKind::Mix, StepLatencies::mix(1, 1, 1));
        executor.fail_at(2, Step::Stat);
        let (store, report) = run_single(OperationKind::Mix, 5, executor.clone(), Bound::Count(5));

        assert_eq!(report.state, WorkerState::Failed);
        assert_eq!(report.iterations, 2);
        assert_eq!(report.error.as_ref().map(|e| e.step), Some(Step::Stat));
        assert_eq!(executor.executed(), vec![0, 1, 2]);
        assert_eq!(store.column(1)[2], LatencySample::Failed);
        assert_eq!(store.column(0)[2], LatencySample::Pending);
        assert_eq!(store.column(0)[3], LatencySample::Pending);
    }

    #[test]
    fn test_time_bound_failure() {
        let mut executor = MockExecutor::constant(OperationKind::Stat, StepLatencies::single(1));
        executor.fail_at(0, Step::Stat);
        let (store, report) = run_single(OperationKind::Stat, 1, executor, Bound::Time(1_000));

        assert_eq!(report.state, WorkerState::Failed);
        assert_eq!(report.iterations, 0);
        assert_eq!(store.column(0), &[LatencySample::Failed]);
    }

    #[test]
    fn test_step_after_finish_is_noop() {
        let mut store = LatencyStore::new(OperationKind::Stat, 1, 1).unwrap();
        let slice = store.partition().pop().unwrap();
        let executor = MockExecutor::constant(OperationKind::Stat, StepLatencies::single(1));
        let mut worker = Worker::new(slice, Box::new(executor.clone()), Bound::Count(1));

        assert_eq!(worker.step(), WorkerState::Running);
        assert_eq!(worker.step(), WorkerState::Completed);
        assert_eq!(worker.step(), WorkerState::Completed);
        assert_eq!(executor.executed(), vec![0]);
    }

    #[test]
    fn test_report_rate() {
        let report = WorkerReport {
            worker_id: 0,
            state: WorkerState::Completed,
            iterations: 10,
            elapsed_ns: 1_000_000_000,
            error: None,
        };
        assert_eq!(report.rate(), 10.0);
    }
}
