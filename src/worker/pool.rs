//! Fork-join execution of all workers
//!
//! One OS thread per worker. Each thread builds its own executor, runs to
//! completion and returns its [`WorkerReport`]; the pool joins every thread
//! before returning, so the latency store is never read while a worker may
//! still write to it.

use super::{Bound, Worker, WorkerReport};
use crate::engine::OperationExecutor;
use crate::stats::LatencyStore;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("worker {0} panicked")]
    Panicked(usize),

    #[error("{bound:?} does not fit a store of {slots} slot(s) per worker")]
    BoundMismatch { bound: Bound, slots: usize },
}

/// Count-bound workers need one slot per operation, time-bound workers exactly one
fn check_bound(bound: Bound, slots: usize) -> Result<(), PoolError> {
    let fits = match bound {
        Bound::Count(count) => usize::try_from(count).map_or(false, |count| count == slots),
        Bound::Time(_) => slots == 1,
    };
    if fits {
        Ok(())
    } else {
        Err(PoolError::BoundMismatch { bound, slots })
    }
}

/// Run one worker per store partition and wait for all of them
///
/// `factory` is called on the worker's own thread with the worker id.
/// Reports are returned in worker order. Fails without starting any thread
/// when `bound` does not match the store's slots per worker.
pub fn run_workers<F>(
    store: &mut LatencyStore,
    bound: Bound,
    factory: F,
) -> Result<Vec<WorkerReport>, PoolError>
where
    F: Fn(usize) -> Box<dyn OperationExecutor> + Sync,
{
    check_bound(bound, store.slots_per_worker())?;

    let slices = store.partition();
    let threads = slices.len();
    tracing::debug!(threads, ?bound, "spawning workers");

    let joined = crossbeam::scope(|scope| {
        let factory = &factory;
        let handles: Vec<_> = slices
            .into_iter()
            .map(|slice| {
                scope.spawn(move |_| {
                    let executor = factory(slice.worker_id());
                    Worker::new(slice, executor, bound).run()
                })
            })
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(worker_id, handle)| {
                handle.join().map_err(|_| PoolError::Panicked(worker_id))
            })
            .collect::<Result<Vec<_>, _>>()
    });

    match joined {
        Ok(reports) => reports,
        // Only reachable if a thread was left unjoined, which the loop above rules out
        Err(_) => Err(PoolError::Panicked(threads)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockExecutor;
    use crate::engine::{OperationKind, Step, StepLatencies};
    use crate::stats::LatencySample;
    use crate::worker::WorkerState;

    #[test]
    fn test_all_workers_fill_their_slots() {
        let mut store = LatencyStore::new(OperationKind::Mix, 4, 8).unwrap();
        let reports = run_workers(&mut store, Bound::Count(8), |worker_id| {
            let v = worker_id as u64 + 1;
            Box::new(MockExecutor::constant(OperationKind::Mix, StepLatencies::mix(v, v, v)))
        })
        .unwrap();

        assert_eq!(reports.len(), 4);
        for (worker_id, report) in reports.iter().enumerate() {
            assert_eq!(report.worker_id, worker_id);
            assert_eq!(report.state, WorkerState::Completed);
            assert_eq!(report.iterations, 8);
            for column in 0..3 {
                assert!(store
                    .worker_column(worker_id, column)
                    .iter()
                    .all(|s| *s == LatencySample::Recorded(worker_id as u64 + 1)));
            }
        }
    }

    #[test]
    fn test_failure_is_isolated_to_its_worker() {
        let mut store = LatencyStore::new(OperationKind::Stat, 3, 4).unwrap();
        let reports = run_workers(&mut store, Bound::Count(4), |worker_id| {
            let mut executor =
                MockExecutor::constant(OperationKind::Stat, StepLatencies::single(7));
            if worker_id == 1 {
                executor.fail_at(0, Step::Stat);
            }
            Box::new(executor)
        })
        .unwrap();

        assert_eq!(reports[0].state, WorkerState::Completed);
        assert_eq!(reports[1].state, WorkerState::Failed);
        assert_eq!(reports[2].state, WorkerState::Completed);
        assert_eq!(store.worker_column(1, 0)[0], LatencySample::Failed);
        assert!(store.worker_column(2, 0).iter().all(|s| *s == LatencySample::Recorded(7)));
    }

    #[test]
    fn test_panicking_worker_reported() {
        let mut store = LatencyStore::new(OperationKind::Stat, 2, 1).unwrap();
        let result = run_workers(&mut store, Bound::Count(1), |worker_id| {
            if worker_id == 1 {
                panic!("executor construction failed");
            }
            Box::new(MockExecutor::constant(OperationKind::Stat, StepLatencies::single(1)))
        });

        assert!(matches!(result, Err(PoolError::Panicked(1))));
    }

    #[test]
    fn test_count_bound_must_match_slots() {
        let mut store = LatencyStore::new(OperationKind::Stat, 1, 2).unwrap();
        let executor = MockExecutor::constant(OperationKind::Stat, StepLatencies::single(9));

        let result = run_workers(&mut store, Bound::Count(5), |_| Box::new(executor.clone()));

        assert!(matches!(
            result,
            Err(PoolError::BoundMismatch {
                bound: Bound::Count(5),
                slots: 2
            })
        ));
        assert!(executor.executed().is_empty());
        assert!(store.column(0).iter().all(|s| *s == LatencySample::Pending));
    }

    #[test]
    fn test_time_bound_needs_single_slot() {
        let mut store = LatencyStore::new(OperationKind::Stat, 2, 3).unwrap();
        let result = run_workers(&mut store, Bound::Time(1_000), |_| {
            Box::new(MockExecutor::constant(OperationKind::Stat, StepLatencies::single(1)))
        });

        assert!(matches!(result, Err(PoolError::BoundMismatch { slots: 3, .. })));
    }
}
