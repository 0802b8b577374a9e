//! Coordinator module
//!
//! Orchestrates workers and aggregates results.
//!
//! A run goes through these phases, in order:
//!
//! 1. Validate the configuration (no filesystem writes happen before this passes)
//! 2. Resolve the process seed
//! 3. Allocate the latency store for every worker and slot
//! 4. Fork one thread per worker and join all of them
//! 5. Fail the run if any worker failed, otherwise aggregate the store

use crate::config::validator::{validate_config, ConfigError};
use crate::config::WorkloadConfig;
use crate::engine::{create_executor, OperationError, OperationExecutor};
use crate::stats::aggregator::{aggregate, LatencyReport, ReportError};
use crate::stats::{LatencyStore, StoreError};
use crate::worker::pool::{run_workers, PoolError};
use crate::worker::{Bound, WorkerReport, WorkerState};
use thiserror::Error;

/// Why a run produced no results
#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error("worker {worker_id} failed")]
    WorkerFailed {
        worker_id: usize,
        #[source]
        source: OperationError,
    },

    #[error("incomplete results: {0}")]
    Report(#[from] ReportError),
}

/// Results of a successful run
#[derive(Debug)]
pub struct RunOutcome {
    pub report: LatencyReport,
    pub workers: Vec<WorkerReport>,
    /// Process seed the run used
    pub seed: u64,
}

/// Run the configured benchmark on the filesystem
pub fn run_benchmark(config: &WorkloadConfig) -> Result<RunOutcome, RunError> {
    let seed = resolve_seed(config);
    run_with_executors(config, seed, |worker_id| create_executor(config, worker_id, seed))
}

/// Process seed: the configured one, or fresh entropy
pub fn resolve_seed(config: &WorkloadConfig) -> u64 {
    match config.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random();
            tracing::debug!(seed, "generated process seed");
            seed
        }
    }
}

/// Run the benchmark with executors built by `factory`
pub fn run_with_executors<F>(
    config: &WorkloadConfig,
    seed: u64,
    factory: F,
) -> Result<RunOutcome, RunError>
where
    F: Fn(usize) -> Box<dyn OperationExecutor> + Sync,
{
    validate_config(config)?;
    tracing::debug!(%config, seed, "starting run");

    let mut store =
        LatencyStore::new(config.kind(), config.threads, config.slots_per_worker())?;
    let mut workers = run_workers(&mut store, Bound::from_config(config), factory)?;

    if let Some(failed) = workers.iter_mut().find(|w| w.state == WorkerState::Failed) {
        let worker_id = failed.worker_id;
        if let Some(source) = failed.error.take() {
            return Err(RunError::WorkerFailed { worker_id, source });
        }
    }

    let report = aggregate(&store, config.report)?;
    Ok(RunOutcome {
        report,
        workers,
        seed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ReportMode, TerminationMode, WorkloadKind};
    use crate::engine::mock::MockExecutor;
    use crate::engine::{OperationKind, Step, StepLatencies};
    use crate::target::tree::StatTree;
    use std::error::Error;
    use std::path::Path;
    use tempfile::TempDir;

    fn config(root: &Path, load: u64, threads: usize, report: ReportMode) -> WorkloadConfig {
        WorkloadConfig {
            root: root.to_path_buf(),
            load,
            threads,
            report,
            termination: TerminationMode::CountBound,
            seed: Some(7),
            workload: WorkloadKind::Mix,
        }
    }

    #[test]
    fn test_detailed_rows_per_worker() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(temp_dir.path(), 4, 2, ReportMode::Detailed);

        let outcome = run_with_executors(&config, 0, |worker_id| {
            let v = worker_id as u64 + 1;
            Box::new(MockExecutor::constant(OperationKind::Mix, StepLatencies::mix(v, v, v)))
        })
        .unwrap();

        let rows = outcome.report.rows();
        assert_eq!(rows.len(), 8);
        assert!(rows[..4].iter().all(|r| *r == [1, 1, 1]));
        assert!(rows[4..].iter().all(|r| *r == [2, 2, 2]));
        assert_eq!(outcome.workers.len(), 2);
    }

    #[test]
    fn test_failed_worker_fails_run() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(temp_dir.path(), 3, 3, ReportMode::Summary);

        let result = run_with_executors(&config, 0, |worker_id| {
            let mut executor =
                MockExecutor::constant(OperationKind::Mix, StepLatencies::mix(1, 1, 1));
            if worker_id == 2 {
                executor.fail_at(1, Step::Unlink);
            }
            Box::new(executor)
        });

        match result {
            Err(RunError::WorkerFailed { worker_id, source }) => {
                assert_eq!(worker_id, 2);
                assert_eq!(source.step, Step::Unlink);
            }
            other => panic!("expected worker failure, got {:?}", other.map(|o| o.report)),
        }
    }

    #[test]
    fn test_invalid_config_runs_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(temp_dir.path(), 3, 0, ReportMode::Summary);
        let executor = MockExecutor::new(OperationKind::Mix, vec![]);

        let result = run_with_executors(&config, 0, |_| Box::new(executor.clone()));
        assert!(matches!(result, Err(RunError::Config(ConfigError::NoThreads))));
        assert!(executor.executed().is_empty());
    }

    /// Two time-bound workers for one second, at 1ms and 100ms per operation
    fn run_uneven_time_bound(report: ReportMode) -> RunOutcome {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config(temp_dir.path(), 1, 2, report);
        config.termination = TerminationMode::TimeBound;
        config.workload = WorkloadKind::Stat {
            num_dirs: 1,
            files_per_dir: 1,
        };

        run_with_executors(&config, 0, |worker_id| {
            let nanos = if worker_id == 0 { 1_000_000 } else { 100_000_000 };
            Box::new(MockExecutor::constant(OperationKind::Stat, StepLatencies::single(nanos)))
        })
        .unwrap()
    }

    #[test]
    fn test_time_bound_summary_is_mean_of_worker_means() {
        let outcome = run_uneven_time_bound(ReportMode::Summary);

        let iterations: Vec<u64> = outcome.workers.iter().map(|w| w.iterations).collect();
        assert_eq!(iterations, vec![1000, 10]);
        // a mean weighted by operation count would be about 1_980_198
        assert_eq!(outcome.report, LatencyReport::Summary(vec![50_500_000]));
    }

    #[test]
    fn test_time_bound_detailed_row_per_worker() {
        let outcome = run_uneven_time_bound(ReportMode::Detailed);

        assert_eq!(
            outcome.report,
            LatencyReport::Detailed(vec![vec![1_000_000], vec![100_000_000]])
        );
    }

    #[test]
    fn test_mix_on_filesystem() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(temp_dir.path(), 10, 2, ReportMode::Summary);

        let outcome = run_benchmark(&config).unwrap();
        assert_eq!(outcome.report.rows().len(), 1);
        assert_eq!(outcome.report.rows()[0].len(), 3);
        assert_eq!(outcome.seed, 7);
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_stat_on_filesystem() {
        let temp_dir = TempDir::new().unwrap();
        StatTree::new(temp_dir.path().to_path_buf(), 2, 5).create().unwrap();
        let mut config = config(temp_dir.path(), 20, 3, ReportMode::Detailed);
        config.workload = WorkloadKind::Stat {
            num_dirs: 2,
            files_per_dir: 5,
        };

        let outcome = run_benchmark(&config).unwrap();
        let rows = outcome.report.rows();
        assert_eq!(rows.len(), 60);
        assert!(rows.iter().all(|r| r.len() == 1));
    }

    #[test]
    fn test_stat_without_tree_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config(temp_dir.path(), 5, 2, ReportMode::Summary);
        config.workload = WorkloadKind::Stat {
            num_dirs: 2,
            files_per_dir: 2,
        };

        let err = run_benchmark(&config).unwrap_err();
        assert!(matches!(err, RunError::WorkerFailed { .. }));
        assert!(err.source().is_some());
    }
}
