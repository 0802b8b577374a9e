//! Result aggregation
//!
//! Turns a fully written [`LatencyStore`] into report rows. A run with any
//! failed or missing sample yields no numbers at all.
//!
//! - **Detailed**: one row per stored operation, worker order then iteration order
//! - **Summary**: one row holding the truncated arithmetic mean of each column
//!
//! In time-bound runs each worker stores a single per-worker mean, so the
//! summary is a mean of per-worker means.
//!
//! # Example
//!
//! ```
//! use fsbench::config::ReportMode;
//! use fsbench::engine::{OperationKind, StepLatencies};
//! use fsbench::stats::LatencyStore;
//! use fsbench::stats::aggregator::{aggregate, LatencyReport};
//!
//! let mut store = LatencyStore::new(OperationKind::Stat, 1, 2).unwrap();
//! let mut slices = store.partition();
//! slices[0].record(0, &StepLatencies::single(100));
//! slices[0].record(1, &StepLatencies::single(201));
//! drop(slices);
//!
//! let report = aggregate(&store, ReportMode::Summary).unwrap();
//! assert_eq!(report, LatencyReport::Summary(vec![150]));
//! ```

use super::{LatencySample, LatencyStore};
use crate::config::ReportMode;
use thiserror::Error;

/// Aggregated output of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatencyReport {
    /// Every stored operation, one row each
    Detailed(Vec<Vec<u64>>),
    /// Mean of each column
    Summary(Vec<u64>),
}

impl LatencyReport {
    /// Rows in output order
    pub fn rows(&self) -> Vec<&[u64]> {
        match self {
            LatencyReport::Detailed(rows) => rows.iter().map(|r| r.as_slice()).collect(),
            LatencyReport::Summary(row) => vec![row.as_slice()],
        }
    }
}

/// Why a store cannot be reported
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("worker {worker_id} failed at operation {slot} (column {column})")]
    FailedSample {
        worker_id: usize,
        slot: usize,
        column: usize,
    },

    #[error("worker {worker_id} did not record operation {slot} (column {column})")]
    MissingSample {
        worker_id: usize,
        slot: usize,
        column: usize,
    },
}

/// Check that every cell holds a latency
pub fn check_complete(store: &LatencyStore) -> Result<(), ReportError> {
    let per_worker = store.slots_per_worker();
    for column in 0..store.dimensions() {
        for (index, sample) in store.column(column).iter().enumerate() {
            let (worker_id, slot) = (index / per_worker, index % per_worker);
            match sample {
                LatencySample::Recorded(_) => {}
                LatencySample::Failed => {
                    return Err(ReportError::FailedSample {
                        worker_id,
                        slot,
                        column,
                    })
                }
                LatencySample::Pending => {
                    return Err(ReportError::MissingSample {
                        worker_id,
                        slot,
                        column,
                    })
                }
            }
        }
    }
    Ok(())
}

/// Aggregate a complete store according to the report mode
pub fn aggregate(store: &LatencyStore, mode: ReportMode) -> Result<LatencyReport, ReportError> {
    check_complete(store)?;

    let report = match mode {
        ReportMode::Detailed => LatencyReport::Detailed(detailed_rows(store)),
        ReportMode::Summary => LatencyReport::Summary(summary_row(store)),
    };
    Ok(report)
}

fn detailed_rows(store: &LatencyStore) -> Vec<Vec<u64>> {
    let len = store.threads() * store.slots_per_worker();
    (0..len)
        .map(|index| {
            (0..store.dimensions())
                .map(|column| store.column(column)[index].value().unwrap_or_default())
                .collect()
        })
        .collect()
}

fn summary_row(store: &LatencyStore) -> Vec<u64> {
    (0..store.dimensions())
        .map(|column| mean(store.column(column)))
        .collect()
}

/// Truncated mean, summed in `u128` so long runs cannot overflow
fn mean(samples: &[LatencySample]) -> u64 {
    if samples.is_empty() {
        return 0;
    }
    let sum: u128 = samples
        .iter()
        .filter_map(|s| s.value())
        .map(u128::from)
        .sum();
    (sum / samples.len() as u128) as u64
}
