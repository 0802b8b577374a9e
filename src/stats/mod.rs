//! Latency storage
//!
//! Per-operation latencies are kept in one column per measured step (three for
//! the mix workload, one for stat). Each column holds `threads * slots_per_worker`
//! samples and is laid out worker-major, so worker `w` owns the contiguous range
//! `[w * slots, (w + 1) * slots)` of every column.
//!
//! [`LatencyStore::partition`] hands each worker a [`WorkerSlice`] of mutable
//! borrows over exactly its own ranges. Workers never see each other's cells and
//! need no synchronization; the store is read back only after every worker has
//! been joined.
//!
//! # Example
//!
//! ```
//! use fsbench::engine::{OperationKind, StepLatencies};
//! use fsbench::stats::{LatencySample, LatencyStore};
//!
//! let mut store = LatencyStore::new(OperationKind::Mix, 2, 1).unwrap();
//! for mut slice in store.partition() {
//!     let v = slice.worker_id() as u64 + 1;
//!     slice.record(0, &StepLatencies::mix(v, v * 10, v * 100));
//! }
//!
//! assert_eq!(store.column(1), &[LatencySample::Recorded(10), LatencySample::Recorded(20)]);
//! ```

pub mod aggregator;

use crate::engine::{OperationKind, StepLatencies};
use thiserror::Error;

/// One cell of a latency column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencySample {
    /// Never written (the owning worker stopped before reaching it)
    Pending,
    /// Latency in nanoseconds
    Recorded(u64),
    /// The step of this column failed for this operation
    Failed,
}

impl LatencySample {
    pub fn value(&self) -> Option<u64> {
        match self {
            LatencySample::Recorded(nanos) => Some(*nanos),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("latency store needs at least one worker and one slot per worker")]
    Empty,

    #[error("cannot allocate {0} latency samples")]
    Allocation(usize),
}

/// Column-oriented latency store shared by all workers of a run
#[derive(Debug)]
pub struct LatencyStore {
    kind: OperationKind,
    threads: usize,
    slots_per_worker: usize,
    columns: Vec<Vec<LatencySample>>,
}

impl LatencyStore {
    /// Allocate every column up front, filled with [`LatencySample::Pending`]
    pub fn new(
        kind: OperationKind,
        threads: usize,
        slots_per_worker: usize,
    ) -> Result<Self, StoreError> {
        if threads == 0 || slots_per_worker == 0 {
            return Err(StoreError::Empty);
        }
        let len = threads
            .checked_mul(slots_per_worker)
            .ok_or(StoreError::Allocation(usize::MAX))?;

        let mut columns = Vec::with_capacity(kind.dimensions());
        for _ in 0..kind.dimensions() {
            let mut column = Vec::new();
            column
                .try_reserve_exact(len)
                .map_err(|_| StoreError::Allocation(len))?;
            column.resize(len, LatencySample::Pending);
            columns.push(column);
        }

        Ok(Self {
            kind,
            threads,
            slots_per_worker,
            columns,
        })
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn slots_per_worker(&self) -> usize {
        self.slots_per_worker
    }

    /// Number of columns
    pub fn dimensions(&self) -> usize {
        self.columns.len()
    }

    /// Full column, worker-major
    pub fn column(&self, index: usize) -> &[LatencySample] {
        &self.columns[index]
    }

    /// The part of `column` owned by `worker_id`
    pub fn worker_column(&self, worker_id: usize, column: usize) -> &[LatencySample] {
        let start = worker_id * self.slots_per_worker;
        &self.columns[column][start..start + self.slots_per_worker]
    }

    /// Split the store into one disjoint mutable view per worker
    pub fn partition(&mut self) -> Vec<WorkerSlice<'_>> {
        let per_worker = self.slots_per_worker;
        let mut chunked: Vec<_> = self
            .columns
            .iter_mut()
            .map(|column| column.chunks_mut(per_worker))
            .collect();

        (0..self.threads)
            .map(|worker_id| WorkerSlice {
                worker_id,
                cells: chunked.iter_mut().filter_map(|chunks| chunks.next()).collect(),
            })
            .collect()
    }
}

/// A worker's exclusive view of the store: one sub-slice per column
#[derive(Debug)]
pub struct WorkerSlice<'a> {
    worker_id: usize,
    cells: Vec<&'a mut [LatencySample]>,
}

impl<'a> WorkerSlice<'a> {
    pub fn worker_id(&self) -> usize {
        self.worker_id
    }

    /// Slots owned in each column
    pub fn slots(&self) -> usize {
        self.cells.first().map_or(0, |column| column.len())
    }

    /// Store one operation's latencies at `slot`, one value per column
    ///
    /// `slot` must be below [`slots`](Self::slots). Surplus values are ignored.
    pub fn record(&mut self, slot: usize, latencies: &StepLatencies) {
        debug_assert!(
            slot < self.slots(),
            "worker {} wrote slot {} of {}",
            self.worker_id,
            slot,
            self.slots()
        );
        for (column, value) in self.cells.iter_mut().zip(latencies.as_slice()) {
            if let Some(cell) = column.get_mut(slot) {
                *cell = LatencySample::Recorded(*value);
            }
        }
    }

    /// Mark the cell of `column` at `slot` as failed
    pub fn mark_failed(&mut self, slot: usize, column: usize) {
        debug_assert!(slot < self.slots() && column < self.cells.len());
        if let Some(cell) = self.cells.get_mut(column).and_then(|c| c.get_mut(slot)) {
            *cell = LatencySample::Failed;
        }
    }
}
