//! fsbench - filesystem metadata latency microbenchmark
//!
//! Measures the latency of metadata system calls under concurrent load. N worker
//! threads each run either a create/stat/unlink mix on fresh files or a bare
//! stat on random files of a pre-built tree, bounded by an operation count or a
//! duration. Latencies are reported per operation or as a single mean.
//!
//! # Architecture
//!
//! - **config**: CLI and TOML workload definitions, validation
//! - **engine**: operation executors that time individual syscalls
//! - **worker**: per-thread state machine and the fork-join pool
//! - **stats**: lock-free latency store and aggregation
//! - **coordinator**: drives a complete run
//! - **target**: fixture tree for the stat workload

pub mod config;
pub mod coordinator;
pub mod distribution;
pub mod engine;
pub mod output;
pub mod stats;
pub mod target;
pub mod util;
pub mod worker;

// Re-export commonly used types
pub use config::WorkloadConfig;
pub use engine::OperationExecutor;

/// Result type used throughout fsbench
pub type Result<T> = anyhow::Result<T>;
