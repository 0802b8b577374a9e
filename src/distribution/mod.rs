//! Index distributions for path selection
//!
//! The stat workload picks a directory index and a file index for every
//! operation. Distributions produce those indices in `[0, range)`.
//!
//! # Thread Safety
//!
//! Distributions are `Send` but never shared: each worker owns its own instance,
//! seeded from the process seed and its worker id, so path selection is free of
//! data races and reproducible per worker.
//!
//! # Example
//!
//! ```
//! use fsbench::distribution::{Distribution, uniform::UniformDistribution};
//!
//! let mut dist = UniformDistribution::with_seed(7);
//! let dir = dist.next_index(16);
//! let file = dist.next_index(1000);
//! assert!(dir < 16 && file < 1000);
//! ```

/// Generator of indices within a range
pub trait Distribution: Send {
    /// Next index in `[0, range)`; returns 0 for an empty range
    fn next_index(&mut self, range: u64) -> u64;
}

pub mod uniform;
