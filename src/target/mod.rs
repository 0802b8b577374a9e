//! Benchmark targets
//!
//! The mix workload needs nothing but an existing root directory. The stat
//! workload needs a pre-built fixture tree, managed by [`tree::StatTree`].

pub mod tree;
