//! Uniform index distribution
//!
//! Every index in the range is equally likely. Backed by xoshiro256++, which is
//! fast enough to sit next to a stat() call without skewing the measurement.

use super::Distribution;
use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Uniform random index distribution
pub struct UniformDistribution {
    rng: Xoshiro256PlusPlus,
}

impl UniformDistribution {
    /// Create a uniform distribution from `seed`
    ///
    /// Same seed, same sequence of indices.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }
}

impl Distribution for UniformDistribution {
    #[inline(always)]
    fn next_index(&mut self, range: u64) -> u64 {
        if range == 0 {
            return 0;
        }
        self.rng.gen_range(0..range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_distribution_basic() {
        let mut dist = UniformDistribution::with_seed(0);

        for _ in 0..100 {
            assert!(dist.next_index(1000) < 1000);
        }
    }

    #[test]
    fn test_uniform_distribution_zero_range() {
        let mut dist = UniformDistribution::with_seed(0);
        assert_eq!(dist.next_index(0), 0);
    }

    #[test]
    fn test_uniform_distribution_single() {
        let mut dist = UniformDistribution::with_seed(1);
        for _ in 0..10 {
            assert_eq!(dist.next_index(1), 0);
        }
    }

    #[test]
    fn test_uniform_distribution_seeded() {
        let mut dist1 = UniformDistribution::with_seed(12345);
        let mut dist2 = UniformDistribution::with_seed(12345);

        for _ in 0..10 {
            assert_eq!(dist1.next_index(1000), dist2.next_index(1000));
        }
    }

    #[test]
    fn test_uniform_distribution_coverage() {
        let mut dist = UniformDistribution::with_seed(42);
        let range = 100u64;
        let mut buckets = vec![0u32; 10];

        for _ in 0..10000 {
            let index = dist.next_index(range);
            buckets[(index * 10 / range) as usize] += 1;
        }

        // Roughly 1000 per bucket, 20% slack
        for count in buckets {
            assert!(count > 800 && count < 1200, "Bucket count {} outside expected range", count);
        }
    }
}
