//! Parallel processing support for ferro-varnorm
//!
//! This module provides parallel variants of batch normalization using rayon.
//! Enable with the `parallel` feature.
//!
//! The normalizer is shared by reference across worker threads. Its
//! configuration is immutable and its genotype reordering cache is safe for
//! concurrent use, so no other synchronization is needed.
//!
//! # Example
//!
//! ```
//! # #[cfg(feature = "parallel")]
//! # fn main() {
//! use ferro_varnorm::parallel::normalize_parallel;
//! use ferro_varnorm::{NormalizerConfig, Variant, VariantNormalizer};
//!
//! let normalizer = VariantNormalizer::new(NormalizerConfig::default());
//! let variants = vec![
//!     Variant::new("1", 100, 102, "CAG", "CG"),
//!     Variant::new("1", 1000, 1000, "A", "C"),
//! ];
//!
//! let results = normalize_parallel(&normalizer, variants);
//! assert_eq!(results.len(), 2);
//! assert!(results.iter().all(|r| r.is_ok()));
//! # }
//! # #[cfg(not(feature = "parallel"))]
//! # fn main() {}
//! ```

use rayon::prelude::*;

use crate::align::PairwiseAligner;
use crate::error::NormalizeError;
use crate::model::Variant;
use crate::normalize::VariantNormalizer;

/// Normalize multiple variants in parallel
///
/// Returns a vector of results, one for each input variant.
/// Order is preserved.
pub fn normalize_parallel<A: PairwiseAligner>(
    normalizer: &VariantNormalizer<A>,
    variants: Vec<Variant>,
) -> Vec<Result<Vec<Variant>, NormalizeError>> {
    variants
        .into_par_iter()
        .map(|v| normalizer.normalize_variant(v))
        .collect()
}

/// Normalize multiple variants in parallel, filtering errors
///
/// Returns the normalized records of the variants that succeeded, in input
/// order. Failures are logged.
pub fn normalize_parallel_ok<A: PairwiseAligner>(
    normalizer: &VariantNormalizer<A>,
    variants: Vec<Variant>,
) -> Vec<Variant> {
    normalize_parallel(normalizer, variants)
        .into_iter()
        .filter_map(|result| match result {
            Ok(records) => Some(records),
            Err(e) => {
                log::warn!("Skipping variant: {}", e.detailed_message());
                None
            }
        })
        .flatten()
        .collect()
}

/// Normalize independent batches in parallel
///
/// Each batch is normalized with [`VariantNormalizer::normalize`], so a
/// failure stops its own batch only. Order is preserved.
pub fn normalize_batches_parallel<A: PairwiseAligner>(
    normalizer: &VariantNormalizer<A>,
    batches: Vec<Vec<Variant>>,
) -> Vec<Result<Vec<Variant>, NormalizeError>> {
    batches
        .into_par_iter()
        .map(|batch| normalizer.normalize(batch))
        .collect()
}

/// Configuration for parallel batch processing
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Chunk size for parallel processing
    pub chunk_size: usize,
    /// Number of threads (0 = use rayon default)
    pub num_threads: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            num_threads: 0,
        }
    }
}

impl ParallelConfig {
    /// Create a new parallel configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chunk size for batched processing
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Set the number of threads
    pub fn with_num_threads(mut self, threads: usize) -> Self {
        self.num_threads = threads;
        self
    }

    /// Build a dedicated thread pool, or `None` to use the global one
    pub fn thread_pool(&self) -> Result<Option<rayon::ThreadPool>, NormalizeError> {
        if self.num_threads == 0 {
            return Ok(None);
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_threads)
            .build()
            .map(Some)
            .map_err(|e| NormalizeError::Config {
                msg: format!("cannot build thread pool: {}", e),
            })
    }

    /// Split `variants` into chunks of at most `chunk_size` variants
    pub fn chunk(&self, variants: Vec<Variant>) -> Vec<Vec<Variant>> {
        let size = self.chunk_size.max(1);
        let mut chunks = Vec::with_capacity(variants.len().div_ceil(size));
        let mut iter = variants.into_iter().peekable();
        while iter.peek().is_some() {
            chunks.push(iter.by_ref().take(size).collect());
        }
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::NormalizerConfig;

    fn snvs(count: u64) -> Vec<Variant> {
        (1..=count)
            .map(|i| Variant::new("1", i * 10, i * 10 + 1, "AC", "AT"))
            .collect()
    }

    #[test]
    fn test_normalize_parallel() {
        let normalizer = VariantNormalizer::new(NormalizerConfig::default());
        let variants = vec![
            Variant::new("1", 100, 102, "CAG", "CG"),
            Variant::new("1", 0, 0, "A", "C"),
        ];

        let results = normalize_parallel(&normalizer, variants);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap()[0].start, 101);
        assert!(matches!(
            results[1],
            Err(NormalizeError::InvalidCoordinates { .. })
        ));
    }

    #[test]
    fn test_normalize_parallel_ok() {
        let normalizer = VariantNormalizer::new(NormalizerConfig::default());
        let variants = vec![
            Variant::new("1", 100, 100, "A", "C"),
            Variant::new("1", 0, 0, "A", "C"),
            Variant::new("1", 200, 200, "G", "T"),
        ];

        let results = normalize_parallel_ok(&normalizer, variants);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].start, 100);
        assert_eq!(results[1].start, 200);
    }

    #[test]
    fn test_stress_order_preserved() {
        let normalizer = VariantNormalizer::new(NormalizerConfig::default());
        let results = normalize_parallel(&normalizer, snvs(500));
        assert_eq!(results.len(), 500);

        for (i, result) in results.iter().enumerate() {
            let records = result.as_ref().unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].start, (i as u64 + 1) * 10 + 1);
            assert_eq!(records[0].reference, "C");
            assert_eq!(records[0].alternate, "T");
        }
    }

    #[test]
    fn test_stress_shared_cache() {
        use crate::model::StudyEntry;

        let normalizer = VariantNormalizer::new(NormalizerConfig::default());
        let variants: Vec<Variant> = (1..=200)
            .map(|i| {
                let study = StudyEntry::new("s1")
                    .with_format(["GT", "PL"])
                    .with_sample("NA001", ["0/2", "0,10,20,30,40,50"])
                    .with_secondary_alternates(["G"]);
                Variant::new("1", i * 10, i * 10, "A", "C").with_study(study)
            })
            .collect();

        let results = normalize_parallel(&normalizer, variants);
        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(normalizer.cache().len(), 2);
    }

    #[test]
    fn test_normalize_batches_parallel() {
        let normalizer = VariantNormalizer::new(NormalizerConfig::default());
        let config = ParallelConfig::new().with_chunk_size(3);
        let mut variants = snvs(7);
        variants[4] = Variant::new("1", 0, 0, "A", "C");

        let batches = config.chunk(variants);
        assert_eq!(batches.iter().map(Vec::len).collect::<Vec<_>>(), vec![3, 3, 1]);

        let results = normalize_batches_parallel(&normalizer, batches);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().len(), 3);
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_stress_empty_input() {
        let normalizer = VariantNormalizer::new(NormalizerConfig::default());
        assert!(normalize_parallel(&normalizer, Vec::new()).is_empty());
        assert!(ParallelConfig::new().chunk(Vec::new()).is_empty());
    }

    #[test]
    fn test_parallel_config_variations() {
        let config = ParallelConfig::new()
            .with_chunk_size(100)
            .with_num_threads(2);
        assert_eq!(config.chunk_size, 100);
        assert_eq!(config.num_threads, 2);
        assert!(config.thread_pool().unwrap().is_some());

        let config = ParallelConfig::new().with_num_threads(0);
        assert!(config.thread_pool().unwrap().is_none());
    }

    #[test]
    fn test_thread_pool_install() {
        let normalizer = VariantNormalizer::new(NormalizerConfig::default());
        let pool = ParallelConfig::new()
            .with_num_threads(2)
            .thread_pool()
            .unwrap()
            .unwrap();
        let results = pool.install(|| normalize_parallel(&normalizer, snvs(50)));
        assert_eq!(results.len(), 50);
    }
}
