//! Caching layer for genotype-likelihood reordering
//!
//! Diploid GL/PL/GP remapping needs a permutation of genotype positions that
//! depends only on `(num_allele, allele_count)`. The permutation recurs across
//! samples and sites, so it is computed once and shared.
//!
//! The cache is an explicit object injected into the normalizer, so it can be
//! scoped to one run or shared across runs and threads.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ferro_varnorm::{GenotypeReorderCache, NormalizerConfig, VariantNormalizer};
//!
//! let cache = Arc::new(GenotypeReorderCache::new());
//! let normalizer = VariantNormalizer::new(NormalizerConfig::default())
//!     .with_cache(Arc::clone(&cache));
//! println!("Cache stats: {:?}", cache.stats());
//! # drop(normalizer);
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Cache key: `(num_allele, allele_count)`
pub type ReorderKey = (usize, usize);

/// Statistics for cache usage
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of items currently in cache
    pub size: usize,
}

impl CacheStats {
    /// Calculate hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }

    /// Calculate miss rate as a percentage
    pub fn miss_rate(&self) -> f64 {
        100.0 - self.hit_rate()
    }
}

/// Thread-safe insert-if-absent store of genotype reordering maps.
///
/// Entries are immutable once inserted and never evicted.
#[derive(Debug, Default)]
pub struct GenotypeReorderCache {
    entries: RwLock<HashMap<ReorderKey, Arc<[usize]>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl GenotypeReorderCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a reordering map
    pub fn get(&self, key: &ReorderKey) -> Option<Arc<[usize]>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        match entries.get(key) {
            Some(map) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(Arc::clone(map))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Get a reordering map, computing and inserting it if absent.
    ///
    /// Concurrent callers may compute the same map; the first insert wins and
    /// every caller receives the stored entry.
    pub fn get_or_insert_with<F>(&self, key: ReorderKey, compute: F) -> Arc<[usize]>
    where
        F: FnOnce() -> Vec<usize>,
    {
        if let Some(map) = self.get(&key) {
            return map;
        }
        let computed: Arc<[usize]> = compute().into();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let map = entries.entry(key).or_insert_with(|| {
            log::debug!(
                "Caching genotype reordering map for num_allele={} alleles={}",
                key.0,
                key.1
            );
            computed
        });
        Arc::clone(map)
    }

    /// Clear the cache
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: self.len(),
        }
    }

    /// Get the number of items in the cache
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
