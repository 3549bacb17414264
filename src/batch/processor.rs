//! Batch processor implementation.

use std::time::{Duration, Instant};

use crate::align::{GlobalAligner, PairwiseAligner};
use crate::error::NormalizeError;
use crate::model::Variant;
use crate::normalize::{NormalizerConfig, VariantNormalizer};

/// Configuration for batch processing.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Whether to continue processing on errors.
    pub continue_on_error: bool,
    /// Callback frequency (call progress callback every N items).
    pub progress_interval: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            continue_on_error: true,
            progress_interval: 100,
        }
    }
}

impl BatchConfig {
    /// Create a new batch configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure whether to continue on errors.
    pub fn continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    /// Set the progress callback interval.
    pub fn progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }
}

/// Progress information for batch operations.
#[derive(Debug, Clone)]
pub struct BatchProgress {
    /// Total items to process.
    pub total: usize,
    /// Items processed so far.
    pub processed: usize,
    /// Successful items so far.
    pub success: usize,
    /// Failed items so far.
    pub errors: usize,
    /// Time elapsed since start.
    pub elapsed: Duration,
}

impl BatchProgress {
    /// Calculate completion percentage.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.processed as f64 / self.total as f64) * 100.0
        }
    }

    /// Calculate processing rate (items per second).
    ///
    /// Returns 0.0 if no time has elapsed yet.
    pub fn items_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs < f64::EPSILON {
            0.0
        } else {
            self.processed as f64 / secs
        }
    }

    /// Estimate remaining time based on current rate.
    pub fn estimated_remaining(&self) -> Option<Duration> {
        let rate = self.items_per_second();
        if rate == 0.0 {
            return None;
        }
        let remaining_items = self.total.saturating_sub(self.processed);
        Some(Duration::from_secs_f64(remaining_items as f64 / rate))
    }
}

/// Result of a single item in a batch operation.
#[derive(Debug, Clone)]
pub enum ItemResult<T> {
    /// Successful processing.
    Ok(T),
    /// Failed processing with error.
    Err {
        /// Key of the input variant that failed.
        input: String,
        /// Error that occurred.
        error: NormalizeError,
    },
}

impl<T> ItemResult<T> {
    /// Check if this is a success.
    pub fn is_ok(&self) -> bool {
        matches!(self, ItemResult::Ok(_))
    }

    /// Check if this is an error.
    pub fn is_err(&self) -> bool {
        matches!(self, ItemResult::Err { .. })
    }

    /// Get the success value if present.
    pub fn ok(self) -> Option<T> {
        match self {
            ItemResult::Ok(v) => Some(v),
            ItemResult::Err { .. } => None,
        }
    }

    /// Get the error if present.
    pub fn err(self) -> Option<NormalizeError> {
        match self {
            ItemResult::Ok(_) => None,
            ItemResult::Err { error, .. } => Some(error),
        }
    }
}

/// Result of a batch operation.
#[derive(Debug)]
pub struct BatchResult<T> {
    /// Individual results for each processed item.
    pub results: Vec<ItemResult<T>>,
    /// Number of input items, processed or not.
    pub submitted: usize,
    /// Total processing time.
    pub duration: Duration,
}

impl<T> BatchResult<T> {
    /// Create a new batch result.
    pub fn new(results: Vec<ItemResult<T>>, submitted: usize, duration: Duration) -> Self {
        Self {
            results,
            submitted,
            duration,
        }
    }

    /// Get the total number of items processed.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Check if processing stopped before the last item.
    pub fn is_truncated(&self) -> bool {
        self.results.len() < self.submitted
    }

    /// Get the number of successful items.
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    /// Get the number of failed items.
    pub fn error_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_err()).count()
    }

    /// Calculate success rate as a percentage.
    pub fn success_rate(&self) -> f64 {
        if self.results.is_empty() {
            100.0
        } else {
            (self.success_count() as f64 / self.results.len() as f64) * 100.0
        }
    }

    /// Calculate processing rate (items per second).
    ///
    /// Returns 0.0 if the duration is too short to provide a meaningful rate.
    pub fn items_per_second(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs < f64::EPSILON {
            0.0
        } else {
            self.results.len() as f64 / secs
        }
    }

    /// Get only successful results.
    pub fn successes(self) -> Vec<T> {
        self.results.into_iter().filter_map(|r| r.ok()).collect()
    }

    /// Get only errors.
    pub fn errors(self) -> Vec<NormalizeError> {
        self.results.into_iter().filter_map(|r| r.err()).collect()
    }

    /// Check if all items were successful.
    pub fn all_ok(&self) -> bool {
        self.results.iter().all(|r| r.is_ok())
    }

    /// Check if any items failed.
    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|r| r.is_err())
    }
}

/// Batch processor for variant records.
///
/// Normalizes variant by variant, so one failing variant does not affect
/// its neighbours.
pub struct BatchProcessor<A: PairwiseAligner = GlobalAligner> {
    normalizer: VariantNormalizer<A>,
    config: BatchConfig,
}

impl BatchProcessor<GlobalAligner> {
    /// Create a new batch processor with a default normalizer.
    pub fn new(config: NormalizerConfig) -> Self {
        Self::with_normalizer(VariantNormalizer::new(config))
    }
}

impl<A: PairwiseAligner> BatchProcessor<A> {
    /// Create a new batch processor around an existing normalizer.
    pub fn with_normalizer(normalizer: VariantNormalizer<A>) -> Self {
        Self {
            normalizer,
            config: BatchConfig::default(),
        }
    }

    /// Set the batch configuration.
    pub fn with_config(mut self, config: BatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Get the wrapped normalizer.
    pub fn normalizer(&self) -> &VariantNormalizer<A> {
        &self.normalizer
    }

    /// Normalize multiple variants.
    ///
    /// Each item holds the normalized records of one input variant.
    pub fn normalize(&self, variants: Vec<Variant>) -> BatchResult<Vec<Variant>> {
        self.normalize_with_progress(variants, |_| {})
    }

    /// Normalize multiple variants with progress callback.
    ///
    /// # Arguments
    ///
    /// * `variants` - Variants to normalize
    /// * `progress_fn` - Callback function called with progress updates
    pub fn normalize_with_progress<F>(
        &self,
        variants: Vec<Variant>,
        mut progress_fn: F,
    ) -> BatchResult<Vec<Variant>>
    where
        F: FnMut(BatchProgress),
    {
        let start = Instant::now();
        let total = variants.len();
        let interval = self.config.progress_interval.max(1);
        let mut results = Vec::with_capacity(total);
        let mut success = 0;
        let mut errors = 0;

        for (i, variant) in variants.into_iter().enumerate() {
            let input = variant.to_string();
            let stop = match self.normalizer.normalize_variant(variant) {
                Ok(normalized) => {
                    results.push(ItemResult::Ok(normalized));
                    success += 1;
                    false
                }
                Err(error) => {
                    log::warn!("Failed to normalize {}: {}", input, error.detailed_message());
                    results.push(ItemResult::Err { input, error });
                    errors += 1;
                    !self.config.continue_on_error
                }
            };

            // Progress callback
            if (i + 1) % interval == 0 || i + 1 == total || stop {
                progress_fn(BatchProgress {
                    total,
                    processed: i + 1,
                    success,
                    errors,
                    elapsed: start.elapsed(),
                });
            }
            if stop {
                break;
            }
        }

        BatchResult::new(results, total, start.elapsed())
    }
}
