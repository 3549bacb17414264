//! Batch processing for variant normalization.
//!
//! This module provides a high-level API for normalizing many variants with
//! progress tracking, per-variant error isolation and statistics.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```
//! use ferro_varnorm::batch::BatchProcessor;
//! use ferro_varnorm::{NormalizerConfig, Variant};
//!
//! let processor = BatchProcessor::new(NormalizerConfig::default());
//!
//! let variants = vec![
//!     Variant::new("1", 100, 102, "CAG", "CG"),
//!     Variant::new("1", 0, 0, "A", "C"),
//! ];
//!
//! let result = processor.normalize(variants);
//! assert_eq!(result.success_count(), 1);
//! assert_eq!(result.error_count(), 1);
//! ```
//!
//! ## With Progress Callback
//!
//! ```
//! use ferro_varnorm::batch::{BatchConfig, BatchProcessor};
//! use ferro_varnorm::{NormalizerConfig, Variant};
//!
//! let processor = BatchProcessor::new(NormalizerConfig::default())
//!     .with_config(BatchConfig::new().progress_interval(1));
//!
//! let variants = vec![Variant::new("1", 1000, 1000, "A", "C")];
//!
//! let result = processor.normalize_with_progress(variants, |progress| {
//!     println!("Progress: {:.1}%", progress.percent());
//! });
//! assert!(result.all_ok());
//! ```
//!
//! # Features
//!
//! - **Error Isolation**: a failing variant is recorded with its input and does not stop the batch
//! - **Progress Tracking**: optional callbacks for monitoring long-running batches
//! - **Statistics**: success/failure counts and processing rates
//! - **Parallel Support**: see [`crate::parallel`] with the `parallel` feature

mod processor;

pub use processor::{BatchConfig, BatchProcessor, BatchProgress, BatchResult, ItemResult};
