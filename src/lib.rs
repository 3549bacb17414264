// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-varnorm: canonical normalization of VCF-style variant records
//!
//! Part of the ferro bioinformatics toolkit.
//!
//! Variants written in different but equivalent ways (`CAG>CG` at 100 versus the
//! minimal deletion of `A` at 101) are rewritten into one minimal, unambiguous
//! representation. Multi-nucleotide variants can be decomposed into phased atomic
//! events, multiallelic sites can be padded with reference blocks, and per-sample
//! genotype and likelihood fields are remapped to follow the new allele numbering.
//!
//! # Example
//!
//! ```
//! use ferro_varnorm::{NormalizerConfig, Variant, VariantNormalizer};
//!
//! let normalizer = VariantNormalizer::new(NormalizerConfig::default());
//! let variant = Variant::new("1", 100, 102, "CAG", "CG");
//!
//! let normalized = normalizer.normalize(vec![variant]).unwrap();
//! assert_eq!(normalized.len(), 1);
//! assert_eq!(normalized[0].start, 101);
//! assert_eq!(normalized[0].reference, "A");
//! assert_eq!(normalized[0].alternate, "");
//! ```

pub mod align;
pub mod batch;
pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
#[cfg(feature = "parallel")]
pub mod parallel;

// Re-export commonly used types
pub use align::{AlignedPair, GlobalAligner, PairwiseAligner};
pub use cache::GenotypeReorderCache;
pub use error::NormalizeError;
pub use model::{
    AllelesCode, AlternateCoordinate, FileEntry, Genotype, StructuralVariantType,
    StructuralVariation, StudyEntry, Variant, VariantType,
};
pub use normalize::{AlleleKind, NormalizerConfig, VariantKeyFields, VariantNormalizer};

/// Result type alias for ferro-varnorm operations
pub type Result<T> = std::result::Result<T, NormalizeError>;
