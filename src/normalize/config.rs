//! Normalization configuration options

use serde::{Deserialize, Serialize};

use crate::align::{GlobalAligner, DEFAULT_GAP_EXTEND, DEFAULT_GAP_OPEN};
use crate::error::NormalizeError;

/// Configuration for variant normalization
///
/// Immutable for the lifetime of a [`VariantNormalizer`](super::VariantNormalizer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Mutate single-allele input variants in place instead of building new ones
    pub reuse_variants: bool,

    /// Sort the alleles of unphased genotypes after remapping
    pub normalize_alleles: bool,

    /// Split multi-base substitutions into phased SNVs and indels
    pub decompose_mnvs: bool,

    /// Fill the uncovered span of multiallelic sites with reference blocks
    pub generate_reference_blocks: bool,

    /// Alignment gap open penalty used by MNV decomposition
    pub gap_open: u32,

    /// Alignment gap extension penalty used by MNV decomposition
    pub gap_extend: u32,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            reuse_variants: true,
            normalize_alleles: false,
            decompose_mnvs: false,
            generate_reference_blocks: false,
            gap_open: DEFAULT_GAP_OPEN,
            gap_extend: DEFAULT_GAP_EXTEND,
        }
    }
}

impl NormalizerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set input reuse
    pub fn with_reuse(mut self, reuse: bool) -> Self {
        self.reuse_variants = reuse;
        self
    }

    /// Set genotype allele sorting
    pub fn with_allele_normalization(mut self, normalize: bool) -> Self {
        self.normalize_alleles = normalize;
        self
    }

    /// Set MNV decomposition
    pub fn with_mnv_decomposition(mut self, decompose: bool) -> Self {
        self.decompose_mnvs = decompose;
        self
    }

    /// Set reference-block generation
    pub fn with_reference_blocks(mut self, generate: bool) -> Self {
        self.generate_reference_blocks = generate;
        self
    }

    /// Set the alignment gap penalties
    pub fn with_gap_penalties(mut self, gap_open: u32, gap_extend: u32) -> Self {
        self.gap_open = gap_open;
        self.gap_extend = gap_extend;
        self
    }

    /// Check that the settings are usable.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::Config`] when a gap penalty exceeds
    /// [`MAX_GAP_PENALTY`](crate::align::MAX_GAP_PENALTY).
    pub fn validate(&self) -> Result<(), NormalizeError> {
        GlobalAligner::try_new(self.gap_open, self.gap_extend).map(|_| ())
    }
}
