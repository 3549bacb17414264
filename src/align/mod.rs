//! Pairwise sequence alignment for MNV decomposition.
//!
//! The decomposer only needs two equal-length gapped strings, so alignment is
//! exposed through the [`PairwiseAligner`] trait. [`GlobalAligner`] is the
//! default implementation: a global (Needleman-Wunsch) alignment with affine
//! gap penalties and NUC.4.4 substitution scores.
//!
//! # Example
//!
//! ```
//! use ferro_varnorm::align::{GlobalAligner, PairwiseAligner};
//!
//! let aligned = GlobalAligner::default().align("ACGT", "AGT").unwrap();
//! assert_eq!(aligned.reference, "ACGT");
//! assert_eq!(aligned.alternate, "A-GT");
//! ```

mod matrix;

pub use matrix::nuc44;

use bio::alignment::pairwise::Aligner;
use bio::alignment::AlignmentOperation;

use crate::error::NormalizeError;

/// Gap symbol in aligned sequences
pub const GAP: u8 = b'-';

/// Default penalty for opening a gap (charged for its first position)
pub const DEFAULT_GAP_OPEN: u32 = 5;
/// Default penalty for each further gap position
pub const DEFAULT_GAP_EXTEND: u32 = 2;
/// Largest accepted gap penalty; keeps alignment scores within `i32`
pub const MAX_GAP_PENALTY: u32 = 1_000;

/// Two aligned sequences of equal length, gaps written as `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedPair {
    /// Aligned reference
    pub reference: String,
    /// Aligned alternate
    pub alternate: String,
}

impl AlignedPair {
    /// Create an aligned pair
    pub fn new(reference: impl Into<String>, alternate: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            alternate: alternate.into(),
        }
    }

    /// Aligned columns as `(reference, alternate)` byte pairs
    pub fn columns(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.reference
            .bytes()
            .zip(self.alternate.bytes())
    }

    /// True if both rows have the same number of columns
    pub fn is_rectangular(&self) -> bool {
        self.reference.len() == self.alternate.len()
    }
}

/// A global pairwise aligner over nucleotide sequences.
pub trait PairwiseAligner: Send + Sync {
    /// Align `reference` against `alternate` end to end.
    fn align(&self, reference: &str, alternate: &str) -> Result<AlignedPair, NormalizeError>;
}

/// Needleman-Wunsch global aligner with affine gaps and NUC.4.4 scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalAligner {
    gap_open: u32,
    gap_extend: u32,
}

impl Default for GlobalAligner {
    fn default() -> Self {
        Self::new(DEFAULT_GAP_OPEN, DEFAULT_GAP_EXTEND)
    }
}

impl GlobalAligner {
    /// Create an aligner. A gap of length `k` costs `gap_open + (k - 1) * gap_extend`.
    ///
    /// Penalties above [`MAX_GAP_PENALTY`] are clamped to it; use
    /// [`GlobalAligner::try_new`] to reject them instead.
    pub fn new(gap_open: u32, gap_extend: u32) -> Self {
        if gap_open > MAX_GAP_PENALTY || gap_extend > MAX_GAP_PENALTY {
            log::warn!(
                "Gap penalties {}/{} clamped to {}",
                gap_open,
                gap_extend,
                MAX_GAP_PENALTY
            );
        }
        Self {
            gap_open: gap_open.min(MAX_GAP_PENALTY),
            gap_extend: gap_extend.min(MAX_GAP_PENALTY),
        }
    }

    /// Create an aligner, rejecting penalties above [`MAX_GAP_PENALTY`].
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::Config`] naming the offending penalty.
    pub fn try_new(gap_open: u32, gap_extend: u32) -> Result<Self, NormalizeError> {
        for (name, value) in [("gap-open", gap_open), ("gap-extend", gap_extend)] {
            if value > MAX_GAP_PENALTY {
                return Err(NormalizeError::Config {
                    msg: format!("{} penalty {} exceeds {}", name, value, MAX_GAP_PENALTY),
                });
            }
        }
        Ok(Self::new(gap_open, gap_extend))
    }

    /// Gap open penalty
    pub fn gap_open(&self) -> u32 {
        self.gap_open
    }

    /// Gap extension penalty
    pub fn gap_extend(&self) -> u32 {
        self.gap_extend
    }
}

impl PairwiseAligner for GlobalAligner {
    fn align(&self, reference: &str, alternate: &str) -> Result<AlignedPair, NormalizeError> {
        let x = reference.as_bytes();
        let y = alternate.as_bytes();

        // rust-bio charges `open + k * extend` for a gap of length k
        let extend = -score(self.gap_extend);
        let open = -score(self.gap_open.saturating_sub(self.gap_extend));
        let mut aligner = Aligner::with_capacity(x.len(), y.len(), open, extend, nuc44);
        let alignment = aligner.global(x, y);

        let inconsistent = |detail: &str| NormalizeError::AlignmentInconsistency {
            reference: reference.to_string(),
            alternate: alternate.to_string(),
            detail: detail.to_string(),
        };

        let mut aligned_ref = Vec::with_capacity(x.len() + y.len());
        let mut aligned_alt = Vec::with_capacity(x.len() + y.len());
        let (mut i, mut j) = (0usize, 0usize);
        for op in &alignment.operations {
            match op {
                AlignmentOperation::Match | AlignmentOperation::Subst => {
                    let (a, b) = x
                        .get(i)
                        .zip(y.get(j))
                        .ok_or_else(|| inconsistent("operation past sequence end"))?;
                    aligned_ref.push(*a);
                    aligned_alt.push(*b);
                    i += 1;
                    j += 1;
                }
                // Base in x aligned to a gap in y
                AlignmentOperation::Ins => {
                    let a = x
                        .get(i)
                        .ok_or_else(|| inconsistent("insertion past reference end"))?;
                    aligned_ref.push(*a);
                    aligned_alt.push(GAP);
                    i += 1;
                }
                // Base in y aligned to a gap in x
                AlignmentOperation::Del => {
                    let b = y
                        .get(j)
                        .ok_or_else(|| inconsistent("deletion past alternate end"))?;
                    aligned_ref.push(GAP);
                    aligned_alt.push(*b);
                    j += 1;
                }
                AlignmentOperation::Xclip(n) => {
                    let end = i + n;
                    let bases = x
                        .get(i..end)
                        .ok_or_else(|| inconsistent("clip past reference end"))?;
                    aligned_ref.extend_from_slice(bases);
                    aligned_alt.extend(std::iter::repeat(GAP).take(*n));
                    i = end;
                }
                AlignmentOperation::Yclip(n) => {
                    let end = j + n;
                    let bases = y
                        .get(j..end)
                        .ok_or_else(|| inconsistent("clip past alternate end"))?;
                    aligned_ref.extend(std::iter::repeat(GAP).take(*n));
                    aligned_alt.extend_from_slice(bases);
                    j = end;
                }
            }
        }

        if i != x.len() || j != y.len() {
            return Err(inconsistent("alignment does not cover both sequences"));
        }

        // Input alleles are ASCII, so byte-to-char conversion is safe
        Ok(AlignedPair {
            reference: aligned_ref.iter().map(|&b| b as char).collect(),
            alternate: aligned_alt.iter().map(|&b| b as char).collect(),
        })
    }
}

/// Gap penalty as an alignment score
fn score(penalty: u32) -> i32 {
    i32::try_from(penalty.min(MAX_GAP_PENALTY)).unwrap_or(i32::MAX)
}
