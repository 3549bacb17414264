//! Canonical normalization output
//!
//! [`VariantKeyFields`] is the per-allele unit every normalization step
//! produces. Identity covers the location and alleles only; the
//! [`AlleleKind`] tag (phase set, reference block, structural) is carried
//! alongside but does not take part in equality or hashing.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Classification of a normalized record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AlleleKind {
    /// A sequence allele, tagged with the phase set of the MNV it came from
    Regular { phase_set: Option<String> },
    /// No-variation filler covering part of the original reference span
    ReferenceBlock,
    /// A symbolic/structural allele with definitional breakpoints
    Structural,
}

/// Minimal representation of one normalized allele
#[derive(Debug, Clone, Eq)]
pub struct VariantKeyFields {
    /// 1-based start
    pub start: u64,
    /// 1-based inclusive end; `start - 1` for insertions
    pub end: u64,
    /// Zero-based index of the input alternate this record derives from
    pub num_allele: usize,
    /// Minimal reference allele
    pub reference: String,
    /// Minimal alternate allele
    pub alternate: String,
    /// Record classification
    pub kind: AlleleKind,
}

impl VariantKeyFields {
    /// Create an unphased regular record
    pub fn new(
        start: u64,
        end: u64,
        num_allele: usize,
        reference: impl Into<String>,
        alternate: impl Into<String>,
    ) -> Self {
        Self {
            start,
            end,
            num_allele,
            reference: reference.into(),
            alternate: alternate.into(),
            kind: AlleleKind::Regular { phase_set: None },
        }
    }

    /// Create a reference block over `[start, end]`
    pub fn reference_block(start: u64, end: u64, reference: impl Into<String>) -> Self {
        Self {
            start,
            end,
            num_allele: 0,
            reference: reference.into(),
            alternate: String::new(),
            kind: AlleleKind::ReferenceBlock,
        }
    }

    /// Create a structural record
    pub fn structural(
        start: u64,
        end: u64,
        num_allele: usize,
        reference: impl Into<String>,
        alternate: impl Into<String>,
    ) -> Self {
        Self {
            kind: AlleleKind::Structural,
            ..Self::new(start, end, num_allele, reference, alternate)
        }
    }

    /// Tag the record with a phase set
    pub fn with_phase_set(mut self, phase_set: impl Into<String>) -> Self {
        self.kind = AlleleKind::Regular {
            phase_set: Some(phase_set.into()),
        };
        self
    }

    /// Phase set, if the record came from a decomposed MNV
    pub fn phase_set(&self) -> Option<&str> {
        match &self.kind {
            AlleleKind::Regular { phase_set } => phase_set.as_deref(),
            _ => None,
        }
    }

    /// Check if this is a reference block
    pub fn is_reference_block(&self) -> bool {
        matches!(self.kind, AlleleKind::ReferenceBlock)
    }

    /// Check if this is a structural record
    pub fn is_structural(&self) -> bool {
        matches!(self.kind, AlleleKind::Structural)
    }

    /// Last reference base covered by the record's reference allele
    pub fn reference_end(&self) -> u64 {
        (self.start + self.reference.len() as u64).saturating_sub(1)
    }
}

impl PartialEq for VariantKeyFields {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
            && self.end == other.end
            && self.num_allele == other.num_allele
            && self.reference == other.reference
            && self.alternate == other.alternate
    }
}

impl Hash for VariantKeyFields {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
        self.num_allele.hash(state);
        self.reference.hash(state);
        self.alternate.hash(state);
    }
}

impl fmt::Display for VariantKeyFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}:{}:{}:{}",
            self.start, self.end, self.reference, self.alternate, self.num_allele
        )?;
        match &self.kind {
            AlleleKind::Regular {
                phase_set: Some(ps),
            } => write!(f, "(ps:{})", ps),
            AlleleKind::ReferenceBlock => write!(f, "(refBlock)"),
            _ => Ok(()),
        }
    }
}
