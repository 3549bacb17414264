//! Variant representation
//!
//! An already-parsed, in-memory variant: location, alleles, an optional
//! structural-variant descriptor and zero or more per-study entries.
//!
//! # Coordinate System
//!
//! | Field | Basis | Notes |
//! |-------|-------|-------|
//! | `start`, `end` | 1-based | Inclusive; a zero-length reference is `end = start - 1` |
//! | `StructuralVariation.ci_*` | 1-based | Absolute confidence-interval bounds |

use serde::{Deserialize, Serialize};
use std::fmt;

use super::study::StudyEntry;

/// Minimum allele length for a sequence-resolved indel to be typed as an SV.
pub const SV_THRESHOLD: usize = 50;

/// Variant classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariantType {
    /// Single nucleotide variant
    Snv,
    /// Multi-nucleotide variant (equal-length substitution block)
    Mnv,
    /// Insertion or deletion shorter than [`SV_THRESHOLD`]
    Indel,
    /// Sequence-resolved structural variant
    Sv,
    /// Symbolic insertion (`<INS>`)
    Insertion,
    /// Symbolic deletion (`<DEL>`)
    Deletion,
    /// Symbolic inversion (`<INV>`)
    Inversion,
    /// Symbolic duplication (`<DUP>`)
    Duplication,
    /// Symbolic tandem duplication (`<DUP:TANDEM>`)
    TandemDuplication,
    /// Breakend notation
    Breakend,
    /// Copy-number variant (`<CNV>`, `<CN0>`, `<CN3>`, ...)
    Cnv,
    /// Any other symbolic allele
    Symbolic,
    /// Reference block, no variation
    NoVariation,
}

impl VariantType {
    /// Infer the type of a reference/alternate pair.
    pub fn infer(reference: &str, alternate: &str) -> Self {
        if is_symbolic_allele(alternate) {
            return symbolic_type(alternate);
        }
        if reference.len() == alternate.len() {
            match reference.len() {
                0 => VariantType::NoVariation,
                1 => VariantType::Snv,
                _ => VariantType::Mnv,
            }
        } else if reference.len().max(alternate.len()) >= SV_THRESHOLD {
            VariantType::Sv
        } else {
            VariantType::Indel
        }
    }

    /// Check whether this is one of the symbolic/structural kinds.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            VariantType::Insertion
                | VariantType::Deletion
                | VariantType::Inversion
                | VariantType::Duplication
                | VariantType::TandemDuplication
                | VariantType::Breakend
                | VariantType::Cnv
                | VariantType::Symbolic
        )
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VariantType::Snv => "SNV",
            VariantType::Mnv => "MNV",
            VariantType::Indel => "INDEL",
            VariantType::Sv => "SV",
            VariantType::Insertion => "INSERTION",
            VariantType::Deletion => "DELETION",
            VariantType::Inversion => "INVERSION",
            VariantType::Duplication => "DUPLICATION",
            VariantType::TandemDuplication => "TANDEM_DUPLICATION",
            VariantType::Breakend => "BREAKEND",
            VariantType::Cnv => "CNV",
            VariantType::Symbolic => "SYMBOLIC",
            VariantType::NoVariation => "NO_VARIATION",
        };
        write!(f, "{}", s)
    }
}

fn symbolic_type(alternate: &str) -> VariantType {
    if is_breakend(alternate.as_bytes()) {
        return VariantType::Breakend;
    }
    let tag = alternate
        .trim_start_matches('<')
        .trim_end_matches('>')
        .to_ascii_uppercase();
    let mut parts = tag.split(':');
    match (parts.next().unwrap_or(""), parts.next()) {
        ("DUP", Some("TANDEM")) => VariantType::TandemDuplication,
        ("DUP", _) => VariantType::Duplication,
        ("DEL", _) => VariantType::Deletion,
        ("INS", _) => VariantType::Insertion,
        ("INV", _) => VariantType::Inversion,
        ("CNV", _) => VariantType::Cnv,
        (other, _) if parse_copy_number_tag(other).is_some() => VariantType::Cnv,
        _ => VariantType::Symbolic,
    }
}

/// Check if an allele is symbolic rather than literal sequence.
///
/// Symbolic alleles are `<TAG>` placeholders, breakend notation
/// (`G]17:198982]`) and single breakends (`.A`, `G.`).
pub fn is_symbolic_allele(allele: &str) -> bool {
    let bases = allele.as_bytes();
    if bases.len() <= 1 {
        return false;
    }
    bases[0] == b'<' || bases[bases.len() - 1] == b'>' || is_breakend(bases)
}

fn is_breakend(bases: &[u8]) -> bool {
    if bases.len() <= 1 {
        return false;
    }
    bases.iter().any(|&b| b == b'[' || b == b']')
        || bases[0] == b'.'
        || bases[bases.len() - 1] == b'.'
}

/// Extract the copy number encoded in a `<CNn>` alternate, e.g. `<CN3>` -> 3.
pub fn copy_number_from_alternate(alternate: &str) -> Option<u32> {
    let tag = alternate.strip_prefix('<')?.strip_suffix('>')?;
    parse_copy_number_tag(tag)
}

fn parse_copy_number_tag(tag: &str) -> Option<u32> {
    let digits = tag.strip_prefix("CN")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Structural variant subtype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StructuralVariantType {
    /// Fewer than two copies
    CopyNumberLoss,
    /// More than two copies
    CopyNumberGain,
}

impl StructuralVariantType {
    /// Classify a copy number; two copies is copy-neutral and has no subtype.
    pub fn from_copy_number(copy_number: Option<u32>) -> Option<Self> {
        match copy_number? {
            0 | 1 => Some(StructuralVariantType::CopyNumberLoss),
            2 => None,
            _ => Some(StructuralVariantType::CopyNumberGain),
        }
    }
}

/// Structural variant descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralVariation {
    /// Lower bound of the start confidence interval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ci_start_left: Option<u64>,
    /// Upper bound of the start confidence interval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ci_start_right: Option<u64>,
    /// Lower bound of the end confidence interval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ci_end_left: Option<u64>,
    /// Upper bound of the end confidence interval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ci_end_right: Option<u64>,
    /// Copy number, for CNVs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_number: Option<u32>,
    /// Subtype derived from the copy number
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub sv_type: Option<StructuralVariantType>,
}

/// Coordinates of a secondary alternate at a multiallelic site.
///
/// Location fields are only set when they differ from the primary alternate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternateCoordinate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chromosome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub alternate: String,
    #[serde(rename = "type")]
    pub variant_type: VariantType,
}

impl AlternateCoordinate {
    /// Create a secondary alternate carrying only its allele
    pub fn new(alternate: impl Into<String>) -> Self {
        let alternate = alternate.into();
        let variant_type = VariantType::infer("", &alternate);
        Self {
            chromosome: None,
            start: None,
            end: None,
            reference: None,
            alternate,
            variant_type,
        }
    }
}

/// A single variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "VariantRecord")]
pub struct Variant {
    /// Chromosome name (e.g., "1", "chrX")
    pub chromosome: String,
    /// 1-based start position
    pub start: u64,
    /// 1-based inclusive end position
    pub end: u64,
    /// Reference allele, possibly empty
    pub reference: String,
    /// Alternate allele, possibly empty or symbolic
    pub alternate: String,
    /// Variant identifiers (e.g., rsIDs)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<String>,
    /// Strand, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strand: Option<String>,
    /// Variant type
    #[serde(rename = "type")]
    pub variant_type: VariantType,
    /// Structural variant descriptor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sv: Option<StructuralVariation>,
    /// Per-study entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub studies: Vec<StudyEntry>,
}

/// Deserialization shape of [`Variant`]; the type is inferred when absent.
#[derive(Deserialize)]
struct VariantRecord {
    chromosome: String,
    start: u64,
    end: u64,
    #[serde(default)]
    reference: String,
    #[serde(default)]
    alternate: String,
    #[serde(default)]
    ids: Vec<String>,
    #[serde(default)]
    strand: Option<String>,
    #[serde(default, rename = "type")]
    variant_type: Option<VariantType>,
    #[serde(default)]
    sv: Option<StructuralVariation>,
    #[serde(default)]
    studies: Vec<StudyEntry>,
}

impl From<VariantRecord> for Variant {
    fn from(record: VariantRecord) -> Self {
        let variant_type = record
            .variant_type
            .unwrap_or_else(|| VariantType::infer(&record.reference, &record.alternate));
        Self {
            chromosome: record.chromosome,
            start: record.start,
            end: record.end,
            reference: record.reference,
            alternate: record.alternate,
            ids: record.ids,
            strand: record.strand,
            variant_type,
            sv: record.sv,
            studies: record.studies,
        }
    }
}

impl Variant {
    /// Create a variant, inferring its type from the alleles
    pub fn new(
        chromosome: impl Into<String>,
        start: u64,
        end: u64,
        reference: impl Into<String>,
        alternate: impl Into<String>,
    ) -> Self {
        let reference = reference.into();
        let alternate = alternate.into();
        let variant_type = VariantType::infer(&reference, &alternate);
        Self {
            chromosome: chromosome.into(),
            start,
            end,
            reference,
            alternate,
            ids: Vec::new(),
            strand: None,
            variant_type,
            sv: None,
            studies: Vec::new(),
        }
    }

    /// Set the variant type
    pub fn with_type(mut self, variant_type: VariantType) -> Self {
        self.variant_type = variant_type;
        self
    }

    /// Add a study entry
    pub fn with_study(mut self, study: StudyEntry) -> Self {
        self.studies.push(study);
        self
    }

    /// Check if the alternate allele is symbolic
    pub fn is_symbolic(&self) -> bool {
        is_symbolic_allele(&self.alternate)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_symbolic() {
            write!(
                f,
                "{}:{}-{}:{}",
                self.chromosome, self.start, self.end, self.alternate
            )
        } else {
            let reference = if self.reference.is_empty() {
                "-"
            } else {
                &self.reference
            };
            let alternate = if self.alternate.is_empty() {
                "-"
            } else {
                &self.alternate
            };
            write!(
                f,
                "{}:{}:{}:{}",
                self.chromosome, self.start, reference, alternate
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_sequence_types() {
        assert_eq!(VariantType::infer("A", "C"), VariantType::Snv);
        assert_eq!(VariantType::infer("AT", "GC"), VariantType::Mnv);
        assert_eq!(VariantType::infer("A", ""), VariantType::Indel);
        assert_eq!(VariantType::infer("", "TTT"), VariantType::Indel);
        assert_eq!(VariantType::infer("", ""), VariantType::NoVariation);
        assert_eq!(
            VariantType::infer("A", &"A".repeat(SV_THRESHOLD)),
            VariantType::Sv
        );
    }

    #[test]
    fn test_infer_symbolic_types() {
        assert_eq!(VariantType::infer("N", "<DEL>"), VariantType::Deletion);
        assert_eq!(VariantType::infer("N", "<DEL:ME>"), VariantType::Deletion);
        assert_eq!(VariantType::infer("N", "<DUP>"), VariantType::Duplication);
        assert_eq!(
            VariantType::infer("N", "<DUP:TANDEM>"),
            VariantType::TandemDuplication
        );
        assert_eq!(VariantType::infer("N", "<INV>"), VariantType::Inversion);
        assert_eq!(VariantType::infer("N", "<CNV>"), VariantType::Cnv);
        assert_eq!(VariantType::infer("N", "<CN0>"), VariantType::Cnv);
        assert_eq!(VariantType::infer("N", "<CN12>"), VariantType::Cnv);
        assert_eq!(VariantType::infer("N", "<FOO>"), VariantType::Symbolic);
        assert_eq!(
            VariantType::infer("G", "G]17:198982]"),
            VariantType::Breakend
        );
        assert_eq!(VariantType::infer("A", ".A"), VariantType::Breakend);
    }

    #[test]
    fn test_is_symbolic_allele() {
        assert!(is_symbolic_allele("<DEL>"));
        assert!(is_symbolic_allele("A[2:321682["));
        assert!(is_symbolic_allele("G."));
        assert!(!is_symbolic_allele("ACGT"));
        assert!(!is_symbolic_allele("."));
        assert!(!is_symbolic_allele(""));
    }

    #[test]
    fn test_copy_number_from_alternate() {
        assert_eq!(copy_number_from_alternate("<CN0>"), Some(0));
        assert_eq!(copy_number_from_alternate("<CN5>"), Some(5));
        assert_eq!(copy_number_from_alternate("<CNV>"), None);
        assert_eq!(copy_number_from_alternate("<CN>"), None);
        assert_eq!(copy_number_from_alternate("CN3"), None);
    }

    #[test]
    fn test_cnv_subtype() {
        assert_eq!(
            StructuralVariantType::from_copy_number(Some(0)),
            Some(StructuralVariantType::CopyNumberLoss)
        );
        assert_eq!(StructuralVariantType::from_copy_number(Some(2)), None);
        assert_eq!(
            StructuralVariantType::from_copy_number(Some(5)),
            Some(StructuralVariantType::CopyNumberGain)
        );
        assert_eq!(StructuralVariantType::from_copy_number(None), None);
    }

    #[test]
    fn test_variant_display() {
        assert_eq!(Variant::new("1", 1000, 1000, "A", "C").to_string(), "1:1000:A:C");
        assert_eq!(Variant::new("1", 101, 101, "A", "").to_string(), "1:101:A:-");
        assert_eq!(
            Variant::new("1", 1000, 2000, "N", "<DEL>").to_string(),
            "1:1000-2000:<DEL>"
        );
    }

    #[test]
    fn test_deserialize_infers_type() {
        let json = r#"{"chromosome":"1","start":100,"end":102,"reference":"CAG","alternate":"CG"}"#;
        let variant: Variant = serde_json::from_str(json).unwrap();
        assert_eq!(variant.variant_type, VariantType::Indel);
        assert!(variant.studies.is_empty());
    }

    #[test]
    fn test_deserialize_keeps_explicit_type() {
        let json = r#"{"chromosome":"1","start":100,"end":200,"reference":"A","alternate":"","type":"NO_VARIATION"}"#;
        let variant: Variant = serde_json::from_str(json).unwrap();
        assert_eq!(variant.variant_type, VariantType::NoVariation);
    }
}
