//! MNV decomposition
//!
//! A multi-base substitution is aligned against its reference and split into
//! atomic SNVs, insertions and deletions that share one phase set.
//!
//! # Algorithm
//!
//! The aligned pair is scanned left to right. The genomic coordinate advances
//! only on columns with a reference base:
//!
//! | Column | Event |
//! |--------|-------|
//! | `-` / base | insertion before the current base, extended by following insertion columns |
//! | base / `-` | deletion of the current base, extended by following deletion columns |
//! | base / other base | SNV |
//! | base / same base | none |
//! | `-` / `-` | invalid alignment |

use crate::align::{AlignedPair, PairwiseAligner, GAP};
use crate::error::NormalizeError;

use super::key_fields::VariantKeyFields;

/// Phase-set identifier of an MNV, built from the site as it was given
pub fn phase_set_id(chromosome: &str, position: u64, reference: &str, alternate: &str) -> String {
    format!("{}:{}:{}:{}", chromosome, position, reference, alternate)
}

/// Decompose a trimmed MNV into phased atomic records.
///
/// Every record inherits `key_fields.num_allele` and carries `phase_set`.
///
/// # Errors
///
/// Returns [`NormalizeError::AlignmentInconsistency`] if the aligner output is
/// not a valid global alignment of the two alleles.
pub fn decompose_mnv<A: PairwiseAligner + ?Sized>(
    aligner: &A,
    key_fields: &VariantKeyFields,
    phase_set: &str,
) -> Result<Vec<VariantKeyFields>, NormalizeError> {
    let aligned = aligner.align(&key_fields.reference, &key_fields.alternate)?;
    let records = decompose_alignment(&aligned, key_fields.start)?;
    Ok(records
        .into_iter()
        .map(|mut record| {
            record.num_allele = key_fields.num_allele;
            record.with_phase_set(phase_set)
        })
        .collect())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Column {
    Insertion,
    Deletion,
    Aligned,
}

/// Turn an aligned pair into atomic records, in ascending position order.
///
/// # Errors
///
/// Returns [`NormalizeError::AlignmentInconsistency`] for rows of unequal
/// length or a column that is a gap on both rows.
pub fn decompose_alignment(
    aligned: &AlignedPair,
    genomic_start: u64,
) -> Result<Vec<VariantKeyFields>, NormalizeError> {
    let inconsistent = |detail: &str| NormalizeError::AlignmentInconsistency {
        reference: aligned.reference.clone(),
        alternate: aligned.alternate.clone(),
        detail: detail.to_string(),
    };
    if !aligned.is_rectangular() {
        return Err(inconsistent("aligned rows differ in length"));
    }

    let mut records: Vec<VariantKeyFields> = Vec::new();
    let mut position = genomic_start;
    let mut previous = Column::Aligned;

    for (ref_base, alt_base) in aligned.columns() {
        let column = match (ref_base == GAP, alt_base == GAP) {
            (true, true) => return Err(inconsistent("gap on both rows")),
            (true, false) => {
                match records.last_mut() {
                    Some(last) if previous == Column::Insertion => {
                        last.alternate.push(alt_base as char)
                    }
                    _ => records.push(VariantKeyFields::new(
                        position,
                        position.saturating_sub(1),
                        0,
                        "",
                        (alt_base as char).to_string(),
                    )),
                }
                Column::Insertion
            }
            (false, true) => {
                match records.last_mut() {
                    Some(last) if previous == Column::Deletion => {
                        last.reference.push(ref_base as char);
                        last.end += 1;
                    }
                    _ => records.push(VariantKeyFields::new(
                        position,
                        position,
                        0,
                        (ref_base as char).to_string(),
                        "",
                    )),
                }
                position += 1;
                Column::Deletion
            }
            (false, false) => {
                if ref_base != alt_base {
                    records.push(VariantKeyFields::new(
                        position,
                        position,
                        0,
                        (ref_base as char).to_string(),
                        (alt_base as char).to_string(),
                    ));
                }
                position += 1;
                Column::Aligned
            }
        };
        previous = column;
    }

    Ok(records)
}
