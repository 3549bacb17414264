//! Secondary alternates of multiallelic sites

use crate::error::NormalizeError;
use crate::model::{AlternateCoordinate, VariantType};

use super::key_fields::VariantKeyFields;

/// Secondary alternate coordinates of `current` among the records of its site.
///
/// Location fields are set only where they differ from `current`. Sites with
/// a single record and reference blocks have none. Decomposed MNVs cannot be
/// expressed as secondary alternates, so a phased site has none either.
///
/// # Errors
///
/// Returns [`NormalizeError::UnresolvableMultiallelicPhasing`] if the site
/// mixes phased records with records from a different input alternate.
pub fn secondary_alternates(
    chromosome: &str,
    current: &VariantKeyFields,
    records: &[VariantKeyFields],
) -> Result<Vec<AlternateCoordinate>, NormalizeError> {
    if records.len() == 1 || current.is_reference_block() {
        return Ok(Vec::new());
    }

    if records.iter().any(|r| r.phase_set().is_some()) {
        let mut alleles = records
            .iter()
            .filter(|r| !r.is_reference_block())
            .map(|r| r.num_allele);
        let first = alleles.next();
        if alleles.any(|n| Some(n) != first) {
            return Err(NormalizeError::UnresolvableMultiallelicPhasing {
                alleles: records
                    .iter()
                    .map(|r| format!("{}:{}", chromosome, r))
                    .collect::<Vec<_>>()
                    .join(" , "),
            });
        }
        return Ok(Vec::new());
    }

    Ok(records
        .iter()
        .filter(|r| !r.is_reference_block() && *r != current)
        .map(|r| AlternateCoordinate {
            chromosome: None,
            start: (r.start != current.start).then_some(r.start),
            end: (r.end != current.end).then_some(r.end),
            reference: (r.reference != current.reference).then(|| r.reference.clone()),
            alternate: r.alternate.clone(),
            variant_type: VariantType::infer(&r.reference, &r.alternate),
        })
        .collect())
}
