//! Symbolic and structural allele handling
//!
//! Breakpoints of symbolic alleles are definitional, so no trimming is
//! applied. The reference collapses to a single placeholder base and
//! `<CNV>` alleles pick up their copy number when one is known.
//!
//! # Coordinate System
//!
//! | Field | Source | Default |
//! |-------|--------|---------|
//! | `ci_start_left`, `ci_start_right` | `start` + `CIPOS` offsets | `start` |
//! | `ci_end_left`, `ci_end_right` | `end` + `CIEND` offsets | `end` |

use crate::error::NormalizeError;
use crate::model::{
    copy_number_from_alternate, StructuralVariantType, StructuralVariation, Variant, VariantType,
    COPY_NUMBER_FIELD,
};

use super::key_fields::VariantKeyFields;

/// Start confidence-interval attribute
pub const CIPOS_ATTRIBUTE: &str = "CIPOS";
/// End confidence-interval attribute
pub const CIEND_ATTRIBUTE: &str = "CIEND";

const CNV_ALLELE: &str = "<CNV>";

/// Build structural key fields for every alternate of a symbolic site.
///
/// `copy_number` rewrites `<CNV>` to `<CNn>` when it is a plain number.
pub fn normalize_symbolic(
    start: u64,
    end: u64,
    reference: &str,
    alternates: &[String],
    copy_number: Option<&str>,
) -> Vec<VariantKeyFields> {
    let reference = if matches!(reference, "A" | "C" | "G" | "T" | "N") {
        reference
    } else {
        "N"
    };
    let copy_number = copy_number.filter(|cn| is_numeric(cn));

    alternates
        .iter()
        .enumerate()
        .map(|(num_allele, alternate)| {
            let alternate = match copy_number {
                Some(cn) if alternate == CNV_ALLELE => format!("<CN{}>", cn),
                _ => alternate.clone(),
            };
            VariantKeyFields::structural(start, end, num_allele, reference, alternate)
        })
        .collect()
}

/// Copy number of a CNV site, from the first sample or the first file record.
pub fn copy_number_of(variant: &Variant) -> Option<&str> {
    if variant.variant_type != VariantType::Cnv {
        return None;
    }
    let study = variant.studies.first()?;
    study
        .sample_value(0, COPY_NUMBER_FIELD)
        .or_else(|| study.first_file_attribute(COPY_NUMBER_FIELD))
}

/// Build the structural descriptor of a normalized symbolic record.
///
/// Fields already present on the input descriptor are kept. Confidence
/// intervals come from the first file record of the first study.
///
/// # Errors
///
/// Returns [`NormalizeError::MalformedAttribute`] if `CIPOS`/`CIEND` is not
/// a pair of integers.
pub fn structural_variation(
    variant: &Variant,
    key_fields: &VariantKeyFields,
    copy_number: Option<&str>,
) -> Result<StructuralVariation, NormalizeError> {
    let mut sv = variant.sv.clone().unwrap_or_default();

    let (start_left, start_right) = confidence_interval(variant, CIPOS_ATTRIBUTE, variant.start)?;
    let (end_left, end_right) = confidence_interval(variant, CIEND_ATTRIBUTE, variant.end)?;
    sv.ci_start_left.get_or_insert(start_left);
    sv.ci_start_right.get_or_insert(start_right);
    sv.ci_end_left.get_or_insert(end_left);
    sv.ci_end_right.get_or_insert(end_right);

    if variant.variant_type == VariantType::Cnv {
        if sv.copy_number.is_none() {
            sv.copy_number = copy_number
                .filter(|cn| is_numeric(cn))
                .and_then(|cn| cn.parse().ok())
                .or_else(|| copy_number_from_alternate(&key_fields.alternate));
        }
        sv.sv_type = StructuralVariantType::from_copy_number(sv.copy_number);
    }
    Ok(sv)
}

fn confidence_interval(
    variant: &Variant,
    key: &str,
    position: u64,
) -> Result<(u64, u64), NormalizeError> {
    let value = match variant
        .studies
        .first()
        .and_then(|study| study.first_file_attribute(key))
    {
        Some(value) => value,
        None => return Ok((position, position)),
    };

    let malformed = || NormalizeError::MalformedAttribute {
        key: key.to_string(),
        value: value.to_string(),
    };
    let mut parts = value.split(',').map(|p| p.trim().parse::<i64>());
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(low)), Some(Ok(high)), None) => Ok((
            position.saturating_add_signed(low),
            position.saturating_add_signed(high),
        )),
        _ => Err(malformed()),
    }
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
