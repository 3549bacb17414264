//! Coordinate trimming
//!
//! Reduces a `(position, reference, alternate)` triple to its minimal form by
//! removing the shared suffix and then the shared prefix of the two alleles.
//!
//! # Coordinate System
//!
//! | Case | `start` | `end` |
//! |------|---------|-------|
//! | Insertion (empty reference) | `position` (+ shared prefix) | `start - 1` |
//! | Deletion (empty alternate) | `position` (+ shared prefix) | last deleted base |
//! | Substitution | `position` (+ shared prefix) | last reference base |
//!
//! The end is always derived from the reference span, never from the
//! alternate. Spans count bytes, so alleles must pass [`validate_allele`].

use super::key_fields::VariantKeyFields;
use crate::error::NormalizeError;

/// Check that an allele is ASCII, so each byte is one base.
///
/// # Errors
///
/// Returns [`NormalizeError::InvalidAllele`] otherwise.
pub fn validate_allele(allele: &str) -> Result<(), NormalizeError> {
    if allele.is_ascii() {
        Ok(())
    } else {
        Err(NormalizeError::InvalidAllele {
            allele: allele.to_string(),
        })
    }
}

/// Trim an allele pair to its minimal representation.
///
/// Returns `None` when the alleles are identical, which means there is no
/// variant to report.
///
/// # Example
///
/// ```
/// use ferro_varnorm::normalize::trim;
///
/// let kf = trim(100, "CAG", "CG", 0).unwrap();
/// assert_eq!((kf.start, kf.end), (101, 101));
/// assert_eq!((kf.reference.as_str(), kf.alternate.as_str()), ("A", ""));
/// ```
pub fn trim(
    position: u64,
    reference: &str,
    alternate: &str,
    num_allele: usize,
) -> Option<VariantKeyFields> {
    if reference == alternate {
        return None;
    }
    if reference.is_empty() {
        return Some(VariantKeyFields::new(
            position,
            position.saturating_sub(1),
            num_allele,
            "",
            alternate,
        ));
    }
    if alternate.is_empty() {
        return Some(VariantKeyFields::new(
            position,
            span_end(position, reference.len()),
            num_allele,
            reference,
            "",
        ));
    }

    let suffix = common_suffix_len(reference, alternate);
    let trimmed_ref = &reference[..reference.len() - suffix];
    let trimmed_alt = &alternate[..alternate.len() - suffix];

    let prefix = common_prefix_len(trimmed_ref, trimmed_alt);
    let end = span_end(position, trimmed_ref.len());
    let start = position + prefix as u64;

    Some(VariantKeyFields::new(
        start,
        end,
        num_allele,
        &trimmed_ref[prefix..],
        &trimmed_alt[prefix..],
    ))
}

/// Check if a trimmed allele pair is a multi-base substitution block.
///
/// Pure insertions and deletions (one side empty) and SNVs are not.
pub fn is_mnv(reference: &str, alternate: &str) -> bool {
    let (r, a) = (reference.len(), alternate.len());
    (r > 1 && a >= 1) || (a > 1 && r >= 1)
}

/// Last base of a span of `len` bases starting at `start`
pub(crate) fn span_end(start: u64, len: usize) -> u64 {
    (start + len as u64).saturating_sub(1)
}

/// Length in bytes of the longest common suffix, on char boundaries
fn common_suffix_len(a: &str, b: &str) -> usize {
    a.chars()
        .rev()
        .zip(b.chars().rev())
        .take_while(|(x, y)| x == y)
        .map(|(c, _)| c.len_utf8())
        .sum()
}

/// Length in bytes of the longest common prefix, on char boundaries
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .map(|(c, _)| c.len_utf8())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trimmed(position: u64, reference: &str, alternate: &str) -> (u64, u64, String, String) {
        let kf = trim(position, reference, alternate, 0).unwrap();
        (kf.start, kf.end, kf.reference, kf.alternate)
    }

    #[test]
    fn test_minimal_snv_unchanged() {
        assert_eq!(trimmed(1000, "A", "C"), (1000, 1000, "A".into(), "C".into()));
    }

    #[test]
    fn test_shared_prefix_and_suffix_deletion() {
        assert_eq!(trimmed(100, "CAG", "CG"), (101, 101, "A".into(), "".into()));
    }

    #[test]
    fn test_pure_insertion() {
        assert_eq!(trimmed(50, "", "T"), (50, 49, "".into(), "T".into()));
    }

    #[test]
    fn test_pure_deletion() {
        assert_eq!(trimmed(10, "ACG", ""), (10, 12, "ACG".into(), "".into()));
    }

    #[test]
    fn test_anchored_insertion() {
        // VCF-style anchor base
        assert_eq!(trimmed(20, "A", "ATT"), (21, 20, "".into(), "TT".into()));
        assert_eq!(trimmed(20, "AC", "AGC"), (21, 20, "".into(), "G".into()));
    }

    #[test]
    fn test_anchored_deletion() {
        assert_eq!(trimmed(20, "ATT", "A"), (21, 22, "TT".into(), "".into()));
    }

    #[test]
    fn test_suffix_only() {
        assert_eq!(trimmed(30, "GA", "TA"), (30, 30, "G".into(), "T".into()));
        assert_eq!(trimmed(30, "CA", "A"), (30, 30, "C".into(), "".into()));
    }

    #[test]
    fn test_mnv_block() {
        assert_eq!(trimmed(10, "CATG", "CGCG"), (11, 12, "AT".into(), "GC".into()));
    }

    #[test]
    fn test_equal_alleles() {
        assert!(trim(10, "ACGT", "ACGT", 0).is_none());
        assert!(trim(10, "", "", 0).is_none());
    }

    #[test]
    fn test_num_allele_carried() {
        assert_eq!(trim(10, "A", "G", 3).unwrap().num_allele, 3);
    }

    #[test]
    fn test_validate_allele() {
        assert!(validate_allele("ACGTN").is_ok());
        assert!(validate_allele("<CN2>").is_ok());
        assert!(validate_allele("").is_ok());
        assert_eq!(
            validate_allele("Aé"),
            Err(NormalizeError::InvalidAllele {
                allele: "Aé".to_string()
            })
        );
    }

    #[test]
    fn test_is_mnv() {
        assert!(is_mnv("AT", "GC"));
        assert!(is_mnv("A", "GC"));
        assert!(is_mnv("AT", "G"));
        assert!(!is_mnv("A", "G"));
        assert!(!is_mnv("", "GC"));
        assert!(!is_mnv("AT", ""));
    }
}
