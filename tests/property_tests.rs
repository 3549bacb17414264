//! Property-based tests for variant normalization
//!
//! Minimality and idempotence of trimming, lossless MNV decomposition and
//! complete, non-overlapping reference-block coverage.

use ferro_varnorm::normalize::{is_mnv, trim};
use ferro_varnorm::{
    GlobalAligner, NormalizerConfig, PairwiseAligner, Variant, VariantKeyFields, VariantNormalizer,
};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

// =============================================================================
// Strategies
// =============================================================================

/// Generate a short nucleotide allele, possibly empty
fn allele() -> impl Strategy<Value = String> {
    "[ACGT]{0,8}"
}

/// Generate a non-empty nucleotide allele
fn non_empty_allele() -> impl Strategy<Value = String> {
    "[ACGT]{1,8}"
}

/// Generate small positive position numbers
fn position() -> impl Strategy<Value = u64> {
    1..100_000u64
}

/// Generate the alternates of a multiallelic site
fn alternates() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(allele(), 1..4)
}

// =============================================================================
// Helpers
// =============================================================================

fn span_end(start: u64, reference: &str) -> u64 {
    (start + reference.len() as u64).saturating_sub(1)
}

/// Apply atomic records to the reference they were called against.
fn apply_records(site_start: u64, reference: &str, records: &[VariantKeyFields]) -> String {
    let mut sequence: Vec<u8> = reference.as_bytes().to_vec();
    let mut ordered: Vec<&VariantKeyFields> = records.iter().collect();
    // Right to left; at a shared start, edit the base before inserting ahead of it
    ordered.sort_by_key(|r| (std::cmp::Reverse(r.start), r.reference.is_empty()));
    for record in ordered {
        let offset = (record.start - site_start) as usize;
        sequence.splice(
            offset..offset + record.reference.len(),
            record.alternate.bytes(),
        );
    }
    String::from_utf8(sequence).unwrap()
}

// =============================================================================
// Trimming
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_trim_is_minimal(pos in position(), reference in allele(), alternate in allele()) {
        prop_assume!(reference != alternate);
        let kf = trim(pos, &reference, &alternate, 0).unwrap();

        if !kf.reference.is_empty() && !kf.alternate.is_empty() {
            prop_assert_ne!(kf.reference.as_bytes()[0], kf.alternate.as_bytes()[0]);
            prop_assert_ne!(kf.reference.as_bytes().last(), kf.alternate.as_bytes().last());
        }
        prop_assert_eq!(kf.end, span_end(kf.start, &kf.reference));
        prop_assert!(kf.start >= pos);
    }

    #[test]
    fn prop_trim_keeps_the_edit(pos in position(), reference in allele(), alternate in allele()) {
        prop_assume!(reference != alternate);
        let kf = trim(pos, &reference, &alternate, 0).unwrap();
        prop_assert_eq!(apply_records(pos, &reference, &[kf]), alternate);
    }

    #[test]
    fn prop_equal_alleles_trim_to_nothing(pos in position(), allele in allele()) {
        prop_assert!(trim(pos, &allele, &allele, 0).is_none());
    }

    #[test]
    fn prop_normalize_is_idempotent(
        pos in position(),
        reference in allele(),
        alternate in allele(),
    ) {
        prop_assume!(reference != alternate);
        let normalizer = VariantNormalizer::new(NormalizerConfig::default());
        let variant = Variant::new("1", pos, span_end(pos, &reference), reference, alternate);

        let once = normalizer.normalize(vec![variant]).unwrap();
        prop_assert_eq!(once.len(), 1);
        let twice = normalizer.normalize(once.clone()).unwrap();
        prop_assert_eq!(twice, once);
    }
}

// =============================================================================
// MNV decomposition
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_alignment_preserves_sequences(a in non_empty_allele(), b in non_empty_allele()) {
        let aligned = GlobalAligner::default().align(&a, &b).unwrap();
        prop_assert!(aligned.is_rectangular());
        prop_assert_eq!(aligned.reference.replace('-', ""), a);
        prop_assert_eq!(aligned.alternate.replace('-', ""), b);
    }

    #[test]
    fn prop_decomposition_round_trip(
        pos in position(),
        reference in non_empty_allele(),
        alternate in non_empty_allele(),
    ) {
        prop_assume!(reference != alternate);
        let normalizer =
            VariantNormalizer::new(NormalizerConfig::default().with_mnv_decomposition(true));
        let records = normalizer.normalize_alleles("1", pos, &reference, &[alternate.clone()]);
        let trimmed = trim(pos, &reference, &alternate, 0).unwrap();

        prop_assert_eq!(apply_records(pos, &reference, &records), alternate);
        if is_mnv(&trimmed.reference, &trimmed.alternate) {
            let phase_sets: Vec<_> = records.iter().map(|r| r.phase_set()).collect();
            prop_assert!(phase_sets.iter().all(|ps| ps.is_some() && *ps == phase_sets[0]));
        } else {
            prop_assert_eq!(records, vec![trimmed]);
        }
    }
}

// =============================================================================
// Reference blocks
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn prop_reference_blocks_cover_site(
        pos in position(),
        reference in non_empty_allele(),
        alternates in alternates(),
        decompose in any::<bool>(),
    ) {
        let config = NormalizerConfig::default()
            .with_reference_blocks(true)
            .with_mnv_decomposition(decompose);
        let normalizer = VariantNormalizer::new(config);
        let records = normalizer.normalize_alleles("1", pos, &reference, &alternates);
        let site_end = span_end(pos, &reference);

        let (blocks, variants): (Vec<_>, Vec<_>) =
            records.iter().partition(|r| r.is_reference_block());

        for block in &blocks {
            prop_assert!(block.start >= pos && block.end <= site_end);
            prop_assert!(block.start <= block.end);
            let from = (block.start - pos) as usize;
            let to = (block.end - pos) as usize + 1;
            prop_assert_eq!(&block.reference, &reference[from..to]);
        }

        for base in pos..=site_end {
            let in_blocks = blocks
                .iter()
                .filter(|b| b.start <= base && base <= b.end)
                .count();
            let in_variants = variants
                .iter()
                .any(|v| v.start <= base && base <= v.reference_end());
            if in_variants {
                prop_assert_eq!(in_blocks, 0, "base {} is both variant and block", base);
            } else {
                prop_assert_eq!(in_blocks, 1, "base {} covered by {} blocks", base, in_blocks);
            }
        }

        let starts: Vec<u64> = records.iter().map(|r| r.start).collect();
        prop_assert!(starts.windows(2).all(|w| w[0] <= w[1]));
    }
}
