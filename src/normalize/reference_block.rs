//! Reference-block synthesis
//!
//! Covers every base of a site's original reference span that no normalized
//! allele accounts for with a no-variation record.
//!
//! Blocks start as one span over the whole site and are resolved against
//! their neighbours with [`resolve_overlap`] until nothing overlaps. Pieces
//! produced by a split go back on the worklist.

use std::collections::VecDeque;

use super::key_fields::VariantKeyFields;
use super::trim::span_end;

/// Inclusive genomic interval; `end < start` is an empty span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: u64,
    pub end: u64,
}

impl Span {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Check if the span covers no base
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Check if `other` lies within this span
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Check if the two spans share at least one base
    pub fn overlaps(&self, other: &Span) -> bool {
        !self.is_empty() && !other.is_empty() && self.start <= other.end && other.start <= self.end
    }

    fn union(&self, other: &Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// What occupies the span a block is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighbor {
    /// A real allele
    Variant,
    /// Another reference block
    ReferenceBlock,
}

/// Which of the two spans is discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Current,
    Other,
}

/// Result of resolving a block against one neighbour
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlapOutcome {
    /// Nothing to do
    NoOverlap,
    /// One of the two spans is redundant
    Consumed(Side),
    /// Both reference blocks collapse into this span
    Merged(Span),
    /// The block keeps these pieces outside the variant; empty means nothing is left
    Split(Vec<Span>),
}

/// Resolve a reference block against a neighbouring span.
///
/// ```text
/// contained:       |----|      current      -> Consumed(Current)
///                |--------|    other
///
/// left overlap:      |----|    current      -> Split([end+1..]) or Merged
///                 |----|       other
///
/// right overlap:  |----|       current      -> Split([..start-1]) or Merged
///                    |----|    other
///
/// inner:          |--------|   current      -> Split(both flanks) or Consumed(Other)
///                    |--|      other
/// ```
pub fn resolve_overlap(current: Span, other: Span, neighbor: Neighbor) -> OverlapOutcome {
    if !current.overlaps(&other) {
        return OverlapOutcome::NoOverlap;
    }
    if other.contains(&current) {
        return OverlapOutcome::Consumed(Side::Current);
    }
    match neighbor {
        Neighbor::ReferenceBlock if current.contains(&other) => {
            OverlapOutcome::Consumed(Side::Other)
        }
        Neighbor::ReferenceBlock => OverlapOutcome::Merged(current.union(&other)),
        Neighbor::Variant => {
            let mut pieces = Vec::with_capacity(2);
            if other.start > current.start {
                pieces.push(Span::new(current.start, other.start - 1));
            }
            if other.end < current.end {
                pieces.push(Span::new(other.end + 1, current.end));
            }
            OverlapOutcome::Split(pieces)
        }
    }
}

enum Step {
    Settled,
    Dropped,
    Reshaped(Span),
}

/// Add reference blocks for the uncovered part of `[position, position + len(reference) - 1]`.
///
/// A site that reduced to a single record anchored at `position` with the
/// original reference is returned untouched. Real records are kept as they
/// are; block records carry the covering slice of `reference`.
pub fn generate_reference_blocks(
    records: Vec<VariantKeyFields>,
    position: u64,
    reference: &str,
) -> Vec<VariantKeyFields> {
    if let [only] = records.as_slice() {
        if only.start == position && only.reference == reference {
            return records;
        }
    }
    if reference.is_empty() {
        return records;
    }

    let variants: Vec<Span> = records
        .iter()
        .filter(|r| !r.is_reference_block())
        .map(|r| Span::new(r.start, r.reference_end()))
        .collect();

    let mut pending = VecDeque::from([Span::new(position, span_end(position, reference.len()))]);
    let mut settled: Vec<Span> = Vec::new();
    while let Some(mut current) = pending.pop_front() {
        loop {
            match resolve_block(current, &variants, &mut settled, &mut pending) {
                Step::Settled => {
                    settled.push(current);
                    break;
                }
                Step::Dropped => break,
                Step::Reshaped(span) => current = span,
            }
        }
    }

    settled.sort_by_key(|span| span.start);
    let mut output = records;
    output.extend(settled.into_iter().map(|span| {
        let from = (span.start - position) as usize;
        let to = (span.end + 1 - position) as usize;
        VariantKeyFields::reference_block(
            span.start,
            span.end,
            reference.get(from..to).unwrap_or_default(),
        )
    }));
    output
}

fn resolve_block(
    current: Span,
    variants: &[Span],
    settled: &mut Vec<Span>,
    pending: &mut VecDeque<Span>,
) -> Step {
    for &variant in variants {
        match resolve_overlap(current, variant, Neighbor::Variant) {
            OverlapOutcome::NoOverlap => {}
            outcome => return apply(outcome, current, pending),
        }
    }
    for idx in 0..settled.len() {
        match resolve_overlap(current, settled[idx], Neighbor::ReferenceBlock) {
            OverlapOutcome::NoOverlap => {}
            OverlapOutcome::Consumed(Side::Other) => {
                settled.swap_remove(idx);
                return Step::Reshaped(current);
            }
            OverlapOutcome::Merged(span) => {
                settled.swap_remove(idx);
                return Step::Reshaped(span);
            }
            outcome => return apply(outcome, current, pending),
        }
    }
    Step::Settled
}

fn apply(outcome: OverlapOutcome, current: Span, pending: &mut VecDeque<Span>) -> Step {
    match outcome {
        OverlapOutcome::NoOverlap => Step::Settled,
        OverlapOutcome::Consumed(Side::Current) => Step::Dropped,
        OverlapOutcome::Consumed(Side::Other) => Step::Reshaped(current),
        OverlapOutcome::Merged(span) => Step::Reshaped(span),
        OverlapOutcome::Split(pieces) => {
            let mut pieces = pieces.into_iter();
            match pieces.next() {
                Some(first) => {
                    pending.extend(pieces);
                    Step::Reshaped(first)
                }
                None => Step::Dropped,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(records: &[VariantKeyFields]) -> Vec<(u64, u64, &str)> {
        records
            .iter()
            .filter(|r| r.is_reference_block())
            .map(|r| (r.start, r.end, r.reference.as_str()))
            .collect()
    }

    #[test]
    fn test_resolve_no_overlap() {
        let outcome = resolve_overlap(Span::new(1, 5), Span::new(6, 9), Neighbor::Variant);
        assert_eq!(outcome, OverlapOutcome::NoOverlap);
        // Insertions cover no base
        let outcome = resolve_overlap(Span::new(1, 5), Span::new(3, 2), Neighbor::Variant);
        assert_eq!(outcome, OverlapOutcome::NoOverlap);
    }

    #[test]
    fn test_resolve_contained() {
        let outcome = resolve_overlap(Span::new(3, 4), Span::new(1, 5), Neighbor::Variant);
        assert_eq!(outcome, OverlapOutcome::Consumed(Side::Current));
        let outcome = resolve_overlap(Span::new(3, 4), Span::new(1, 5), Neighbor::ReferenceBlock);
        assert_eq!(outcome, OverlapOutcome::Consumed(Side::Current));
    }

    #[test]
    fn test_resolve_left_overlap() {
        let outcome = resolve_overlap(Span::new(3, 8), Span::new(1, 4), Neighbor::Variant);
        assert_eq!(outcome, OverlapOutcome::Split(vec![Span::new(5, 8)]));
        let outcome = resolve_overlap(Span::new(3, 8), Span::new(1, 4), Neighbor::ReferenceBlock);
        assert_eq!(outcome, OverlapOutcome::Merged(Span::new(1, 8)));
    }

    #[test]
    fn test_resolve_right_overlap() {
        let outcome = resolve_overlap(Span::new(3, 8), Span::new(7, 10), Neighbor::Variant);
        assert_eq!(outcome, OverlapOutcome::Split(vec![Span::new(3, 6)]));
        let outcome = resolve_overlap(Span::new(3, 8), Span::new(7, 10), Neighbor::ReferenceBlock);
        assert_eq!(outcome, OverlapOutcome::Merged(Span::new(3, 10)));
    }

    #[test]
    fn test_resolve_inner() {
        let outcome = resolve_overlap(Span::new(1, 10), Span::new(4, 5), Neighbor::Variant);
        assert_eq!(
            outcome,
            OverlapOutcome::Split(vec![Span::new(1, 3), Span::new(6, 10)])
        );
        let outcome = resolve_overlap(Span::new(1, 10), Span::new(4, 5), Neighbor::ReferenceBlock);
        assert_eq!(outcome, OverlapOutcome::Consumed(Side::Other));
    }

    #[test]
    fn test_single_anchored_record_untouched() {
        let records = vec![VariantKeyFields::new(100, 100, 0, "A", "C")];
        let out = generate_reference_blocks(records.clone(), 100, "A");
        assert_eq!(out, records);
    }

    #[test]
    fn test_deletion_with_anchor_block() {
        let records = vec![VariantKeyFields::new(101, 101, 0, "A", "")];
        let out = generate_reference_blocks(records, 100, "CAG");
        assert_eq!(blocks(&out), vec![(100, 100, "C"), (102, 102, "G")]);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_multiallelic_blocks() {
        let records = vec![
            VariantKeyFields::new(101, 101, 0, "C", "T"),
            VariantKeyFields::new(103, 104, 1, "GT", ""),
        ];
        let out = generate_reference_blocks(records, 100, "ACGGTA");
        assert_eq!(
            blocks(&out),
            vec![(100, 100, "A"), (102, 102, "G"), (105, 105, "A")]
        );
    }

    #[test]
    fn test_insertion_does_not_split() {
        let records = vec![VariantKeyFields::new(101, 100, 0, "", "TT")];
        let out = generate_reference_blocks(records, 100, "A");
        assert_eq!(blocks(&out), vec![(100, 100, "A")]);
    }

    #[test]
    fn test_equal_alleles_become_whole_block() {
        let out = generate_reference_blocks(Vec::new(), 100, "ACG");
        assert_eq!(blocks(&out), vec![(100, 102, "ACG")]);
        assert_eq!(out[0].num_allele, 0);
        assert!(out[0].alternate.is_empty());
    }

    #[test]
    fn test_fully_covered_site_has_no_block() {
        let records = vec![VariantKeyFields::new(100, 102, 0, "ACG", "")];
        let out = generate_reference_blocks(records, 99, "TACG");
        assert_eq!(blocks(&out), vec![(99, 99, "T")]);

        let records = vec![
            VariantKeyFields::new(100, 101, 0, "AC", "GT"),
            VariantKeyFields::new(100, 101, 1, "AC", "TT"),
        ];
        let out = generate_reference_blocks(records, 100, "AC");
        assert!(blocks(&out).is_empty());
    }
}
