//! Sample-data remapping
//!
//! After a site is split per alternate, allele indices in the sample matrix
//! must follow the new numbering: the reference stays 0, the record's own
//! alternate becomes 1 and every other alternate becomes 2, 3, ... in its
//! original order.
//!
//! # Genotype ordering
//!
//! Likelihood-style fields (`GL`, `PL`, `GP`) hold one value per possible
//! genotype. For diploid calls, genotype `a/b` with `a <= b` sits at position
//! `b(b+1)/2 + a`:
//!
//! | Alleles | Order |
//! |---------|-------|
//! | 2 | `00, 01, 11` |
//! | 3 | `00, 01, 11, 02, 12, 22` |
//! | 4 | `00, 01, 11, 02, 12, 22, 03, 13, 23, 33` |

use crate::cache::GenotypeReorderCache;
use crate::error::{NormalizeError, WARN_UNSUPPORTED_PLOIDY};
use crate::model::{Genotype, GENOTYPE_FIELD, PHASE_SET_FIELD};

use super::key_fields::VariantKeyFields;

const LIKELIHOOD_FIELDS: [&str; 3] = ["GL", "PL", "GP"];

/// Map each original allele index to its index after normalization.
///
/// `table[0]` is the reference; `table[k]` is the new index of original
/// alternate `k - 1`.
pub fn allele_remap_table(num_allele: usize, alternate_count: usize) -> Vec<usize> {
    let mut table = Vec::with_capacity(alternate_count + 1);
    table.push(0);
    let mut secondary = 2;
    for idx in 0..alternate_count {
        if idx == num_allele {
            table.push(1);
        } else {
            table.push(secondary);
            secondary += 1;
        }
    }
    table
}

/// Diploid genotype permutation for an allele remap table.
///
/// `map[i]` is the original position of the genotype now at position `i`,
/// so a remapped list is `new[i] = old[map[i]]`.
pub fn genotype_reorder_map(table: &[usize]) -> Vec<usize> {
    let mut inverse = vec![0; table.len()];
    for (original, &new) in table.iter().enumerate() {
        if let Some(slot) = inverse.get_mut(new) {
            *slot = original;
        }
    }

    let mut map = Vec::with_capacity(diploid_genotype_count(table.len()));
    for b in 0..table.len() {
        for a in 0..=b {
            let (x, y) = (inverse[a], inverse[b]);
            let (lo, hi) = if x <= y { (x, y) } else { (y, x) };
            map.push(hi * (hi + 1) / 2 + lo);
        }
    }
    map
}

fn diploid_genotype_count(allele_count: usize) -> usize {
    allele_count * (allele_count + 1) / 2
}

/// Rewrites a study's sample matrix for one normalized record.
pub struct SampleRemapper<'a> {
    key_fields: &'a VariantKeyFields,
    reference: &'a str,
    alternates: &'a [String],
    table: Vec<usize>,
    normalize_alleles: bool,
    cache: &'a GenotypeReorderCache,
}

impl<'a> SampleRemapper<'a> {
    /// Create a remapper for `key_fields`, with `reference` and `alternates`
    /// being the site's alleles as given.
    pub fn new(
        key_fields: &'a VariantKeyFields,
        reference: &'a str,
        alternates: &'a [String],
        cache: &'a GenotypeReorderCache,
    ) -> Self {
        Self {
            key_fields,
            reference,
            alternates,
            table: allele_remap_table(key_fields.num_allele, alternates.len()),
            normalize_alleles: false,
            cache,
        }
    }

    /// Sort the alleles of unphased genotypes
    pub fn with_allele_normalization(mut self, normalize: bool) -> Self {
        self.normalize_alleles = normalize;
        self
    }

    /// Remap every sample row against `format`.
    ///
    /// Rows shorter than `format` read the missing cells as empty. When there
    /// are no rows and the record is phased, one row holding the phase set is
    /// synthesized.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::MalformedGenotype`] for an unparseable `GT`
    /// and [`NormalizeError::MalformedSampleField`] for a likelihood list of
    /// the wrong length.
    pub fn remap(
        &self,
        samples_data: &[Vec<String>],
        format: &[String],
    ) -> Result<Vec<Vec<String>>, NormalizeError> {
        if samples_data.is_empty() {
            return Ok(match self.key_fields.phase_set() {
                Some(ps) => vec![format
                    .iter()
                    .map(|field| {
                        if field == PHASE_SET_FIELD {
                            ps.to_string()
                        } else {
                            ".".to_string()
                        }
                    })
                    .collect()],
                None => Vec::new(),
            });
        }

        samples_data
            .iter()
            .map(|row| self.remap_row(row, format))
            .collect()
    }

    fn remap_row(&self, row: &[String], format: &[String]) -> Result<Vec<String>, NormalizeError> {
        let mut genotype: Option<Genotype> = None;
        let mut output = Vec::with_capacity(format.len());

        for (idx, field) in format.iter().enumerate() {
            let value = row.get(idx).map(String::as_str).unwrap_or("");

            let remapped = if field.eq_ignore_ascii_case(GENOTYPE_FIELD) {
                let parsed = Genotype::parse(value, self.reference, self.alternates)?;
                let text = self.remap_genotype(&parsed);
                genotype = Some(parsed);
                text
            } else if LIKELIHOOD_FIELDS
                .iter()
                .any(|f| field.eq_ignore_ascii_case(f))
            {
                match &genotype {
                    Some(gt) if value != "." && gt.is_resolved() => {
                        self.remap_likelihoods(field, value, gt.ploidy())?
                    }
                    _ => value.to_string(),
                }
            } else if field == PHASE_SET_FIELD {
                self.key_fields
                    .phase_set()
                    .unwrap_or(value)
                    .to_string()
            } else {
                value.to_string()
            };
            output.push(remapped);
        }
        Ok(output)
    }

    fn remap_genotype(&self, genotype: &Genotype) -> String {
        let mut alleles: Vec<Option<usize>> = genotype
            .alleles()
            .iter()
            .map(|allele| match *allele {
                Some(a) if a > 0 => Some(self.table.get(a).copied().unwrap_or(a)),
                other => other,
            })
            .collect();
        if self.normalize_alleles && !genotype.is_phased() {
            alleles.sort_unstable();
        }

        let separator = if genotype.is_phased() { "|" } else { "/" };
        let reference_block = self.key_fields.is_reference_block();
        alleles
            .iter()
            .map(|allele| match allele {
                None => ".".to_string(),
                Some(_) if reference_block => "0".to_string(),
                Some(a) => a.to_string(),
            })
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn remap_likelihoods(
        &self,
        field: &str,
        value: &str,
        ploidy: usize,
    ) -> Result<String, NormalizeError> {
        let values: Vec<&str> = value.split(',').collect();
        let allele_count = self.table.len();
        let malformed = |expected: usize| NormalizeError::MalformedSampleField {
            field: field.to_string(),
            value: value.to_string(),
            expected,
        };

        let reordered: Vec<&str> = match ploidy {
            1 => {
                if values.len() != allele_count {
                    return Err(malformed(allele_count));
                }
                let mut reordered = vec![""; allele_count];
                for (original, &new) in self.table.iter().enumerate() {
                    reordered[new] = values[original];
                }
                reordered
            }
            2 => {
                let expected = diploid_genotype_count(allele_count);
                if values.len() != expected {
                    return Err(malformed(expected));
                }
                let map = self
                    .cache
                    .get_or_insert_with((self.key_fields.num_allele, allele_count), || {
                        genotype_reorder_map(&self.table)
                    });
                map.iter().map(|&original| values[original]).collect()
            }
            _ => {
                log::warn!(
                    "[{}] Not normalizing {} with ploidy {}",
                    WARN_UNSUPPORTED_PLOIDY,
                    field,
                    ploidy
                );
                return Ok(value.to_string());
            }
        };
        Ok(reordered.join(","))
    }
}
