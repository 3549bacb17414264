//! Normalization engine
//!
//! Turns each input variant into one output variant per normalized allele:
//! alleles are trimmed to their minimal form, multi-base substitutions can be
//! decomposed into phased atomic records, multiallelic sites can be padded
//! with reference blocks, and the per-sample matrix is remapped to the new
//! allele numbering.
//!
//! # Coordinate Systems
//!
//! | Context | Basis | Notes |
//! |---------|-------|-------|
//! | Variant / key-field positions | 1-based | Inclusive; insertions have `end = start - 1` |
//! | Allele slicing | 0-based | `position - site_start` into the original reference |
//! | Allele indices | 0 = reference | Alternates from 1, in input order |
//!
//! # Output modes
//!
//! A variant whose site yields exactly one record (and has at most one study)
//! is rewritten in place when [`NormalizerConfig::reuse_variants`] is set;
//! otherwise every output variant is built fresh. Both modes produce the same
//! records.

mod config;
mod decompose;
mod key_fields;
mod reference_block;
mod samples;
mod secondary;
mod symbolic;
mod trim;

pub use config::NormalizerConfig;
pub use decompose::{decompose_alignment, decompose_mnv, phase_set_id};
pub use key_fields::{AlleleKind, VariantKeyFields};
pub use reference_block::{
    generate_reference_blocks, resolve_overlap, Neighbor, OverlapOutcome, Side, Span,
};
pub use samples::{allele_remap_table, genotype_reorder_map, SampleRemapper};
pub use secondary::secondary_alternates;
pub use symbolic::{
    copy_number_of, normalize_symbolic, structural_variation, CIEND_ATTRIBUTE, CIPOS_ATTRIBUTE,
};
pub use trim::{is_mnv, trim, validate_allele};

use std::sync::Arc;

use crate::align::{GlobalAligner, PairwiseAligner};
use crate::cache::GenotypeReorderCache;
use crate::error::NormalizeError;
use crate::model::{
    FileEntry, StructuralVariation, StudyEntry, Variant, VariantType, END_ATTRIBUTE,
    PHASE_SET_FIELD,
};

/// The original site a variant's records were normalized from
struct Site {
    chromosome: String,
    start: u64,
    end: u64,
    reference: String,
    alternate: String,
    alternates: Vec<String>,
    copy_number: Option<String>,
    symbolic: bool,
}

impl Site {
    fn new(variant: &Variant, study: Option<&StudyEntry>) -> Self {
        let mut alternates = vec![variant.alternate.clone()];
        if let Some(study) = study {
            alternates.extend(study.secondary_alternate_alleles().map(String::from));
        }
        let symbolic = variant.is_symbolic();
        Self {
            chromosome: variant.chromosome.clone(),
            start: variant.start,
            end: variant.end,
            reference: variant.reference.clone(),
            alternate: variant.alternate.clone(),
            alternates,
            copy_number: if symbolic {
                copy_number_of(variant).map(String::from)
            } else {
                None
            },
            symbolic,
        }
    }

    /// Provenance string recorded on the file entries of changed variants
    fn call(&self, num_allele: usize) -> String {
        format!(
            "{}:{}:{}:{}",
            self.start,
            self.reference,
            self.alternates.join(","),
            num_allele
        )
    }

    fn is_unchanged(&self, records: &[VariantKeyFields]) -> bool {
        match records {
            [only] => {
                only.start == self.start
                    && only.reference == self.reference
                    && only.alternate == self.alternate
            }
            _ => false,
        }
    }
}

/// Everything an output variant needs besides its identity fields
struct NormalizedRecord {
    key_fields: VariantKeyFields,
    sv: Option<StructuralVariation>,
    study: Option<StudyEntry>,
}

impl NormalizedRecord {
    /// Write the record into `target`, which is either the input variant
    /// itself or a fresh copy of its identity fields.
    fn apply(self, mut target: Variant) -> Variant {
        let kf = self.key_fields;
        target.start = kf.start;
        target.end = kf.end;
        target.variant_type = if kf.is_reference_block() {
            VariantType::NoVariation
        } else {
            VariantType::infer(&kf.reference, &kf.alternate)
        };
        target.reference = kf.reference;
        target.alternate = kf.alternate;
        target.sv = self.sv;
        target.studies = self.study.into_iter().collect();
        target
    }
}

/// Variant normalizer
///
/// Stateless across calls apart from the shared genotype reordering cache.
#[derive(Debug, Clone)]
pub struct VariantNormalizer<A: PairwiseAligner = GlobalAligner> {
    config: NormalizerConfig,
    aligner: A,
    cache: Arc<GenotypeReorderCache>,
}

impl VariantNormalizer<GlobalAligner> {
    /// Create a normalizer with the default aligner and a private cache
    pub fn new(config: NormalizerConfig) -> Self {
        let aligner = GlobalAligner::new(config.gap_open, config.gap_extend);
        Self {
            config,
            aligner,
            cache: Arc::new(GenotypeReorderCache::new()),
        }
    }
}

impl Default for VariantNormalizer<GlobalAligner> {
    fn default() -> Self {
        Self::new(NormalizerConfig::default())
    }
}

impl<A: PairwiseAligner> VariantNormalizer<A> {
    /// Replace the aligner used for MNV decomposition
    pub fn with_aligner<B: PairwiseAligner>(self, aligner: B) -> VariantNormalizer<B> {
        VariantNormalizer {
            config: self.config,
            aligner,
            cache: self.cache,
        }
    }

    /// Share a genotype reordering cache
    pub fn with_cache(mut self, cache: Arc<GenotypeReorderCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Get the genotype reordering cache
    pub fn cache(&self) -> &Arc<GenotypeReorderCache> {
        &self.cache
    }

    /// Normalize a batch of variants.
    ///
    /// Output order follows the input; a site can expand into several
    /// variants.
    ///
    /// # Errors
    ///
    /// Stops at the first variant that fails. Use
    /// [`BatchProcessor`](crate::batch::BatchProcessor) to isolate failures
    /// per variant.
    pub fn normalize(&self, batch: Vec<Variant>) -> Result<Vec<Variant>, NormalizeError> {
        let mut normalized = Vec::with_capacity(batch.len());
        for variant in batch {
            normalized.extend(self.normalize_variant(variant)?);
        }
        Ok(normalized)
    }

    /// Normalize a single variant.
    ///
    /// Returns an empty list when every alternate equals the reference and no
    /// reference block is generated.
    pub fn normalize_variant(&self, variant: Variant) -> Result<Vec<Variant>, NormalizeError> {
        if !is_normalizable(&variant) {
            return Ok(vec![variant]);
        }
        if variant.start == 0 {
            return Err(NormalizeError::InvalidCoordinates {
                msg: format!("position 0 in {}", variant),
            });
        }
        validate_allele(&variant.reference)?;
        validate_allele(&variant.alternate)?;
        for study in &variant.studies {
            for alternate in study.secondary_alternate_alleles() {
                validate_allele(alternate)?;
            }
        }

        if variant.studies.len() <= 1 {
            let site = Site::new(&variant, variant.studies.first());
            let records = self.site_records(&site);
            let mut normalized =
                self.normalize_records(&variant, &site, variant.studies.first(), records)?;
            if self.config.reuse_variants && normalized.len() == 1 {
                if let Some(record) = normalized.pop() {
                    return Ok(vec![record.apply(variant)]);
                }
            }
            return Ok(normalized
                .into_iter()
                .map(|record| record.apply(skeleton(&variant)))
                .collect());
        }

        let mut output = Vec::new();
        for study in &variant.studies {
            let site = Site::new(&variant, Some(study));
            let records = self.site_records(&site);
            let normalized = self.normalize_records(&variant, &site, Some(study), records)?;
            output.extend(
                normalized
                    .into_iter()
                    .map(|record| record.apply(skeleton(&variant))),
            );
        }
        Ok(output)
    }

    /// Normalize the alternates of a sequence site.
    ///
    /// Each alternate is trimmed; MNVs are decomposed and reference blocks
    /// added when configured. Records are sorted by start. Alleles are
    /// expected to pass [`validate_allele`].
    pub fn normalize_alleles(
        &self,
        chromosome: &str,
        position: u64,
        reference: &str,
        alternates: &[String],
    ) -> Vec<VariantKeyFields> {
        let mut records = Vec::with_capacity(alternates.len());
        for (num_allele, alternate) in alternates.iter().enumerate() {
            let Some(key_fields) = trim(position, reference, alternate, num_allele) else {
                continue;
            };
            if self.config.decompose_mnvs && is_mnv(&key_fields.reference, &key_fields.alternate) {
                let phase_set = phase_set_id(chromosome, position, reference, alternate);
                match decompose_mnv(&self.aligner, &key_fields, &phase_set) {
                    Ok(parts) => records.extend(parts),
                    Err(err) => {
                        log::error!(
                            "{}; keeping {}:{} undecomposed",
                            err.detailed_message(),
                            chromosome,
                            key_fields
                        );
                        records.push(key_fields);
                    }
                }
            } else {
                records.push(key_fields);
            }
        }

        if self.config.generate_reference_blocks {
            records = generate_reference_blocks(records, position, reference);
        }
        records.sort_by_key(|r| r.start);
        records
    }

    /// Remap a study's sample matrix for one normalized record.
    ///
    /// `reference` and `alternates` are the site's alleles as given.
    pub fn normalize_samples_data(
        &self,
        key_fields: &VariantKeyFields,
        samples_data: &[Vec<String>],
        format: &[String],
        reference: &str,
        alternates: &[String],
    ) -> Result<Vec<Vec<String>>, NormalizeError> {
        SampleRemapper::new(key_fields, reference, alternates, &self.cache)
            .with_allele_normalization(self.config.normalize_alleles)
            .remap(samples_data, format)
    }

    fn site_records(&self, site: &Site) -> Vec<VariantKeyFields> {
        if site.symbolic {
            normalize_symbolic(
                site.start,
                site.end,
                &site.reference,
                &site.alternates,
                site.copy_number.as_deref(),
            )
        } else {
            self.normalize_alleles(
                &site.chromosome,
                site.start,
                &site.reference,
                &site.alternates,
            )
        }
    }

    fn normalize_records(
        &self,
        variant: &Variant,
        site: &Site,
        study: Option<&StudyEntry>,
        records: Vec<VariantKeyFields>,
    ) -> Result<Vec<NormalizedRecord>, NormalizeError> {
        if records.is_empty() {
            log::debug!("Dropping {}: no alternate differs from the reference", variant);
        }
        let unchanged = site.is_unchanged(&records);
        records
            .iter()
            .map(|kf| -> Result<NormalizedRecord, NormalizeError> {
                let sv = if site.symbolic {
                    Some(structural_variation(variant, kf, site.copy_number.as_deref())?)
                } else {
                    variant.sv.clone()
                };
                let study = self
                    .normalize_study(site, kf, &records, study, unchanged)
                    .map_err(|err| {
                        log::warn!(
                            "Error normalizing variant {}, numAllele {}: {}",
                            site.call(kf.num_allele),
                            kf.num_allele,
                            err
                        );
                        err
                    })?;
                Ok(NormalizedRecord {
                    key_fields: kf.clone(),
                    sv,
                    study,
                })
            })
            .collect()
    }

    fn normalize_study(
        &self,
        site: &Site,
        kf: &VariantKeyFields,
        records: &[VariantKeyFields],
        study: Option<&StudyEntry>,
        unchanged: bool,
    ) -> Result<Option<StudyEntry>, NormalizeError> {
        let call = site.call(kf.num_allele);

        let Some(study) = study else {
            // Without studies, only phased records carry sample data
            return Ok(kf.phase_set().map(|ps| StudyEntry {
                format: vec![PHASE_SET_FIELD.to_string()],
                samples_data: vec![vec![ps.to_string()]],
                files: vec![FileEntry::new(ps, call.clone())],
                ..Default::default()
            }));
        };

        let file_call = if unchanged { String::new() } else { call.clone() };
        let mut entry = StudyEntry {
            study_id: study.study_id.clone(),
            sample_names: study.sample_names.clone(),
            format: study.format.clone(),
            samples_data: Vec::new(),
            files: study
                .files
                .iter()
                .map(|file| FileEntry {
                    file_id: file.file_id.clone(),
                    call: file_call.clone(),
                    attributes: file.attributes.clone(),
                })
                .collect(),
            secondary_alternates: secondary_alternates(&site.chromosome, kf, records)?,
        };

        if kf.is_reference_block() {
            for file in &mut entry.files {
                file.attributes
                    .insert(END_ATTRIBUTE.to_string(), kf.end.to_string());
            }
        }
        if let Some(ps) = kf.phase_set() {
            entry.add_format(PHASE_SET_FIELD);
            if entry.files.is_empty() {
                entry.files.push(FileEntry::new(ps, call));
            }
        }

        entry.samples_data = self.normalize_samples_data(
            kf,
            &study.samples_data,
            &entry.format,
            &site.reference,
            &site.alternates,
        )?;
        Ok(Some(entry))
    }
}

/// Check if a variant goes through normalization at all.
///
/// Reference blocks and untyped symbolic alleles pass through untouched.
pub fn is_normalizable(variant: &Variant) -> bool {
    !matches!(
        variant.variant_type,
        VariantType::NoVariation | VariantType::Symbolic
    )
}

/// A fresh variant carrying only the identity fields of `variant`
fn skeleton(variant: &Variant) -> Variant {
    Variant {
        chromosome: variant.chromosome.clone(),
        start: variant.start,
        end: variant.end,
        reference: String::new(),
        alternate: String::new(),
        ids: variant.ids.clone(),
        strand: variant.strand.clone(),
        variant_type: variant.variant_type,
        sv: None,
        studies: Vec::new(),
    }
}
