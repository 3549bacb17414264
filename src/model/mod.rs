//! In-memory variant data model
//!
//! The normalizer consumes and produces these types; it never parses raw
//! file formats. Everything derives `serde` so records can be exchanged as
//! JSON by the command-line tool.

mod genotype;
mod study;
mod variant;

pub use genotype::{AllelesCode, Genotype};
pub use study::{
    FileEntry, StudyEntry, COPY_NUMBER_FIELD, END_ATTRIBUTE, GENOTYPE_FIELD, PHASE_SET_FIELD,
};
pub use variant::{
    copy_number_from_alternate, is_symbolic_allele, AlternateCoordinate, StructuralVariantType,
    StructuralVariation, Variant, VariantType, SV_THRESHOLD,
};
