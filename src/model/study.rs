//! Per-study variant data
//!
//! A study entry holds the FORMAT field names, the per-sample value matrix
//! aligned to them, the file records the variant was read from and the
//! secondary alternates of a multiallelic site.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::variant::AlternateCoordinate;

/// Phase set FORMAT field
pub const PHASE_SET_FIELD: &str = "PS";
/// Genotype FORMAT field
pub const GENOTYPE_FIELD: &str = "GT";
/// Copy number FORMAT field / attribute
pub const COPY_NUMBER_FIELD: &str = "CN";
/// Reference-block end attribute
pub const END_ATTRIBUTE: &str = "END";

/// A file record a variant was read from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// File identifier
    pub file_id: String,
    /// Original call this record was normalized from, empty if unchanged
    #[serde(default)]
    pub call: String,
    /// Free-form attributes (INFO fields, QUAL, FILTER, ...)
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl FileEntry {
    /// Create a file record
    pub fn new(file_id: impl Into<String>, call: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            call: call.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Per-study data for one variant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyEntry {
    /// Study identifier
    #[serde(default)]
    pub study_id: String,
    /// Sample names, aligned with `samples_data`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sample_names: Vec<String>,
    /// FORMAT field names (ordered, unique)
    #[serde(default)]
    pub format: Vec<String>,
    /// Per-sample values, each row aligned with `format`
    #[serde(default)]
    pub samples_data: Vec<Vec<String>>,
    /// File records
    #[serde(default)]
    pub files: Vec<FileEntry>,
    /// Secondary alternates of a multiallelic site
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secondary_alternates: Vec<AlternateCoordinate>,
}

impl StudyEntry {
    /// Create an empty study entry
    pub fn new(study_id: impl Into<String>) -> Self {
        Self {
            study_id: study_id.into(),
            ..Default::default()
        }
    }

    /// Set the FORMAT fields
    pub fn with_format<S: Into<String>>(mut self, format: impl IntoIterator<Item = S>) -> Self {
        self.format = format.into_iter().map(Into::into).collect();
        self
    }

    /// Add a sample row
    pub fn with_sample<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        self.sample_names.push(name.into());
        self.samples_data
            .push(values.into_iter().map(Into::into).collect());
        self
    }

    /// Add a file record
    pub fn with_file(mut self, file: FileEntry) -> Self {
        self.files.push(file);
        self
    }

    /// Add secondary alternate alleles
    pub fn with_secondary_alternates<S: Into<String>>(
        mut self,
        alternates: impl IntoIterator<Item = S>,
    ) -> Self {
        self.secondary_alternates
            .extend(alternates.into_iter().map(AlternateCoordinate::new));
        self
    }

    /// Position of a FORMAT field
    pub fn format_position(&self, field: &str) -> Option<usize> {
        self.format.iter().position(|f| f == field)
    }

    /// Append a FORMAT field if it is not present yet
    pub fn add_format(&mut self, field: &str) {
        if self.format_position(field).is_none() {
            self.format.push(field.to_string());
        }
    }

    /// Value of a FORMAT field for one sample
    pub fn sample_value(&self, sample_idx: usize, field: &str) -> Option<&str> {
        let pos = self.format_position(field)?;
        self.samples_data
            .get(sample_idx)?
            .get(pos)
            .map(String::as_str)
    }

    /// Alleles of the secondary alternates, in order
    pub fn secondary_alternate_alleles(&self) -> impl Iterator<Item = &str> {
        self.secondary_alternates
            .iter()
            .map(|alt| alt.alternate.as_str())
    }

    /// Attribute of the first file record
    pub fn first_file_attribute(&self, key: &str) -> Option<&str> {
        self.files
            .first()?
            .attributes
            .get(key)
            .map(String::as_str)
    }
}
