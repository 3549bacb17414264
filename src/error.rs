//! Error types for ferro-varnorm
//!
//! Errors carry a stable [`ErrorCode`] for programmatic handling. Only
//! conditions that stop the processing of a variant are errors; recoverable
//! conditions (unsupported ploidy, alignment fallbacks) are logged instead.

use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors
///
/// These codes can be used for programmatic error handling
/// and for documentation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Sample data errors (E1xxx)
    /// Likelihood-style field with the wrong number of values
    MalformedSampleField = 1001,
    /// Unparseable genotype
    MalformedGenotype = 1002,

    // Phasing errors (E2xxx)
    /// Multiallelic site mixing phased MNV alleles
    UnresolvableMultiallelicPhasing = 2001,

    // Alignment errors (E3xxx)
    /// Structurally invalid pairwise alignment
    AlignmentInconsistency = 3001,

    // Input errors (E4xxx)
    /// Invalid coordinates
    InvalidCoordinates = 4001,
    /// Unparseable companion attribute
    MalformedAttribute = 4002,
    /// Allele with non-ASCII characters
    InvalidAllele = 4003,

    // IO errors (E9xxx)
    /// File IO error
    IoError = 9001,
    /// JSON parsing error
    JsonError = 9002,
    /// Configuration file error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E1001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::MalformedSampleField => "malformed genotype-likelihood sample field",
            ErrorCode::MalformedGenotype => "malformed genotype",
            ErrorCode::UnresolvableMultiallelicPhasing => {
                "multiallelic site with phased MNV alleles"
            }
            ErrorCode::AlignmentInconsistency => "inconsistent pairwise alignment",
            ErrorCode::InvalidCoordinates => "invalid coordinates",
            ErrorCode::MalformedAttribute => "malformed attribute",
            ErrorCode::InvalidAllele => "invalid allele",
            ErrorCode::IoError => "file I/O error",
            ErrorCode::JsonError => "JSON parsing error",
            ErrorCode::ConfigError => "configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Warning code emitted when a likelihood field has a ploidy other than 1 or 2.
pub const WARN_UNSUPPORTED_PLOIDY: &str = "W1001";

/// Main error type for ferro-varnorm operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    /// A GL/PL/GP value list does not match its ploidy and allele count
    #[error("Malformed sample field {field}='{value}': it must contain {expected} values")]
    MalformedSampleField {
        field: String,
        value: String,
        expected: usize,
    },

    /// A genotype could not be parsed
    #[error("Malformed genotype '{value}': {msg}")]
    MalformedGenotype { value: String, msg: String },

    /// A multiallelic site contains phase-set-bearing decomposed alleles
    #[error("Unable to resolve multiallelic with MNV variants -> {alleles}")]
    UnresolvableMultiallelicPhasing { alleles: String },

    /// The pairwise alignment produced an invalid column
    #[error("Inconsistent alignment of {reference}/{alternate}: {detail}")]
    AlignmentInconsistency {
        reference: String,
        alternate: String,
        detail: String,
    },

    /// Invalid coordinates provided
    #[error("Invalid coordinates: {msg}")]
    InvalidCoordinates { msg: String },

    /// A companion attribute (CIPOS, CIEND) could not be parsed
    #[error("Malformed attribute {key}='{value}'")]
    MalformedAttribute { key: String, value: String },

    /// An allele holds characters outside ASCII
    #[error("Invalid allele '{allele}': alleles must be ASCII")]
    InvalidAllele { allele: String },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },

    /// JSON parsing error
    #[error("JSON error: {msg}")]
    Json { msg: String },

    /// Configuration error
    #[error("Config error: {msg}")]
    Config { msg: String },
}

impl NormalizeError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            NormalizeError::MalformedSampleField { .. } => ErrorCode::MalformedSampleField,
            NormalizeError::MalformedGenotype { .. } => ErrorCode::MalformedGenotype,
            NormalizeError::UnresolvableMultiallelicPhasing { .. } => {
                ErrorCode::UnresolvableMultiallelicPhasing
            }
            NormalizeError::AlignmentInconsistency { .. } => ErrorCode::AlignmentInconsistency,
            NormalizeError::InvalidCoordinates { .. } => ErrorCode::InvalidCoordinates,
            NormalizeError::MalformedAttribute { .. } => ErrorCode::MalformedAttribute,
            NormalizeError::InvalidAllele { .. } => ErrorCode::InvalidAllele,
            NormalizeError::Io { .. } => ErrorCode::IoError,
            NormalizeError::Json { .. } => ErrorCode::JsonError,
            NormalizeError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Format the error prefixed with its code, e.g. `[E1001] Malformed ...`
    pub fn detailed_message(&self) -> String {
        format!("[{}] {}", self.code(), self)
    }

    pub(crate) fn genotype(value: &str, msg: impl Into<String>) -> Self {
        NormalizeError::MalformedGenotype {
            value: value.to_string(),
            msg: msg.into(),
        }
    }
}

impl From<std::io::Error> for NormalizeError {
    fn from(err: std::io::Error) -> Self {
        NormalizeError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for NormalizeError {
    fn from(err: serde_json::Error) -> Self {
        NormalizeError::Json {
            msg: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::MalformedSampleField.as_str(), "E1001");
        assert_eq!(ErrorCode::UnresolvableMultiallelicPhasing.as_str(), "E2001");
        assert_eq!(ErrorCode::AlignmentInconsistency.as_str(), "E3001");
        assert_eq!(ErrorCode::IoError.as_str(), "E9001");
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(format!("{}", ErrorCode::MalformedAttribute), "E4002");
        assert_eq!(format!("{}", ErrorCode::InvalidAllele), "E4003");
    }

    #[test]
    fn test_malformed_sample_field_message() {
        let err = NormalizeError::MalformedSampleField {
            field: "PL".to_string(),
            value: "0,10,20".to_string(),
            expected: 6,
        };
        assert_eq!(err.code(), ErrorCode::MalformedSampleField);
        assert_eq!(
            err.to_string(),
            "Malformed sample field PL='0,10,20': it must contain 6 values"
        );
        assert!(err.detailed_message().starts_with("[E1001] "));
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.jsonl");
        let err: NormalizeError = io.into();
        assert_eq!(err.code(), ErrorCode::IoError);
        assert!(err.to_string().contains("missing.jsonl"));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: NormalizeError = json_err.into();
        assert_eq!(err.code(), ErrorCode::JsonError);
    }
}
