//! Configuration file support for ferro-varnorm.
//!
//! This module loads `.ferro-varnorm.toml` configuration files that set the
//! default normalization options.
//!
//! # Example Configuration
//!
//! ```toml
//! [normalize]
//! reuse-variants = false
//! decompose-mnvs = true
//! generate-reference-blocks = true
//! gap-open = 5
//! gap-extend = 2
//! ```
//!
//! # Config File Locations
//!
//! Configuration is searched in this order (first found wins):
//! 1. `.ferro-varnorm.toml` in current directory
//! 2. `~/.config/ferro/varnorm.toml`
//!
//! CLI flags take precedence over config file settings.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::NormalizeError;
use crate::normalize::NormalizerConfig;

/// File name looked up in the current directory
pub const LOCAL_CONFIG_FILE: &str = ".ferro-varnorm.toml";

/// Parsed configuration from a `.ferro-varnorm.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Normalization section of the config file.
    pub normalize: NormalizeSection,
}

/// `[normalize]` section of the config file.
///
/// Unset keys fall back to [`NormalizerConfig::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct NormalizeSection {
    pub reuse_variants: Option<bool>,
    pub normalize_alleles: Option<bool>,
    pub decompose_mnvs: Option<bool>,
    pub generate_reference_blocks: Option<bool>,
    pub gap_open: Option<u32>,
    pub gap_extend: Option<u32>,
}

/// Normalization options given on the command line.
///
/// `None` leaves the config file (or default) value in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub reuse_variants: Option<bool>,
    pub normalize_alleles: Option<bool>,
    pub decompose_mnvs: Option<bool>,
    pub generate_reference_blocks: Option<bool>,
}

impl FileConfig {
    /// Load configuration from the default locations.
    ///
    /// Searches for config in:
    /// 1. `.ferro-varnorm.toml` in current directory
    /// 2. `~/.config/ferro/varnorm.toml`
    ///
    /// A file that exists but cannot be read or parsed is reported with a
    /// warning and skipped.
    pub fn load() -> Option<Self> {
        let candidates = std::iter::once(PathBuf::from(LOCAL_CONFIG_FILE)).chain(
            dirs_home().map(|home| home.join(".config").join("ferro").join("varnorm.toml")),
        );

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from_path(&path) {
                Ok(config) => {
                    log::debug!("Loaded configuration from {}", path.display());
                    return Some(config);
                }
                Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
            }
        }

        None
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, NormalizeError> {
        let content = fs::read_to_string(path).map_err(|e| NormalizeError::Io {
            msg: format!("{}: {}", path.display(), e),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML content.
    ///
    /// Out-of-range settings are rejected as [`NormalizeError::Config`].
    pub fn parse(content: &str) -> Result<Self, NormalizeError> {
        let config: Self =
            toml::from_str(content).map_err(|e| NormalizeError::Config { msg: e.to_string() })?;
        config.to_normalizer_config().validate()?;
        Ok(config)
    }

    /// Convert this config to a [`NormalizerConfig`].
    pub fn to_normalizer_config(&self) -> NormalizerConfig {
        let section = &self.normalize;
        let defaults = NormalizerConfig::default();
        NormalizerConfig::new()
            .with_reuse(section.reuse_variants.unwrap_or(defaults.reuse_variants))
            .with_allele_normalization(
                section
                    .normalize_alleles
                    .unwrap_or(defaults.normalize_alleles),
            )
            .with_mnv_decomposition(section.decompose_mnvs.unwrap_or(defaults.decompose_mnvs))
            .with_reference_blocks(
                section
                    .generate_reference_blocks
                    .unwrap_or(defaults.generate_reference_blocks),
            )
            .with_gap_penalties(
                section.gap_open.unwrap_or(defaults.gap_open),
                section.gap_extend.unwrap_or(defaults.gap_extend),
            )
    }

    /// Merge this config with CLI arguments.
    /// CLI arguments take precedence.
    pub fn merge_with_cli(&self, cli: &CliOverrides) -> NormalizerConfig {
        let mut config = self.to_normalizer_config();
        if let Some(reuse) = cli.reuse_variants {
            config.reuse_variants = reuse;
        }
        if let Some(normalize) = cli.normalize_alleles {
            config.normalize_alleles = normalize;
        }
        if let Some(decompose) = cli.decompose_mnvs {
            config.decompose_mnvs = decompose;
        }
        if let Some(generate) = cli.generate_reference_blocks {
            config.generate_reference_blocks = generate;
        }
        config
    }
}

/// Get the user's home directory.
fn dirs_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
