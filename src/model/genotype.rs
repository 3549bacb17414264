//! Genotype parsing
//!
//! Parses a sample's `GT` value into allele indices (0 = reference,
//! 1..N = alternates, `None` = missing) plus a phased flag. Numeric
//! (`0/1`, `1|2`, `./.`) and literal-allele (`A/C`) forms are accepted.

use std::fmt;

use crate::error::NormalizeError;

/// Resolution status of a parsed genotype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllelesCode {
    /// All alleles called, none beyond the first alternate
    AllelesOk,
    /// At least one allele is missing
    AllelesMissing,
    /// All alleles called, at least one beyond the first alternate
    MultipleAlternates,
}

/// A parsed genotype
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genotype {
    alleles: Vec<Option<usize>>,
    phased: bool,
    code: AllelesCode,
}

impl Genotype {
    /// Parse a genotype value against the site's alleles.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::MalformedGenotype`] if a token is neither a
    /// valid allele index, a missing marker nor one of the site's alleles.
    pub fn parse(
        value: &str,
        reference: &str,
        alternates: &[String],
    ) -> Result<Self, NormalizeError> {
        let value = value.trim();
        if value.is_empty() || value == "." {
            return Ok(Self::from_alleles(vec![None], false));
        }

        let phased = value.contains('|') && !value.contains('/');
        let alleles = value
            .split(|c| c == '/' || c == '|')
            .map(|token| parse_allele(value, token, reference, alternates))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_alleles(alleles, phased))
    }

    /// Build a genotype from allele indices
    pub fn from_alleles(alleles: Vec<Option<usize>>, phased: bool) -> Self {
        let code = if alleles.iter().any(Option::is_none) {
            AllelesCode::AllelesMissing
        } else if alleles.iter().flatten().any(|&a| a > 1) {
            AllelesCode::MultipleAlternates
        } else {
            AllelesCode::AllelesOk
        };
        Self {
            alleles,
            phased,
            code,
        }
    }

    /// Allele indices, `None` for missing
    pub fn alleles(&self) -> &[Option<usize>] {
        &self.alleles
    }

    /// Whether the genotype is phased
    pub fn is_phased(&self) -> bool {
        self.phased
    }

    /// Number of alleles
    pub fn ploidy(&self) -> usize {
        self.alleles.len()
    }

    /// Resolution status
    pub fn code(&self) -> AllelesCode {
        self.code
    }

    /// True if every allele was called
    pub fn is_resolved(&self) -> bool {
        matches!(
            self.code,
            AllelesCode::AllelesOk | AllelesCode::MultipleAlternates
        )
    }
}

fn parse_allele(
    value: &str,
    token: &str,
    reference: &str,
    alternates: &[String],
) -> Result<Option<usize>, NormalizeError> {
    if token == "." {
        return Ok(None);
    }
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        let idx: usize = token
            .parse()
            .map_err(|_| NormalizeError::genotype(value, format!("invalid allele '{}'", token)))?;
        if idx > alternates.len() {
            return Err(NormalizeError::genotype(
                value,
                format!(
                    "allele index {} exceeds the {} alternate(s) of the site",
                    idx,
                    alternates.len()
                ),
            ));
        }
        return Ok(Some(idx));
    }
    if token == reference {
        return Ok(Some(0));
    }
    alternates
        .iter()
        .position(|alt| alt == token)
        .map(|pos| Some(pos + 1))
        .ok_or_else(|| NormalizeError::genotype(value, format!("unknown allele '{}'", token)))
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.phased { "|" } else { "/" };
        for (i, allele) in self.alleles.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", sep)?;
            }
            match allele {
                Some(a) => write!(f, "{}", a)?,
                None => write!(f, ".")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alts(alleles: &[&str]) -> Vec<String> {
        alleles.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_unphased() {
        let gt = Genotype::parse("0/1", "A", &alts(&["C"])).unwrap();
        assert_eq!(gt.alleles(), &[Some(0), Some(1)]);
        assert!(!gt.is_phased());
        assert_eq!(gt.ploidy(), 2);
        assert_eq!(gt.code(), AllelesCode::AllelesOk);
    }

    #[test]
    fn test_parse_phased_multiple_alternates() {
        let gt = Genotype::parse("2|1", "A", &alts(&["C", "G"])).unwrap();
        assert_eq!(gt.alleles(), &[Some(2), Some(1)]);
        assert!(gt.is_phased());
        assert_eq!(gt.code(), AllelesCode::MultipleAlternates);
        assert!(gt.is_resolved());
    }

    #[test]
    fn test_parse_missing() {
        let gt = Genotype::parse("./1", "A", &alts(&["C"])).unwrap();
        assert_eq!(gt.alleles(), &[None, Some(1)]);
        assert_eq!(gt.code(), AllelesCode::AllelesMissing);
        assert!(!gt.is_resolved());

        let gt = Genotype::parse(".", "A", &alts(&["C"])).unwrap();
        assert_eq!(gt.ploidy(), 1);
        assert_eq!(gt.code(), AllelesCode::AllelesMissing);
    }

    #[test]
    fn test_parse_haploid() {
        let gt = Genotype::parse("1", "A", &alts(&["C"])).unwrap();
        assert_eq!(gt.ploidy(), 1);
        assert_eq!(gt.alleles(), &[Some(1)]);
    }

    #[test]
    fn test_parse_literal_alleles() {
        let gt = Genotype::parse("A/G", "A", &alts(&["C", "G"])).unwrap();
        assert_eq!(gt.alleles(), &[Some(0), Some(2)]);
    }

    #[test]
    fn test_parse_out_of_range() {
        let err = Genotype::parse("0/3", "A", &alts(&["C", "G"])).unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedGenotype { .. }));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(Genotype::parse("0/x", "A", &alts(&["C"])).is_err());
    }

    #[test]
    fn test_display() {
        let gt = Genotype::parse("1|.", "A", &alts(&["C"])).unwrap();
        assert_eq!(gt.to_string(), "1|.");
    }
}
