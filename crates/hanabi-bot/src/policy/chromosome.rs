use super::rule::Rule;
use crate::error::DecisionError;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ordered rule codes driving the cascade. Codes may repeat.
///
/// Any integer is accepted; a code that names no rule only fails when the
/// cascade reaches it. [`Chromosome::validate`] checks every code up front.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chromosome {
    codes: Vec<i32>,
}

impl Chromosome {
    pub const DEFAULT_CODES: [i32; 16] = [5, 1, 10, 4, 7, 14, 7, 11, 3, 12, 14, 2, 8, 6, 13, 15];

    pub fn new(codes: impl Into<Vec<i32>>) -> Self {
        Self {
            codes: codes.into(),
        }
    }

    pub fn codes(&self) -> &[i32] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Decodes lazily, in order, with each code's position.
    pub fn rules(&self) -> impl Iterator<Item = (usize, i32, Result<Rule, DecisionError>)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .map(|(position, &code)| (position, code, Rule::from_code(code)))
    }

    /// Decodes every code, failing on the first unknown one.
    pub fn validate(&self) -> Result<Vec<Rule>, DecisionError> {
        self.codes.iter().map(|&code| Rule::from_code(code)).collect()
    }

    /// Contains a rule that fires whenever the observer holds a card.
    pub fn has_fallback(&self) -> bool {
        self.codes
            .iter()
            .any(|&code| matches!(Rule::from_code(code), Ok(Rule::PlayBestGuess)))
    }
}

impl Default for Chromosome {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CODES)
    }
}

impl From<Vec<i32>> for Chromosome {
    fn from(codes: Vec<i32>) -> Self {
        Self::new(codes)
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .codes
            .iter()
            .map(i32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid rule code '{token}' in chromosome")]
pub struct ParseChromosomeError {
    pub token: String,
}

/// Parses comma- or whitespace-separated codes, e.g. `"5, 1, 15"`.
impl FromStr for Chromosome {
    type Err = ParseChromosomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<i32>().map_err(|_| ParseChromosomeError {
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_covers_every_rule_and_terminates() {
        let chromosome = Chromosome::default();
        assert_eq!(chromosome.len(), 16);
        assert!(chromosome.validate().is_ok());
        assert!(chromosome.has_fallback());
        assert_eq!(chromosome.to_string(), "5,1,10,4,7,14,7,11,3,12,14,2,8,6,13,15");
    }

    #[test]
    fn validate_reports_first_unknown_code() {
        let chromosome = Chromosome::new(vec![0, 16, -3]);
        assert_eq!(
            chromosome.validate(),
            Err(DecisionError::UnrecognizedRule { code: 16 })
        );
        assert!(!chromosome.has_fallback());
    }

    #[test]
    fn rules_keep_positions_and_defer_errors() {
        let chromosome = Chromosome::new(vec![15, 99]);
        let decoded: Vec<_> = chromosome.rules().collect();
        assert_eq!(decoded[0], (0, 15, Ok(Rule::PlayBestGuess)));
        assert_eq!(
            decoded[1],
            (1, 99, Err(DecisionError::UnrecognizedRule { code: 99 }))
        );
    }

    #[test]
    fn parses_from_text() {
        let chromosome: Chromosome = "5, 1 ,15".parse().unwrap();
        assert_eq!(chromosome.codes(), &[5, 1, 15]);
        let chromosome: Chromosome = "2 14".parse().unwrap();
        assert_eq!(chromosome.codes(), &[2, 14]);
        let err = "3,x".parse::<Chromosome>().unwrap_err();
        assert_eq!(err.token, "x");
    }

    #[test]
    fn serialises_as_plain_list() {
        let json = serde_json::to_string(&Chromosome::new(vec![2, 14])).unwrap();
        assert_eq!(json, "[2,14]");
        let parsed: Chromosome = serde_json::from_str("[99]").unwrap();
        assert_eq!(parsed.codes(), &[99]);
    }
}
