//! Ability stratification by raw total score.
//!
//! Unique observed raw scores are sorted ascending and split into `S` bins of
//! `floor(U / S)` distinct values each; the lowest bin absorbs the remainder
//! `U mod S`. [`StrataSpec::AllScores`] gives every raw score its own stratum.

use crate::error::{DifError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How many ability strata to build.
///
/// Serialized as a bare number or as the string `"all_scores"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "StrataRepr", into = "StrataRepr")]
pub enum StrataSpec {
    /// A fixed number of strata.
    Count(usize),
    /// One stratum per distinct raw score.
    AllScores,
}

const ALL_SCORES: &str = "all_scores";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum StrataRepr {
    Count(usize),
    Name(String),
}

impl TryFrom<StrataRepr> for StrataSpec {
    type Error = DifError;

    fn try_from(repr: StrataRepr) -> Result<Self> {
        match repr {
            StrataRepr::Count(n) => Ok(StrataSpec::Count(n)),
            StrataRepr::Name(name) => name.parse(),
        }
    }
}

impl From<StrataSpec> for StrataRepr {
    fn from(spec: StrataSpec) -> Self {
        match spec {
            StrataSpec::Count(n) => StrataRepr::Count(n),
            StrataSpec::AllScores => StrataRepr::Name(ALL_SCORES.to_string()),
        }
    }
}

impl StrataSpec {
    /// Checks that a fixed count is at least one.
    ///
    /// # Errors
    ///
    /// Returns [`DifError::InvalidParameter`] for `Count(0)`.
    pub fn validate(&self, param: &str) -> Result<()> {
        match self {
            StrataSpec::Count(0) => Err(DifError::InvalidParameter {
                param: param.to_string(),
                value: "0".to_string(),
                constraint: "a positive stratum count or \"all_scores\"".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl Default for StrataSpec {
    fn default() -> Self {
        StrataSpec::Count(20)
    }
}

impl fmt::Display for StrataSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrataSpec::Count(n) => write!(f, "{n}"),
            StrataSpec::AllScores => f.write_str(ALL_SCORES),
        }
    }
}

impl FromStr for StrataSpec {
    type Err = DifError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == ALL_SCORES {
            return Ok(StrataSpec::AllScores);
        }
        s.parse::<usize>()
            .map(StrataSpec::Count)
            .map_err(|_| DifError::InvalidParameter {
                param: "strata".to_string(),
                value: s.to_string(),
                constraint: "a positive stratum count or \"all_scores\"".to_string(),
            })
    }
}

/// Stratum index for each of `n_unique` ascending raw scores.
///
/// The returned sequence has exactly `n_unique` entries, is non-decreasing,
/// and its first run (stratum 0) holds `interval + n_unique % n_strata`
/// entries. With fewer distinct scores than strata the interval is zero, so
/// stratum 0 absorbs every score and a single stratum results.
///
/// # Errors
///
/// Returns [`DifError::InvalidParameter`] for `StrataSpec::Count(0)`.
///
/// # Examples
///
/// ```
/// use difstat::dif::strata::{stratum_indices, StrataSpec};
///
/// let idx = stratum_indices(11, StrataSpec::Count(4)).expect("valid spec");
/// assert_eq!(idx, vec![0, 0, 0, 0, 0, 1, 1, 2, 2, 3, 3]);
///
/// let sparse = stratum_indices(3, StrataSpec::Count(10)).expect("valid spec");
/// assert_eq!(sparse, vec![0, 0, 0]);
///
/// let all = stratum_indices(3, StrataSpec::AllScores).expect("valid spec");
/// assert_eq!(all, vec![0, 1, 2]);
/// ```
pub fn stratum_indices(n_unique: usize, spec: StrataSpec) -> Result<Vec<usize>> {
    spec.validate("strata")?;

    let n_strata = match spec {
        StrataSpec::AllScores => return Ok((0..n_unique).collect()),
        StrataSpec::Count(n) => n,
    };

    let interval = n_unique / n_strata;
    if interval == 0 && n_unique > 0 {
        tracing::debug!(
            n_unique,
            n_strata,
            "fewer distinct raw scores than strata, lowest stratum takes all"
        );
    }

    let remainder = n_unique % n_strata;
    let mut indices = Vec::with_capacity(n_unique);
    indices.extend(std::iter::repeat(0).take(interval + remainder));
    for stratum in 1..n_strata {
        indices.extend(std::iter::repeat(stratum).take(interval));
    }

    Ok(indices)
}

/// Mapping from raw total score to stratum index.
#[derive(Debug, Clone, PartialEq)]
pub struct StratumAssignment {
    scores: Vec<f64>,
    indices: Vec<usize>,
    n_strata: usize,
}

impl StratumAssignment {
    /// Builds the assignment from raw scores (any order, duplicates allowed).
    ///
    /// # Errors
    ///
    /// Returns an error if `spec` is invalid.
    pub fn new(raw_scores: &[f64], spec: StrataSpec) -> Result<Self> {
        let mut scores: Vec<f64> = raw_scores.iter().copied().filter(|v| !v.is_nan()).collect();
        scores.sort_by(f64::total_cmp);
        scores.dedup();

        let indices = stratum_indices(scores.len(), spec)?;
        let n_strata = indices.last().map_or(0, |&last| last + 1);

        Ok(Self {
            scores,
            indices,
            n_strata,
        })
    }

    /// Number of strata.
    #[must_use]
    pub fn n_strata(&self) -> usize {
        self.n_strata
    }

    /// Distinct raw scores, ascending.
    #[must_use]
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Stratum index per distinct raw score, aligned with [`Self::scores`].
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Stratum of a raw score, `None` if the score was never observed.
    #[must_use]
    pub fn stratum_of(&self, raw_score: f64) -> Option<usize> {
        self.scores
            .binary_search_by(|probe| probe.total_cmp(&raw_score))
            .ok()
            .map(|pos| self.indices[pos])
    }

    /// Raw scores covered by one stratum.
    #[must_use]
    pub fn scores_in(&self, stratum: usize) -> Vec<f64> {
        self.scores
            .iter()
            .zip(&self.indices)
            .filter(|(_, &idx)| idx == stratum)
            .map(|(&score, _)| score)
            .collect()
    }
}

#[cfg(test)]
#[path = "strata_tests.rs"]
mod tests;
