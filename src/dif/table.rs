//! Stratified contingency tables.
//!
//! A [`ContingencyTable`] holds `count[stratum][group][category]` for one item:
//! examinees are binned into ability strata by raw score, split into the focal
//! and reference groups, and tallied by response category. Every stratum must
//! hold more than one observation.

use super::strata::{StrataSpec, StratumAssignment};
use crate::data::ScoreSource;
use crate::error::{DifError, Result};
use serde::{Deserialize, Serialize};

/// Row index of the focal group in every stratum.
pub const FOCAL: usize = 0;
/// Row index of the reference group in every stratum.
pub const REFERENCE: usize = 1;

/// Focal and reference group codes as they appear in the group column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupPair {
    /// Group of interest.
    pub focal: f64,
    /// Comparison baseline.
    pub reference: f64,
}

impl GroupPair {
    /// Creates a focal/reference pair.
    #[must_use]
    pub fn new(focal: f64, reference: f64) -> Self {
        Self { focal, reference }
    }

    /// Codes in table order `[focal, reference]`.
    #[must_use]
    pub fn codes(&self) -> [f64; 2] {
        [self.focal, self.reference]
    }

    /// Row index for a group code, `None` for codes outside the pair.
    #[must_use]
    pub fn index_of(&self, code: f64) -> Option<usize> {
        if code == self.focal {
            Some(FOCAL)
        } else if code == self.reference {
            Some(REFERENCE)
        } else {
            None
        }
    }
}

impl Default for GroupPair {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

/// Response counts by stratum, group and category for a single item.
///
/// # Examples
///
/// ```
/// use difstat::dif::table::{ContingencyTable, GroupPair};
///
/// // Two strata, dichotomous item; per-stratum counts are indexed by category.
/// let table = ContingencyTable::from_counts(
///     vec![0, 1],
///     GroupPair::new(1.0, 0.0),
///     vec![vec![12, 18], vec![8, 22]],
///     vec![vec![20, 10], vec![15, 15]],
///     -9.0,
/// )
/// .expect("every stratum has data");
///
/// assert_eq!(table.n_strata(), 2);
/// assert_eq!(table.stratum_total(0), 60);
/// assert!(table.is_dichotomous());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ContingencyTable {
    counts: Vec<usize>,
    n_strata: usize,
    categories: Vec<i64>,
    groups: GroupPair,
    strata_scores: Vec<Vec<f64>>,
    missing: f64,
}

impl ContingencyTable {
    /// Tabulates one item from a scored source.
    ///
    /// Unique raw scores are taken from rows with a valid response to `item`.
    /// Rows with a missing response or raw score, or a group code outside
    /// `groups`, are not counted.
    ///
    /// # Errors
    ///
    /// - [`DifError::ColumnNotFound`] for unknown labels
    /// - [`DifError::InvalidCategory`] for non-integral or negative responses
    /// - [`DifError::InsufficientStrataData`] if any stratum holds ≤ 1 response
    pub fn build<S: ScoreSource>(
        source: &S,
        item: &str,
        raw_score_col: &str,
        group_col: &str,
        groups: GroupPair,
        strata: StrataSpec,
    ) -> Result<Self> {
        let responses = source.column(item)?;
        let raw = source.column(raw_score_col)?;
        let group = source.column(group_col)?;

        let valid_raw: Vec<f64> = responses
            .iter()
            .zip(raw)
            .filter(|(&r, &s)| !source.is_missing(r) && !source.is_missing(s))
            .map(|(_, &s)| s)
            .collect();
        let assignment = StratumAssignment::new(&valid_raw, strata)?;

        let mut categories = Vec::new();
        for &value in responses.iter().filter(|&&v| !source.is_missing(v)) {
            categories.push(category_code(item, value)?);
        }
        categories.sort_unstable();
        categories.dedup();

        let n_strata = assignment.n_strata();
        let n_cat = categories.len();
        let mut counts = vec![0usize; n_strata * 2 * n_cat];

        for ((&response, &score), &code) in responses.iter().zip(raw).zip(group) {
            if source.is_missing(response) || source.is_missing(score) {
                continue;
            }
            let (Some(stratum), Some(g)) = (assignment.stratum_of(score), groups.index_of(code))
            else {
                continue;
            };
            let cat = categories
                .binary_search(&category_code(item, response)?)
                .map_err(|_| DifError::Other(format!("category lookup failed for {item}")))?;
            counts[(stratum * 2 + g) * n_cat + cat] += 1;
        }

        let strata_scores = (0..n_strata).map(|s| assignment.scores_in(s)).collect();

        let table = Self {
            counts,
            n_strata,
            categories,
            groups,
            strata_scores,
            missing: source.missing_value(),
        };
        table.validate()?;

        tracing::debug!(
            item,
            n_strata,
            n_categories = n_cat,
            %strata,
            "built contingency table"
        );
        Ok(table)
    }

    /// Builds a table from explicit per-stratum counts.
    ///
    /// `focal[k][c]` and `reference[k][c]` are the counts for stratum `k` and
    /// category `categories[c]`.
    ///
    /// # Errors
    ///
    /// Returns an error on shape mismatches, unsorted categories, or a stratum
    /// with ≤ 1 observation.
    pub fn from_counts(
        categories: Vec<i64>,
        groups: GroupPair,
        focal: Vec<Vec<usize>>,
        reference: Vec<Vec<usize>>,
        missing: f64,
    ) -> Result<Self> {
        if focal.len() != reference.len() {
            return Err(DifError::dimension_mismatch(
                "strata",
                focal.len(),
                reference.len(),
            ));
        }
        if categories.windows(2).any(|w| w[0] >= w[1]) {
            return Err("Categories must be strictly ascending".into());
        }

        let n_cat = categories.len();
        let mut counts = Vec::with_capacity(focal.len() * 2 * n_cat);
        for (f, r) in focal.iter().zip(&reference) {
            if f.len() != n_cat || r.len() != n_cat {
                return Err(DifError::dimension_mismatch(
                    "categories",
                    n_cat,
                    f.len().max(r.len()),
                ));
            }
            counts.extend_from_slice(f);
            counts.extend_from_slice(r);
        }

        let n_strata = focal.len();
        let table = Self {
            counts,
            n_strata,
            categories,
            groups,
            strata_scores: vec![Vec::new(); n_strata],
            missing,
        };
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<()> {
        if self.n_strata == 0 {
            return Err(DifError::InsufficientStrataData {
                stratum: 0,
                count: 0,
            });
        }
        for stratum in 0..self.n_strata {
            let count = self.stratum_total(stratum);
            if count <= 1 {
                return Err(DifError::InsufficientStrataData { stratum, count });
            }
        }
        Ok(())
    }

    /// Number of strata.
    #[must_use]
    pub fn n_strata(&self) -> usize {
        self.n_strata
    }

    /// Number of observed response categories.
    #[must_use]
    pub fn n_categories(&self) -> usize {
        self.categories.len()
    }

    /// Observed category codes, ascending.
    #[must_use]
    pub fn categories(&self) -> &[i64] {
        &self.categories
    }

    /// Focal/reference codes used for the group axis.
    #[must_use]
    pub fn groups(&self) -> GroupPair {
        self.groups
    }

    /// Missing-value sentinel of the source table.
    #[must_use]
    pub fn missing_value(&self) -> f64 {
        self.missing
    }

    /// True when the item has at most two categories.
    #[must_use]
    pub fn is_dichotomous(&self) -> bool {
        self.categories.len() <= 2
    }

    /// Scores used for categories: ranks `0..C-1`.
    #[must_use]
    pub fn category_scores(&self) -> Vec<f64> {
        (0..self.categories.len()).map(|c| c as f64).collect()
    }

    /// Raw scores covered by a stratum (empty for tables built from counts).
    #[must_use]
    pub fn stratum_raw_scores(&self, stratum: usize) -> &[f64] {
        &self.strata_scores[stratum]
    }

    /// Count for one (stratum, group, category) cell.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of range.
    #[must_use]
    pub fn count(&self, stratum: usize, group: usize, category: usize) -> usize {
        assert!(group < 2, "group index must be FOCAL or REFERENCE");
        self.row(stratum, group)[category]
    }

    /// Category counts for both groups of a stratum, `[focal, reference]`.
    #[must_use]
    pub fn stratum_counts(&self, stratum: usize) -> [&[usize]; 2] {
        [self.row(stratum, FOCAL), self.row(stratum, REFERENCE)]
    }

    /// Total count of one group within a stratum.
    #[must_use]
    pub fn group_total(&self, stratum: usize, group: usize) -> usize {
        self.row(stratum, group).iter().sum()
    }

    /// Total count of a stratum across groups and categories.
    #[must_use]
    pub fn stratum_total(&self, stratum: usize) -> usize {
        self.group_total(stratum, FOCAL) + self.group_total(stratum, REFERENCE)
    }

    /// Total count of the whole table.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    fn row(&self, stratum: usize, group: usize) -> &[usize] {
        let n_cat = self.categories.len();
        let start = (stratum * 2 + group) * n_cat;
        &self.counts[start..start + n_cat]
    }
}

fn category_code(item: &str, value: f64) -> Result<i64> {
    if value.fract() != 0.0 || value < 0.0 || !value.is_finite() {
        return Err(DifError::InvalidCategory {
            item: item.to_string(),
            value,
        });
    }
    Ok(value as i64)
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
