//! Per-stratum variance terms for the DIF statistics.
//!
//! # Mathematical Background
//!
//! For a stratum with group totals `n0` (focal), `n1` (reference), total `N`,
//! category scores `s` and per-category column sums `m_s`, the hypergeometric
//! variance of the focal score sum is
//!
//! ```text
//! V = n0·n1 / (N²(N-1)) · (N·Σ s²·m_s − (Σ s·m_s)²)
//! ```
//!
//! The Mantel statistic uses `V` directly; the SMD statistic scales it by
//! `(1/n0 + 1/n1)²` to obtain the variance of a difference in means.
//!
//! For dichotomous items the Mantel-Haenszel log odds ratio uses the
//! Robins–Breslow–Greenland variance, accumulated from seven sub-terms in the
//! notation of Wood (2011). With `A`/`B` the reference correct/incorrect
//! counts, `C`/`D` the focal correct/incorrect counts:
//!
//! ```text
//! R = AD/N   S = BC/N   P = (A+D)/N   Q = (B+C)/N
//! a1 = P·R   a2 = R
//! b1 = P·S + Q·R   b2 = S
//! c1 = S   c2 = S   c3 = Q·S
//! ```
//!
//! # References
//!
//! - Dorans & Schmitt (1991), Zwick & Thayer (1996), Wood (2011)
//! - Robins, Breslow & Greenland (1986) Biometrics 42(2)

use super::table::{FOCAL, REFERENCE};
use crate::error::{DifError, Result};
use serde::{Deserialize, Serialize};

/// Which per-stratum term to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarianceFormula {
    /// Variance of the focal-minus-reference mean difference.
    Smd,
    /// Variance of the focal score sum.
    Mantel,
    /// `P·R`
    MhA1,
    /// `R`
    MhA2,
    /// `P·S + Q·R`
    MhB1,
    /// `S`
    MhB2,
    /// `S`
    MhC1,
    /// `S`
    MhC2,
    /// `Q·S`
    MhC3,
}

impl VarianceFormula {
    /// The seven Mantel-Haenszel sub-terms, in accumulation order.
    pub const MH_TERMS: [VarianceFormula; 7] = [
        VarianceFormula::MhA1,
        VarianceFormula::MhA2,
        VarianceFormula::MhB1,
        VarianceFormula::MhB2,
        VarianceFormula::MhC1,
        VarianceFormula::MhC2,
        VarianceFormula::MhC3,
    ];
}

/// Cells of a dichotomous stratum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MhCells {
    /// Reference, correct
    pub a: f64,
    /// Reference, incorrect
    pub b: f64,
    /// Focal, correct
    pub c: f64,
    /// Focal, incorrect
    pub d: f64,
    /// Stratum total
    pub n: f64,
}

impl MhCells {
    /// Reads the 2×2 cells from `[focal, reference]` rows; category index 1 is
    /// "correct", 0 is "incorrect".
    ///
    /// # Errors
    ///
    /// Returns an error if the rows aren't two categories wide or the stratum
    /// is empty.
    pub fn from_stratum(counts: [&[usize]; 2]) -> Result<Self> {
        for row in counts {
            if row.len() != 2 {
                return Err(DifError::degenerate(
                    "MH",
                    format!("stratum has {} categories, need 2", row.len()),
                ));
            }
        }
        let focal = counts[FOCAL];
        let reference = counts[REFERENCE];
        let cells = Self {
            a: reference[1] as f64,
            b: reference[0] as f64,
            c: focal[1] as f64,
            d: focal[0] as f64,
            n: (focal[0] + focal[1] + reference[0] + reference[1]) as f64,
        };
        if cells.n <= 0.0 {
            return Err(DifError::degenerate("MH", "empty stratum"));
        }
        Ok(cells)
    }

    /// `R = AD/N`, the stratum numerator of the common odds ratio.
    #[must_use]
    pub fn r(&self) -> f64 {
        self.a * self.d / self.n
    }

    /// `S = BC/N`, the stratum denominator of the common odds ratio.
    #[must_use]
    pub fn s(&self) -> f64 {
        self.b * self.c / self.n
    }

    /// `P = (A+D)/N`
    #[must_use]
    pub fn p(&self) -> f64 {
        (self.a + self.d) / self.n
    }

    /// `Q = (B+C)/N`
    #[must_use]
    pub fn q(&self) -> f64 {
        (self.b + self.c) / self.n
    }

    /// One Mantel-Haenszel sub-term; `None` for the non-MH formulas.
    #[must_use]
    pub fn term(&self, formula: VarianceFormula) -> Option<f64> {
        let value = match formula {
            VarianceFormula::MhA1 => self.p() * self.r(),
            VarianceFormula::MhA2 => self.r(),
            VarianceFormula::MhB1 => self.p() * self.s() + self.q() * self.r(),
            VarianceFormula::MhB2 | VarianceFormula::MhC1 | VarianceFormula::MhC2 => self.s(),
            VarianceFormula::MhC3 => self.q() * self.s(),
            VarianceFormula::Smd | VarianceFormula::Mantel => return None,
        };
        Some(value)
    }
}

/// Computes one variance term for a stratum.
///
/// `counts` holds the `[focal, reference]` category counts and
/// `category_scores` the score of each category column.
///
/// # Errors
///
/// - [`DifError::DimensionMismatch`] if rows and scores differ in length
/// - [`DifError::DegenerateVariance`] for a zero denominator (`N ≤ 1`, or an
///   empty group for `Smd`)
///
/// # Examples
///
/// ```
/// use difstat::dif::variance::{stratum_variance, VarianceFormula};
///
/// let scores = [0.0, 1.0, 2.0];
/// let focal = [2usize, 3, 5];
/// let reference = [4usize, 4, 2];
/// let v = stratum_variance(&scores, [&focal, &reference], VarianceFormula::Mantel)
///     .expect("non-degenerate stratum");
/// assert!(v > 0.0);
/// ```
pub fn stratum_variance(
    category_scores: &[f64],
    counts: [&[usize]; 2],
    formula: VarianceFormula,
) -> Result<f64> {
    match formula {
        VarianceFormula::Smd | VarianceFormula::Mantel => {
            hypergeometric_variance(category_scores, counts, formula)
        }
        mh => {
            let cells = MhCells::from_stratum(counts)?;
            cells
                .term(mh)
                .ok_or_else(|| DifError::Other(format!("{mh:?} is not an MH term")))
        }
    }
}

fn hypergeometric_variance(
    scores: &[f64],
    counts: [&[usize]; 2],
    formula: VarianceFormula,
) -> Result<f64> {
    let family = if formula == VarianceFormula::Smd {
        "SMD"
    } else {
        "M"
    };
    for row in counts {
        if row.len() != scores.len() {
            return Err(DifError::dimension_mismatch(
                "category scores",
                scores.len(),
                row.len(),
            ));
        }
    }

    let n0 = counts[FOCAL].iter().sum::<usize>() as f64;
    let n1 = counts[REFERENCE].iter().sum::<usize>() as f64;
    let n = n0 + n1;
    if n <= 1.0 {
        return Err(DifError::degenerate(
            family,
            format!("stratum total {n} leaves no degrees of freedom"),
        ));
    }

    let (sum_s, sum_s2) = scores
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(s1, s2), (c, &score)| {
            let colsum = (counts[FOCAL][c] + counts[REFERENCE][c]) as f64;
            (s1 + score * colsum, s2 + score * score * colsum)
        });

    let v = n0 * n1 / (n * n * (n - 1.0)) * (n * sum_s2 - sum_s * sum_s);

    if formula == VarianceFormula::Mantel {
        return Ok(v);
    }

    if n0 == 0.0 || n1 == 0.0 {
        return Err(DifError::degenerate(
            family,
            format!("empty group in stratum (focal {n0}, reference {n1})"),
        ));
    }
    Ok((1.0 / n0 + 1.0 / n1).powi(2) * v)
}

#[cfg(test)]
#[path = "variance_tests.rs"]
mod tests;
