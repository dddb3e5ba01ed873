//! Standardized Mean Difference (SMD) for polytomous items.
//!
//! Per stratum the focal and reference mean item scores are compared; the
//! differences are averaged with weights proportional to each stratum's share of
//! the focal group (Dorans & Schmitt 1991; Zwick & Thayer 1996):
//!
//! ```text
//! w_k   = n_Fk / Σ n_F
//! SMD   = Σ w_k (m_Fk − m_Rk)
//! Var   = Σ w_k² Var_k
//! ```

use super::table::{ContingencyTable, FOCAL, REFERENCE};
use super::variance::{stratum_variance, VarianceFormula};
use crate::error::{DifError, Result};
use crate::stats::z_test;
use serde::{Deserialize, Serialize};

/// SMD estimate with its test statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmdResult {
    /// Focal-weighted mean difference (focal − reference)
    pub dif: f64,
    /// Variance of `dif`
    pub var: f64,
    /// `dif / sqrt(var)`
    pub z: f64,
    /// `1 − Φ(|z|)`
    pub pval: f64,
    /// `z²`
    pub chisq: f64,
    /// Upper tail of χ²₁ at `chisq`
    pub chisq_pval: f64,
}

#[derive(Debug, Default)]
struct SmdSums {
    dif: f64,
    var: f64,
}

/// Computes SMD over a stratified table.
///
/// # Errors
///
/// Returns [`DifError::DegenerateVariance`] if a stratum lacks focal or
/// reference examinees, or the pooled variance is zero.
///
/// # Examples
///
/// ```
/// use difstat::dif::smd::smd;
/// use difstat::dif::table::{ContingencyTable, GroupPair};
///
/// let table = ContingencyTable::from_counts(
///     vec![0, 1, 2],
///     GroupPair::new(1.0, 0.0),
///     vec![vec![6, 3, 1], vec![3, 4, 3]],
///     vec![vec![2, 4, 4], vec![1, 3, 6]],
///     -9.0,
/// )
/// .expect("valid table");
///
/// let result = smd(&table).expect("both groups present in every stratum");
/// assert!(result.dif < 0.0); // focal scores lower
/// ```
pub fn smd(table: &ContingencyTable) -> Result<SmdResult> {
    let scores = table.category_scores();
    let total_focal: usize = (0..table.n_strata())
        .map(|k| table.group_total(k, FOCAL))
        .sum();
    if total_focal == 0 {
        return Err(DifError::degenerate("SMD", "no focal examinees"));
    }
    let total_focal = total_focal as f64;

    let sums = (0..table.n_strata()).try_fold(SmdSums::default(), |acc, k| {
        let counts = table.stratum_counts(k);
        let focal_mean = group_mean(&scores, counts[FOCAL])
            .ok_or_else(|| DifError::degenerate("SMD", format!("no focal examinees in stratum {k}")))?;
        let reference_mean = group_mean(&scores, counts[REFERENCE]).ok_or_else(|| {
            DifError::degenerate("SMD", format!("no reference examinees in stratum {k}"))
        })?;
        let var_k = stratum_variance(&scores, counts, VarianceFormula::Smd)?;

        let weight = table.group_total(k, FOCAL) as f64 / total_focal;
        Ok::<_, DifError>(SmdSums {
            dif: acc.dif + weight * (focal_mean - reference_mean),
            var: acc.var + weight * weight * var_k,
        })
    })?;

    let test = z_test(sums.dif, sums.var)
        .map_err(|e| DifError::degenerate("SMD", e.to_string()))?;

    Ok(SmdResult {
        dif: sums.dif,
        var: sums.var,
        z: test.statistic,
        pval: test.pvalue,
        chisq: test.chisq,
        chisq_pval: test.chisq_pvalue,
    })
}

/// Mean category score of one group row, `None` if the row is empty.
fn group_mean(scores: &[f64], row: &[usize]) -> Option<f64> {
    let n: usize = row.iter().sum();
    if n == 0 {
        return None;
    }
    let total: f64 = scores.iter().zip(row).map(|(&s, &c)| s * c as f64).sum();
    Some(total / n as f64)
}

#[cfg(test)]
#[path = "tests_smd_contract.rs"]
mod tests_smd_contract;
