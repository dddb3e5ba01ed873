//! Tail probabilities for DIF significance tests.
//!
//! DIF statistics are referred to the standard normal (z statistics) and to the
//! chi-square distribution with one degree of freedom (squared statistics).
//!
//! Note that [`z_test`] reports the one-sided upper tail `1 - Φ(|z|)`; this is
//! the convention used for DIF reporting and is kept as is.
//!
//! # Example
//!
//! ```
//! use difstat::stats::hypothesis::{chi_square_sf, z_test};
//!
//! let result = z_test(0.8, 0.16).expect("positive variance");
//! assert!((result.statistic - 2.0).abs() < 1e-12);
//! assert!((result.chisq - 4.0).abs() < 1e-12);
//! assert!(result.pvalue < 0.05);
//! assert!((chi_square_sf(3.841_458_820_694_124, 1).expect("valid df") - 0.05).abs() < 1e-6);
//! ```

use crate::error::{DifError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use statrs::function::erf::erfc;
use std::f64::consts::SQRT_2;

/// Result of a z test on an estimate and its variance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZTestResult {
    /// z statistic: estimate / sqrt(variance)
    pub statistic: f64,

    /// Upper-tail p-value `1 - Φ(|z|)`
    pub pvalue: f64,

    /// Chi-square statistic `z²`
    pub chisq: f64,

    /// p-value of `chisq` on one degree of freedom
    pub chisq_pvalue: f64,
}

/// Standard normal CDF Φ(x).
#[must_use]
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal survival function `1 - Φ(x)`.
#[must_use]
pub fn normal_sf(x: f64) -> f64 {
    0.5 * erfc(x / SQRT_2)
}

/// Chi-square survival function `P(χ²_df > x)`.
///
/// # Errors
///
/// Returns an error for `df == 0` or a NaN statistic.
pub fn chi_square_sf(x: f64, df: usize) -> Result<f64> {
    if df == 0 {
        return Err(DifError::InvalidParameter {
            param: "df".into(),
            value: "0".into(),
            constraint: ">0".into(),
        });
    }
    if x.is_nan() {
        return Err(DifError::degenerate("chi-square", "statistic is NaN"));
    }
    if x <= 0.0 {
        return Ok(1.0);
    }

    let dist = ChiSquared::new(df as f64).map_err(|e| DifError::Other(e.to_string()))?;
    Ok(dist.sf(x).clamp(0.0, 1.0))
}

/// z test of `estimate` against zero given its sampling variance.
///
/// # Errors
///
/// Returns [`DifError::DegenerateVariance`] if the variance is not strictly
/// positive and finite.
pub fn z_test(estimate: f64, variance: f64) -> Result<ZTestResult> {
    if !(variance.is_finite() && variance > 0.0) {
        return Err(DifError::degenerate(
            "z-test",
            format!("variance {variance} is not positive"),
        ));
    }
    if !estimate.is_finite() {
        return Err(DifError::degenerate(
            "z-test",
            format!("estimate {estimate} is not finite"),
        ));
    }

    let statistic = estimate / variance.sqrt();
    let chisq = statistic * statistic;

    Ok(ZTestResult {
        statistic,
        pvalue: normal_sf(statistic.abs()),
        chisq,
        chisq_pvalue: chi_square_sf(chisq, 1)?,
    })
}

#[cfg(test)]
#[path = "tests_hypothesis_contract.rs"]
mod tests_hypothesis_contract;
