//! Descriptive statistics and reference distributions used by the DIF engine.
//!
//! - Mean, sample variance and sample standard deviation over response data
//! - Standard normal and chi-square tail probabilities (see [`hypothesis`])
//!
//! # Examples
//!
//! ```
//! use difstat::stats::{mean, sample_std};
//!
//! let scores = [0.0, 1.0, 2.0, 3.0, 4.0];
//! assert_eq!(mean(&scores), Some(2.0));
//! let sd = sample_std(&scores).expect("at least two values");
//! assert!((sd - 2.5_f64.sqrt()).abs() < 1e-12);
//! ```

pub mod hypothesis;

pub use hypothesis::{chi_square_sf, normal_cdf, normal_sf, z_test, ZTestResult};

/// Arithmetic mean, `None` for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance with Bessel's correction (n - 1 denominator).
///
/// Returns `None` when fewer than two values are available.
#[must_use]
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|&x| (x - m).powi(2)).sum();
    Some(ss / (values.len() - 1) as f64)
}

/// Sample standard deviation (n - 1 denominator).
#[must_use]
pub fn sample_std(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

#[cfg(test)]
#[path = "tests_descriptive_contract.rs"]
mod tests_descriptive_contract;
