//! Composite DIF severity flag.
//!
//! Dichotomous items follow the ETS A/B/C classification on the delta scale;
//! polytomous items use the effect-size rule of Zwick, Thissen & Mayer (1999).

use serde::{Deserialize, Serialize};

/// Minimum |D-DIF| for a severe flag.
const SEVERE_DELTA: f64 = 1.5;
/// |D-DIF| below this is never flagged.
const NEGLIGIBLE_DELTA: f64 = 1.0;
/// One-sided 5% normal critical value.
const Z_CRITICAL: f64 = 1.645;
const ALPHA: f64 = 0.05;
/// Minimum |SMD/SD| for a severe polytomous flag.
const SEVERE_EFFECT_SIZE: f64 = 0.25;

/// DIF severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DifFlag {
    /// Negligible DIF (ETS category A)
    None = 0,
    /// Moderate DIF (ETS category B)
    Moderate = 1,
    /// Severe DIF (ETS category C)
    Severe = 2,
}

impl DifFlag {
    /// Numeric report value.
    #[must_use]
    pub fn value(self) -> f64 {
        f64::from(self as u8)
    }
}

/// Flag for a dichotomous item from its MH D-DIF, MH variance and p-value.
///
/// Returns `None` if any input is not finite or the variance is negative.
///
/// # Examples
///
/// ```
/// use difstat::dif::flag::{dichotomous_flag, DifFlag};
///
/// assert_eq!(dichotomous_flag(2.4, 0.1, 0.001), Some(DifFlag::Severe));
/// assert_eq!(dichotomous_flag(0.4, 0.1, 0.001), Some(DifFlag::None));
/// assert_eq!(dichotomous_flag(f64::NAN, 0.1, 0.001), None);
/// ```
#[must_use]
pub fn dichotomous_flag(d_dif: f64, var: f64, pval: f64) -> Option<DifFlag> {
    if !(d_dif.is_finite() && var.is_finite() && pval.is_finite()) || var < 0.0 {
        return None;
    }
    let d = d_dif.abs();
    let se = var.sqrt();

    let flag = if d > SEVERE_DELTA && (d - NEGLIGIBLE_DELTA) / se > Z_CRITICAL {
        DifFlag::Severe
    } else if d < NEGLIGIBLE_DELTA || pval > ALPHA {
        DifFlag::None
    } else {
        DifFlag::Moderate
    };
    Some(flag)
}

/// Flag for a polytomous item from its SMD/SD effect size and Mantel
/// chi-square p-value. Returns `None` if either input is not finite.
#[must_use]
pub fn polytomous_flag(smd_over_sd: f64, m_chisq_pval: f64) -> Option<DifFlag> {
    if !(smd_over_sd.is_finite() && m_chisq_pval.is_finite()) {
        return None;
    }
    if smd_over_sd.abs() > SEVERE_EFFECT_SIZE && m_chisq_pval < ALPHA {
        Some(DifFlag::Severe)
    } else {
        Some(DifFlag::None)
    }
}
