//! Catalogue of reportable DIF statistics.
//!
//! Every report column is a leaf [`Statistic`]. Callers request statistics by
//! name; composite requests are expanded once per batch by
//! [`resolve_statistics`]:
//!
//! - `Flag` also computes `MH_d-dif`, `MH_var`, `MH_pval`, `SMD_dif`, `SD`,
//!   `SMD/SD` and `M_chisq_pval`
//! - `SMD/SD` also computes `SMD_dif` and `SD`
//! - `Counts` is replaced by `Count_Ref`, `Count_Focal` and `Count_All`
//!
//! # Examples
//!
//! ```
//! use difstat::dif::statistic::{resolve_statistics, Cardinality, Statistic};
//!
//! let resolved = resolve_statistics(&["SMD/SD", "Counts"]).expect("known names");
//! let names: Vec<&str> = resolved.columns().iter().map(|s| s.name()).collect();
//! assert_eq!(
//!     names,
//!     ["SMD/SD", "Count_Ref", "Count_Focal", "Count_All", "SMD_dif", "SD"]
//! );
//! assert!(!resolved.applicable(Cardinality::Dichotomous).contains(&Statistic::SmdDif));
//! ```

use crate::error::{DifError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Statistic family a leaf statistic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    /// Mantel-Haenszel (dichotomous items only)
    MantelHaenszel,
    /// Standardized mean difference (polytomous items only)
    Smd,
    /// Mantel (all items)
    Mantel,
    /// Item standard deviation and group counts
    Descriptive,
    /// Severity flag built from other families
    Composite,
}

/// Item response cardinality class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    /// At most two categories
    Dichotomous,
    /// More than two categories
    Polytomous,
}

impl Cardinality {
    /// Classifies an item by its number of observed categories.
    #[must_use]
    pub fn of(n_categories: usize) -> Self {
        if n_categories <= 2 {
            Cardinality::Dichotomous
        } else {
            Cardinality::Polytomous
        }
    }
}

/// A single report column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statistic {
    /// `MH_alpha`: Mantel-Haenszel common odds ratio
    #[serde(rename = "MH_alpha")]
    MhAlpha,
    /// `MH_dif`: log of the common odds ratio
    #[serde(rename = "MH_dif")]
    MhDif,
    /// `MH_d-dif`: ETS delta-scale log odds ratio
    #[serde(rename = "MH_d-dif")]
    MhDDif,
    /// `MH_var`: variance of `MH_d-dif`
    #[serde(rename = "MH_var")]
    MhVar,
    /// `MH_z`: square root of `MH_chisq`
    #[serde(rename = "MH_z")]
    MhZ,
    /// `MH_pval`: upper-tail p-value of `MH_z`
    #[serde(rename = "MH_pval")]
    MhPval,
    /// `MH_chisq`: Mantel-Haenszel chi-square
    #[serde(rename = "MH_chisq")]
    MhChisq,
    /// `MH_chisq_pval`: p-value of `MH_chisq` on one df
    #[serde(rename = "MH_chisq_pval")]
    MhChisqPval,
    /// `SMD_dif`: standardized mean difference
    #[serde(rename = "SMD_dif")]
    SmdDif,
    /// `SMD_var`: variance of `SMD_dif`
    #[serde(rename = "SMD_var")]
    SmdVar,
    /// `SMD_z`: `SMD_dif` over its standard error
    #[serde(rename = "SMD_z")]
    SmdZ,
    /// `SMD_pval`: upper-tail p-value of `SMD_z`
    #[serde(rename = "SMD_pval")]
    SmdPval,
    /// `SMD_chisq`: square of `SMD_z`
    #[serde(rename = "SMD_chisq")]
    SmdChisq,
    /// `SMD_chisq_pval`: p-value of `SMD_chisq` on one df
    #[serde(rename = "SMD_chisq_pval")]
    SmdChisqPval,
    /// `SMD/SD`: `SMD_dif` scaled by the item SD
    #[serde(rename = "SMD/SD")]
    SmdOverSd,
    /// `M_dif`: Mantel observed minus expected focal score sum
    #[serde(rename = "M_dif")]
    MDif,
    /// `M_var`: variance of `M_dif`
    #[serde(rename = "M_var")]
    MVar,
    /// `M_z`: `M_dif` over its standard error
    #[serde(rename = "M_z")]
    MZ,
    /// `M_pval`: upper-tail p-value of `M_z`
    #[serde(rename = "M_pval")]
    MPval,
    /// `M_chisq`: Mantel chi-square
    #[serde(rename = "M_chisq")]
    MChisq,
    /// `M_chisq_pval`: p-value of `M_chisq` on one df
    #[serde(rename = "M_chisq_pval")]
    MChisqPval,
    /// `SD`: sample standard deviation of valid responses
    #[serde(rename = "SD")]
    Sd,
    /// `Count_Ref`: valid reference responses
    #[serde(rename = "Count_Ref")]
    CountRef,
    /// `Count_Focal`: valid focal responses
    #[serde(rename = "Count_Focal")]
    CountFocal,
    /// `Count_All`: valid responses in both groups
    #[serde(rename = "Count_All")]
    CountAll,
    /// `Flag`: ETS severity flag (0, 1 or 2)
    #[serde(rename = "Flag")]
    Flag,
}

impl Statistic {
    /// Every leaf statistic in catalogue order.
    pub const ALL: [Statistic; 26] = [
        Statistic::MhAlpha,
        Statistic::MhDif,
        Statistic::MhDDif,
        Statistic::MhVar,
        Statistic::MhZ,
        Statistic::MhPval,
        Statistic::MhChisq,
        Statistic::MhChisqPval,
        Statistic::SmdDif,
        Statistic::SmdVar,
        Statistic::SmdZ,
        Statistic::SmdPval,
        Statistic::SmdChisq,
        Statistic::SmdChisqPval,
        Statistic::SmdOverSd,
        Statistic::MDif,
        Statistic::MVar,
        Statistic::MZ,
        Statistic::MPval,
        Statistic::MChisq,
        Statistic::MChisqPval,
        Statistic::Sd,
        Statistic::CountRef,
        Statistic::CountFocal,
        Statistic::CountAll,
        Statistic::Flag,
    ];

    /// Report column name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Statistic::MhAlpha => "MH_alpha",
            Statistic::MhDif => "MH_dif",
            Statistic::MhDDif => "MH_d-dif",
            Statistic::MhVar => "MH_var",
            Statistic::MhZ => "MH_z",
            Statistic::MhPval => "MH_pval",
            Statistic::MhChisq => "MH_chisq",
            Statistic::MhChisqPval => "MH_chisq_pval",
            Statistic::SmdDif => "SMD_dif",
            Statistic::SmdVar => "SMD_var",
            Statistic::SmdZ => "SMD_z",
            Statistic::SmdPval => "SMD_pval",
            Statistic::SmdChisq => "SMD_chisq",
            Statistic::SmdChisqPval => "SMD_chisq_pval",
            Statistic::SmdOverSd => "SMD/SD",
            Statistic::MDif => "M_dif",
            Statistic::MVar => "M_var",
            Statistic::MZ => "M_z",
            Statistic::MPval => "M_pval",
            Statistic::MChisq => "M_chisq",
            Statistic::MChisqPval => "M_chisq_pval",
            Statistic::Sd => "SD",
            Statistic::CountRef => "Count_Ref",
            Statistic::CountFocal => "Count_Focal",
            Statistic::CountAll => "Count_All",
            Statistic::Flag => "Flag",
        }
    }

    /// Family this statistic is computed by.
    #[must_use]
    pub fn family(self) -> Family {
        match self {
            Statistic::MhAlpha
            | Statistic::MhDif
            | Statistic::MhDDif
            | Statistic::MhVar
            | Statistic::MhZ
            | Statistic::MhPval
            | Statistic::MhChisq
            | Statistic::MhChisqPval => Family::MantelHaenszel,
            Statistic::SmdDif
            | Statistic::SmdVar
            | Statistic::SmdZ
            | Statistic::SmdPval
            | Statistic::SmdChisq
            | Statistic::SmdChisqPval
            | Statistic::SmdOverSd => Family::Smd,
            Statistic::MDif
            | Statistic::MVar
            | Statistic::MZ
            | Statistic::MPval
            | Statistic::MChisq
            | Statistic::MChisqPval => Family::Mantel,
            Statistic::Sd | Statistic::CountRef | Statistic::CountFocal | Statistic::CountAll => {
                Family::Descriptive
            }
            Statistic::Flag => Family::Composite,
        }
    }

    /// Whether the statistic is defined for an item with `n_categories`.
    #[must_use]
    pub fn applies_to(self, n_categories: usize) -> bool {
        self.applies_to_class(Cardinality::of(n_categories))
    }

    fn applies_to_class(self, cardinality: Cardinality) -> bool {
        match self.family() {
            Family::MantelHaenszel => cardinality == Cardinality::Dichotomous,
            Family::Smd => cardinality == Cardinality::Polytomous,
            Family::Mantel | Family::Descriptive | Family::Composite => true,
        }
    }

    /// Statistics that must also be computed when this one is requested.
    #[must_use]
    pub fn implied(self) -> &'static [Statistic] {
        match self {
            Statistic::Flag => &[
                Statistic::MhDDif,
                Statistic::MhVar,
                Statistic::MhPval,
                Statistic::SmdDif,
                Statistic::Sd,
                Statistic::SmdOverSd,
                Statistic::MChisqPval,
            ],
            Statistic::SmdOverSd => &[Statistic::SmdDif, Statistic::Sd],
            _ => &[],
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Statistic {
    type Err = DifError;

    fn from_str(s: &str) -> Result<Self> {
        Statistic::ALL
            .into_iter()
            .find(|stat| stat.name() == s)
            .ok_or_else(|| DifError::UnknownStatistic {
                name: s.to_string(),
            })
    }
}

/// One entry of a caller's statistic request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatRequest {
    /// A single report column (including the `Flag` and `SMD/SD` composites).
    Stat(Statistic),
    /// Shorthand for the three group counts.
    Counts,
}

impl StatRequest {
    const COUNTS: &'static str = "Counts";

    /// Leaf statistics this entry stands for, before implied additions.
    #[must_use]
    pub fn leaves(self) -> Vec<Statistic> {
        match self {
            StatRequest::Stat(stat) => vec![stat],
            StatRequest::Counts => vec![
                Statistic::CountRef,
                Statistic::CountFocal,
                Statistic::CountAll,
            ],
        }
    }
}

impl FromStr for StatRequest {
    type Err = DifError;

    fn from_str(s: &str) -> Result<Self> {
        if s == Self::COUNTS {
            return Ok(StatRequest::Counts);
        }
        s.parse().map(StatRequest::Stat)
    }
}

/// Statistic request resolved into concrete, ordered report columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedStatistics {
    columns: Vec<Statistic>,
    dichotomous: Vec<Statistic>,
    polytomous: Vec<Statistic>,
}

impl ResolvedStatistics {
    /// Report columns in output order.
    #[must_use]
    pub fn columns(&self) -> &[Statistic] {
        &self.columns
    }

    /// Columns that are computed for items of the given class; the rest hold
    /// the missing-value sentinel.
    #[must_use]
    pub fn applicable(&self, cardinality: Cardinality) -> &[Statistic] {
        match cardinality {
            Cardinality::Dichotomous => &self.dichotomous,
            Cardinality::Polytomous => &self.polytomous,
        }
    }

    /// True if `stat` is a report column.
    #[must_use]
    pub fn contains(&self, stat: Statistic) -> bool {
        self.columns.contains(&stat)
    }

    /// True if any applicable column of the class belongs to `family`.
    #[must_use]
    pub fn needs_family(&self, cardinality: Cardinality, family: Family) -> bool {
        self.applicable(cardinality)
            .iter()
            .any(|stat| stat.family() == family)
    }
}

/// Parses and expands a statistic request.
///
/// Request order is kept, duplicates are dropped, and statistics implied by
/// composites are appended after the explicit ones.
///
/// # Errors
///
/// - [`DifError::UnknownStatistic`] for an unrecognized name
/// - [`DifError::InvalidParameter`] for an empty request
pub fn resolve_statistics<S: AsRef<str>>(requested: &[S]) -> Result<ResolvedStatistics> {
    if requested.is_empty() {
        return Err(DifError::InvalidParameter {
            param: "stats".to_string(),
            value: "[]".to_string(),
            constraint: "at least one statistic".to_string(),
        });
    }

    let mut columns: Vec<Statistic> = Vec::new();
    for name in requested {
        let request: StatRequest = name.as_ref().trim().parse()?;
        for stat in request.leaves() {
            if !columns.contains(&stat) {
                columns.push(stat);
            }
        }
    }

    // Implied statistics may themselves imply more, so walk the growing list
    let mut next = 0;
    while next < columns.len() {
        let implied = columns[next].implied();
        for &stat in implied {
            if !columns.contains(&stat) {
                columns.push(stat);
            }
        }
        next += 1;
    }

    let filter = |cardinality: Cardinality| -> Vec<Statistic> {
        columns
            .iter()
            .copied()
            .filter(|stat| stat.applies_to_class(cardinality))
            .collect()
    };
    let dichotomous = filter(Cardinality::Dichotomous);
    let polytomous = filter(Cardinality::Polytomous);

    Ok(ResolvedStatistics {
        columns,
        dichotomous,
        polytomous,
    })
}

#[cfg(test)]
#[path = "statistic_tests.rs"]
mod tests;
