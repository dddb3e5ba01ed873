//! Per-item results.
//!
//! An item is either scored, carrying the statistic families that apply to
//! its cardinality, or skipped because no usable table could be built. The
//! report flattens both into sentinel-padded rows.

use super::flag::DifFlag;
use super::mantel::MantelResult;
use super::mantel_haenszel::MhResult;
use super::smd::SmdResult;
use super::statistic::{Cardinality, Statistic};
use super::strata::StrataSpec;
use serde::{Deserialize, Serialize};

/// Statistics computed for a scored item.
///
/// A family that was not requested or was degenerate for the item is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemStatistics {
    /// Items with at most two categories.
    Dichotomous {
        /// Mantel-Haenszel family
        mh: Option<MhResult>,
        /// Mantel family
        mantel: Option<MantelResult>,
    },
    /// Items with more than two categories.
    Polytomous {
        /// SMD family
        smd: Option<SmdResult>,
        /// Mantel family
        mantel: Option<MantelResult>,
    },
}

impl ItemStatistics {
    /// Cardinality class of the payload.
    #[must_use]
    pub fn cardinality(&self) -> Cardinality {
        match self {
            ItemStatistics::Dichotomous { .. } => Cardinality::Dichotomous,
            ItemStatistics::Polytomous { .. } => Cardinality::Polytomous,
        }
    }

    /// Mantel results, present for both classes.
    #[must_use]
    pub fn mantel(&self) -> Option<&MantelResult> {
        match self {
            ItemStatistics::Dichotomous { mantel, .. } | ItemStatistics::Polytomous { mantel, .. } => {
                mantel.as_ref()
            }
        }
    }
}

/// Values taken from the raw per-examinee data rather than the table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Descriptives {
    /// Sample standard deviation of valid responses, focal and reference pooled
    pub sd: Option<f64>,
    /// Valid responses in the reference group
    pub count_ref: usize,
    /// Valid responses in the focal group
    pub count_focal: usize,
}

impl Descriptives {
    /// `count_ref + count_focal`
    #[must_use]
    pub fn count_all(&self) -> usize {
        self.count_ref + self.count_focal
    }
}

/// Terminal state of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ItemOutcome {
    /// Statistics were computed.
    Scored {
        /// Stratification that produced a valid table
        strata_used: StrataSpec,
        /// Number of strata in the table
        n_strata: usize,
        /// Number of observed response categories
        categories: usize,
    },
    /// No valid table under the primary or fallback stratification.
    Skipped {
        /// Last build failure
        reason: String,
    },
}

/// Result for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResult {
    /// Item label
    pub item: String,
    /// Scored or skipped
    pub outcome: ItemOutcome,
    /// Computed families, `None` when skipped
    pub statistics: Option<ItemStatistics>,
    /// Descriptive values, `None` when skipped
    pub descriptives: Option<Descriptives>,
    /// Per-family failures (e.g. a degenerate variance)
    pub notes: Vec<String>,
}

impl ItemResult {
    /// A skipped item.
    #[must_use]
    pub fn skipped(item: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            outcome: ItemOutcome::Skipped {
                reason: reason.into(),
            },
            statistics: None,
            descriptives: None,
            notes: Vec::new(),
        }
    }

    /// True if the item was scored.
    #[must_use]
    pub fn is_scored(&self) -> bool {
        matches!(self.outcome, ItemOutcome::Scored { .. })
    }

    /// `SMD / SD`, when both are available and SD is positive.
    #[must_use]
    pub fn smd_over_sd(&self) -> Option<f64> {
        let smd = match self.statistics.as_ref()? {
            ItemStatistics::Polytomous { smd, .. } => smd.as_ref()?.dif,
            ItemStatistics::Dichotomous { .. } => return None,
        };
        let sd = self.descriptives?.sd?;
        (sd > 0.0).then(|| smd / sd)
    }

    /// Composite severity flag, `None` when any input is unavailable.
    #[must_use]
    pub fn flag(&self) -> Option<DifFlag> {
        match self.statistics.as_ref()? {
            ItemStatistics::Dichotomous { mh, .. } => {
                let mh = mh.as_ref()?;
                super::flag::dichotomous_flag(mh.d_dif, mh.var, mh.pval)
            }
            ItemStatistics::Polytomous { mantel, .. } => {
                let m_chisq_pval = mantel.as_ref()?.chisq_pval;
                super::flag::polytomous_flag(self.smd_over_sd()?, m_chisq_pval)
            }
        }
    }

    /// Value of one report column, `None` if unavailable or inapplicable.
    #[must_use]
    pub fn value(&self, stat: Statistic) -> Option<f64> {
        let statistics = self.statistics.as_ref()?;
        let mantel = statistics.mantel();
        let (mh, smd) = match statistics {
            ItemStatistics::Dichotomous { mh, .. } => (mh.as_ref(), None),
            ItemStatistics::Polytomous { smd, .. } => (None, smd.as_ref()),
        };

        match stat {
            Statistic::MhAlpha => mh.map(|r| r.alpha),
            Statistic::MhDif => mh.map(|r| r.log_alpha),
            Statistic::MhDDif => mh.map(|r| r.d_dif),
            Statistic::MhVar => mh.map(|r| r.var),
            Statistic::MhZ => mh.map(|r| r.z),
            Statistic::MhPval => mh.map(|r| r.pval),
            Statistic::MhChisq => mh.map(|r| r.chisq),
            Statistic::MhChisqPval => mh.map(|r| r.chisq_pval),
            Statistic::SmdDif => smd.map(|r| r.dif),
            Statistic::SmdVar => smd.map(|r| r.var),
            Statistic::SmdZ => smd.map(|r| r.z),
            Statistic::SmdPval => smd.map(|r| r.pval),
            Statistic::SmdChisq => smd.map(|r| r.chisq),
            Statistic::SmdChisqPval => smd.map(|r| r.chisq_pval),
            Statistic::SmdOverSd => self.smd_over_sd(),
            Statistic::MDif => mantel.map(|r| r.dif),
            Statistic::MVar => mantel.map(|r| r.var),
            Statistic::MZ => mantel.map(|r| r.z),
            Statistic::MPval => mantel.map(|r| r.pval),
            Statistic::MChisq => mantel.map(|r| r.chisq),
            Statistic::MChisqPval => mantel.map(|r| r.chisq_pval),
            Statistic::Sd => self.descriptives?.sd,
            Statistic::CountRef => self.descriptives.map(|d| d.count_ref as f64),
            Statistic::CountFocal => self.descriptives.map(|d| d.count_focal as f64),
            Statistic::CountAll => self.descriptives.map(|d| d.count_all() as f64),
            Statistic::Flag => self.flag().map(DifFlag::value),
        }
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
