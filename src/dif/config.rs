//! Batch configuration.
//!
//! # Examples
//!
//! ```
//! use difstat::dif::config::DifConfig;
//! use difstat::dif::strata::StrataSpec;
//!
//! let config = DifConfig::default()
//!     .with_strata(StrataSpec::Count(10))
//!     .with_fallback_strata(Some(StrataSpec::Count(4)))
//!     .with_groups(2.0, 1.0)
//!     .with_stats(["Flag", "Counts"]);
//! assert!(config.validate().is_ok());
//!
//! let json = config.to_json().expect("serializable");
//! let back = DifConfig::from_json(&json).expect("round trip");
//! assert_eq!(back, config);
//! ```

use super::mantel_haenszel::{CTermGrouping, MhOptions, ETS_DELTA_SCALE};
use super::strata::StrataSpec;
use super::table::GroupPair;
use crate::error::{DifError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a DIF batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifConfig {
    /// Primary stratification
    pub strata: StrataSpec,
    /// Stratification retried once when the primary one fails
    pub fallback_strata: Option<StrataSpec>,
    /// Focal group code
    pub focal: f64,
    /// Reference group code
    pub reference: f64,
    /// Requested statistic names (composites allowed)
    pub stats: Vec<String>,
    /// Apply the 0.5 continuity correction to the Mantel chi-square of
    /// dichotomous items
    pub continuity_correction: bool,
    /// Grouping of the third MH variance component
    pub c_grouping: CTermGrouping,
    /// Multiplier from log odds to the ETS delta scale
    pub delta_scale: f64,
    /// Raw total score column
    pub raw_score_column: String,
    /// Group membership column
    pub group_column: String,
    /// Score items on the rayon pool (needs the `parallel` feature)
    pub parallel: bool,
}

impl Default for DifConfig {
    fn default() -> Self {
        Self {
            strata: StrataSpec::Count(20),
            fallback_strata: Some(StrataSpec::Count(10)),
            focal: 1.0,
            reference: 0.0,
            stats: vec!["Flag".to_string(), "Counts".to_string()],
            continuity_correction: false,
            c_grouping: CTermGrouping::SourceLiteral,
            delta_scale: ETS_DELTA_SCALE,
            raw_score_column: "RawScore".to_string(),
            group_column: "Group".to_string(),
            parallel: false,
        }
    }
}

impl DifConfig {
    /// Set the primary stratification.
    #[must_use]
    pub fn with_strata(mut self, strata: StrataSpec) -> Self {
        self.strata = strata;
        self
    }

    /// Set (or disable) the fallback stratification.
    #[must_use]
    pub fn with_fallback_strata(mut self, fallback: Option<StrataSpec>) -> Self {
        self.fallback_strata = fallback;
        self
    }

    /// Set focal and reference group codes.
    #[must_use]
    pub fn with_groups(mut self, focal: f64, reference: f64) -> Self {
        self.focal = focal;
        self.reference = reference;
        self
    }

    /// Set the requested statistics.
    #[must_use]
    pub fn with_stats<I, S>(mut self, stats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stats = stats.into_iter().map(Into::into).collect();
        self
    }

    /// Enable the Mantel continuity correction.
    #[must_use]
    pub fn with_continuity_correction(mut self, enabled: bool) -> Self {
        self.continuity_correction = enabled;
        self
    }

    /// Set the MH `c` term grouping.
    #[must_use]
    pub fn with_c_grouping(mut self, grouping: CTermGrouping) -> Self {
        self.c_grouping = grouping;
        self
    }

    /// Set the ETS delta-scale multiplier.
    #[must_use]
    pub fn with_delta_scale(mut self, scale: f64) -> Self {
        self.delta_scale = scale;
        self
    }

    /// Set the raw score and group column labels.
    #[must_use]
    pub fn with_columns(mut self, raw_score: impl Into<String>, group: impl Into<String>) -> Self {
        self.raw_score_column = raw_score.into();
        self.group_column = group.into();
        self
    }

    /// Score items in parallel.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Focal/reference pair in table order.
    #[must_use]
    pub fn groups(&self) -> GroupPair {
        GroupPair::new(self.focal, self.reference)
    }

    /// Options passed to the Mantel-Haenszel computation.
    #[must_use]
    pub fn mh_options(&self) -> MhOptions {
        MhOptions {
            delta_scale: self.delta_scale,
            c_grouping: self.c_grouping,
        }
    }

    /// Checks every setting that can be checked without data.
    ///
    /// # Errors
    ///
    /// Returns [`DifError::InvalidParameter`] for a zero stratum count, equal
    /// or non-finite group codes, a zero or non-finite delta scale, an empty
    /// statistic list or an empty column label.
    pub fn validate(&self) -> Result<()> {
        self.strata.validate("strata")?;
        if let Some(fallback) = &self.fallback_strata {
            fallback.validate("fallback_strata")?;
        }

        if !(self.focal.is_finite() && self.reference.is_finite()) {
            return Err(invalid(
                "focal/reference",
                format!("{}/{}", self.focal, self.reference),
                "finite group codes",
            ));
        }
        if self.focal == self.reference {
            return Err(invalid(
                "focal/reference",
                format!("{}/{}", self.focal, self.reference),
                "distinct group codes",
            ));
        }
        if !self.delta_scale.is_finite() || self.delta_scale == 0.0 {
            return Err(invalid(
                "delta_scale",
                self.delta_scale.to_string(),
                "a finite non-zero multiplier",
            ));
        }
        if self.stats.is_empty() {
            return Err(invalid("stats", "[]".to_string(), "at least one statistic"));
        }
        for (param, label) in [
            ("raw_score_column", &self.raw_score_column),
            ("group_column", &self.group_column),
        ] {
            if label.trim().is_empty() {
                return Err(invalid(param, format!("{label:?}"), "a non-empty column label"));
            }
        }
        Ok(())
    }

    /// Parses a configuration from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DifError::Serialization`] for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`DifError::Io`] if the file can't be read, or
    /// [`DifError::Serialization`] for malformed JSON.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Serializes the configuration as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DifError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn invalid(param: &str, value: String, constraint: &str) -> DifError {
    DifError::InvalidParameter {
        param: param.to_string(),
        value,
        constraint: constraint.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DifConfig::default();
        assert_eq!(config.strata, StrataSpec::Count(20));
        assert_eq!(config.fallback_strata, Some(StrataSpec::Count(10)));
        assert_eq!(config.groups(), GroupPair::new(1.0, 0.0));
        assert_eq!(config.stats, ["Flag", "Counts"]);
        assert_eq!(config.delta_scale, 2.35);
        assert_eq!(config.c_grouping, CTermGrouping::SourceLiteral);
        assert!(!config.continuity_correction);
        assert!(!config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = DifConfig::default()
            .with_strata(StrataSpec::AllScores)
            .with_fallback_strata(None)
            .with_groups(2.0, 1.0)
            .with_stats(vec!["MH_alpha".to_string()])
            .with_continuity_correction(true)
            .with_c_grouping(CTermGrouping::Textbook)
            .with_delta_scale(-2.35)
            .with_columns("total", "sex")
            .with_parallel(true);
        assert_eq!(config.strata, StrataSpec::AllScores);
        assert_eq!(config.fallback_strata, None);
        assert_eq!(config.groups().codes(), [2.0, 1.0]);
        assert_eq!(config.stats, ["MH_alpha"]);
        assert!(config.continuity_correction);
        assert_eq!(
            config.mh_options(),
            MhOptions {
                delta_scale: -2.35,
                c_grouping: CTermGrouping::Textbook
            }
        );
        assert_eq!(config.raw_score_column, "total");
        assert_eq!(config.group_column, "sex");
        assert!(config.parallel);
    }

    #[test]
    fn test_validate_rejects() {
        let cases = [
            DifConfig::default().with_strata(StrataSpec::Count(0)),
            DifConfig::default().with_fallback_strata(Some(StrataSpec::Count(0))),
            DifConfig::default().with_groups(1.0, 1.0),
            DifConfig::default().with_groups(f64::NAN, 0.0),
            DifConfig::default().with_delta_scale(0.0),
            DifConfig::default().with_stats(Vec::<String>::new()),
            DifConfig::default().with_columns("", "Group"),
        ];
        for config in cases {
            let err = config.validate().expect_err("invalid config");
            assert!(
                matches!(err, DifError::InvalidParameter { .. }),
                "unexpected error {err}"
            );
        }
    }

    #[test]
    fn test_from_json_partial() {
        let config = DifConfig::from_json(
            r#"{"strata": "all_scores", "focal": 2, "reference": 1, "c_grouping": "textbook"}"#,
        )
        .expect("valid json");
        assert_eq!(config.strata, StrataSpec::AllScores);
        assert_eq!(config.groups(), GroupPair::new(2.0, 1.0));
        assert_eq!(config.c_grouping, CTermGrouping::Textbook);
        // untouched fields keep defaults
        assert_eq!(config.fallback_strata, Some(StrataSpec::Count(10)));
        assert_eq!(config.raw_score_column, "RawScore");
    }

    #[test]
    fn test_from_json_malformed() {
        let err = DifConfig::from_json("{\"strata\": \"many\"}").expect_err("bad strata");
        assert!(matches!(err, DifError::Serialization(_)));
        let err = DifConfig::from_json("not json").expect_err("bad json");
        assert!(matches!(err, DifError::Serialization(_)));
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dif.json");
        let config = DifConfig::default()
            .with_strata(StrataSpec::Count(5))
            .with_stats(["SMD/SD", "M_chisq"]);
        std::fs::write(&path, config.to_json().expect("serialize")).expect("write");

        let loaded = DifConfig::from_json_file(&path).expect("read back");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_json_file_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = DifConfig::from_json_file(dir.path().join("absent.json")).expect_err("no file");
        assert!(matches!(err, DifError::Io(_)));
    }
}
