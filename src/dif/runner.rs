//! Batch DIF analysis across items.
//!
//! Each item moves through a small state machine:
//!
//! 1. build a contingency table with the primary stratification;
//! 2. on failure, retry once with the fallback stratification;
//! 3. on a second failure the item is `Skipped` and its row is all sentinels;
//! 4. otherwise the families that apply to the item's category count are
//!    computed and the item is `Scored`.
//!
//! A degenerate family only blanks that family's columns. Configuration
//! problems (unknown statistics, missing columns, absent group codes) are
//! reported before any item is processed.

use super::config::DifConfig;
use super::mantel::mantel;
use super::mantel_haenszel::mantel_haenszel;
use super::report::DifReport;
use super::result::{Descriptives, ItemOutcome, ItemResult, ItemStatistics};
use super::smd::smd;
use super::statistic::{resolve_statistics, Cardinality, Family, ResolvedStatistics};
use super::strata::StrataSpec;
use super::table::{ContingencyTable, FOCAL, REFERENCE};
use crate::data::ScoreSource;
use crate::error::{DifError, Result};
use crate::stats::sample_std;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Runs DIF statistics for a batch of items.
///
/// # Examples
///
/// ```
/// use difstat::data::ScoredTable;
/// use difstat::dif::config::DifConfig;
/// use difstat::dif::runner::DifBatchRunner;
/// use difstat::dif::statistic::Statistic;
/// use difstat::dif::strata::StrataSpec;
///
/// let raw: Vec<f64> = (0..40).map(|i| f64::from(i % 10)).collect();
/// let group: Vec<f64> = (0..40).map(|i| f64::from(i % 2)).collect();
/// let item: Vec<f64> = (0..40).map(|i| f64::from(u8::from(i % 10 >= 5 || i % 3 == 0))).collect();
/// let table = ScoredTable::new(
///     vec![
///         ("Q1".to_string(), item),
///         ("RawScore".to_string(), raw),
///         ("Group".to_string(), group),
///     ],
///     -9.0,
/// )
/// .expect("valid table");
///
/// let config = DifConfig::default()
///     .with_strata(StrataSpec::Count(2))
///     .with_stats(["MH_alpha", "Counts"]);
/// let runner = DifBatchRunner::new(config).expect("valid config");
/// let report = runner.run(&table, &["Q1"]).expect("columns present");
///
/// assert_eq!(report.get("Q1", Statistic::CountAll), Some(40.0));
/// ```
#[derive(Debug, Clone)]
pub struct DifBatchRunner {
    config: DifConfig,
    resolved: ResolvedStatistics,
}

impl DifBatchRunner {
    /// Validates the configuration and resolves the statistic request.
    ///
    /// # Errors
    ///
    /// Returns [`DifError::InvalidParameter`] or [`DifError::UnknownStatistic`]
    /// for an unusable configuration.
    pub fn new(config: DifConfig) -> Result<Self> {
        config.validate()?;
        let resolved = resolve_statistics(&config.stats)?;
        tracing::debug!(
            columns = resolved.columns().len(),
            strata = %config.strata,
            "resolved DIF statistics"
        );
        Ok(Self { config, resolved })
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &DifConfig {
        &self.config
    }

    /// Report columns for this batch.
    #[must_use]
    pub fn resolved(&self) -> &ResolvedStatistics {
        &self.resolved
    }

    /// Scores every item and assembles the report.
    ///
    /// The report has one row per item in the given order. Item-level
    /// failures never abort the batch.
    ///
    /// # Errors
    ///
    /// - [`DifError::ColumnNotFound`] if an item, raw-score or group column is absent
    /// - [`DifError::GroupMismatch`] if the focal or reference code never occurs
    /// - [`DifError::InvalidParameter`] if an item is listed twice
    pub fn run<S, I>(&self, source: &S, items: &[I]) -> Result<DifReport>
    where
        S: ScoreSource + Sync,
        I: AsRef<str>,
    {
        let labels: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
        self.check_source(source, &labels)?;

        let groups = self.config.groups();
        let subset = source.extract_rows(&self.config.group_column, &groups.codes())?;
        tracing::info!(
            items = labels.len(),
            examinees = subset.n_rows(),
            focal = groups.focal,
            reference = groups.reference,
            "starting DIF batch"
        );

        let results = self.score_items(&subset, &labels);

        let skipped = results.iter().filter(|r| !r.is_scored()).count();
        tracing::info!(
            scored = results.len() - skipped,
            skipped,
            "finished DIF batch"
        );

        Ok(DifReport::from_results(
            self.resolved.columns().to_vec(),
            results,
            source.missing_value(),
        ))
    }

    fn check_source<S: ScoreSource>(&self, source: &S, items: &[&str]) -> Result<()> {
        source.column(&self.config.raw_score_column)?;
        let group = source.column(&self.config.group_column)?;

        for (i, item) in items.iter().enumerate() {
            source.column(item)?;
            if items[..i].contains(item) {
                return Err(DifError::InvalidParameter {
                    param: "items".to_string(),
                    value: (*item).to_string(),
                    constraint: "each item listed once".to_string(),
                });
            }
        }

        let groups = self.config.groups();
        let absent: Vec<String> = [("focal", groups.focal), ("reference", groups.reference)]
            .into_iter()
            .filter(|&(_, code)| !group.contains(&code))
            .map(|(role, code)| format!("{role} code {code}"))
            .collect();
        if !absent.is_empty() {
            return Err(DifError::GroupMismatch {
                message: format!(
                    "{} not found in column {}",
                    absent.join(" and "),
                    self.config.group_column
                ),
            });
        }
        Ok(())
    }

    #[cfg(feature = "parallel")]
    fn score_items<S: ScoreSource + Sync>(&self, source: &S, items: &[&str]) -> Vec<ItemResult> {
        if self.config.parallel {
            items
                .par_iter()
                .map(|item| self.score_item(source, item))
                .collect()
        } else {
            items.iter().map(|item| self.score_item(source, item)).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn score_items<S: ScoreSource>(&self, source: &S, items: &[&str]) -> Vec<ItemResult> {
        if self.config.parallel {
            tracing::debug!("parallel scoring requested without the `parallel` feature");
        }
        items.iter().map(|item| self.score_item(source, item)).collect()
    }

    /// Scores a single item against an already group-filtered source.
    #[must_use]
    pub fn score_item<S: ScoreSource>(&self, source: &S, item: &str) -> ItemResult {
        let (table, strata_used) = match self.build_with_fallback(source, item) {
            Ok(built) => built,
            Err(err) => {
                tracing::warn!(item, error = %err, "skipping item: no valid stratification");
                return ItemResult::skipped(item, err.to_string());
            }
        };

        let cardinality = Cardinality::of(table.n_categories());
        let mut notes = Vec::new();
        let mut record = |family: &str, err: DifError| {
            tracing::debug!(item, family, error = %err, "statistic family unavailable");
            notes.push(err.to_string());
        };

        let mantel_result = if self.resolved.needs_family(cardinality, Family::Mantel) {
            mantel(&table, self.config.continuity_correction)
                .map_err(|e| record("M", e))
                .ok()
        } else {
            None
        };

        let statistics = match cardinality {
            Cardinality::Dichotomous => {
                let mh = if self.resolved.needs_family(cardinality, Family::MantelHaenszel) {
                    mantel_haenszel(&table, self.config.mh_options())
                        .map_err(|e| record("MH", e))
                        .ok()
                } else {
                    None
                };
                ItemStatistics::Dichotomous {
                    mh,
                    mantel: mantel_result,
                }
            }
            Cardinality::Polytomous => {
                let smd_result = if self.resolved.needs_family(cardinality, Family::Smd) {
                    smd(&table).map_err(|e| record("SMD", e)).ok()
                } else {
                    None
                };
                ItemStatistics::Polytomous {
                    smd: smd_result,
                    mantel: mantel_result,
                }
            }
        };

        ItemResult {
            item: item.to_string(),
            outcome: ItemOutcome::Scored {
                strata_used,
                n_strata: table.n_strata(),
                categories: table.n_categories(),
            },
            statistics: Some(statistics),
            descriptives: Some(self.descriptives(source, item)),
            notes,
        }
    }

    fn build_with_fallback<S: ScoreSource>(
        &self,
        source: &S,
        item: &str,
    ) -> Result<(ContingencyTable, StrataSpec)> {
        let primary = self.config.strata;
        let err = match self.build(source, item, primary) {
            Ok(table) => return Ok((table, primary)),
            Err(err) => err,
        };

        let Some(fallback) = self.config.fallback_strata else {
            return Err(err);
        };
        tracing::debug!(
            item,
            primary = %primary,
            fallback = %fallback,
            error = %err,
            "primary stratification failed, retrying"
        );
        self.build(source, item, fallback)
            .map(|table| (table, fallback))
    }

    fn build<S: ScoreSource>(
        &self,
        source: &S,
        item: &str,
        strata: StrataSpec,
    ) -> Result<ContingencyTable> {
        ContingencyTable::build(
            source,
            item,
            &self.config.raw_score_column,
            &self.config.group_column,
            self.config.groups(),
            strata,
        )
    }

    /// SD and group counts over the rows the contingency table counts: valid
    /// response and valid raw score.
    fn descriptives<S: ScoreSource>(&self, source: &S, item: &str) -> Descriptives {
        let groups = self.config.groups();
        let (Ok(responses), Ok(raw), Ok(group)) = (
            source.column(item),
            source.column(&self.config.raw_score_column),
            source.column(&self.config.group_column),
        ) else {
            return Descriptives {
                sd: None,
                count_ref: 0,
                count_focal: 0,
            };
        };

        let mut counts = [0usize; 2];
        let mut valid = Vec::with_capacity(responses.len());
        for ((&response, &score), &code) in responses.iter().zip(raw).zip(group) {
            if source.is_missing(response) || source.is_missing(score) {
                continue;
            }
            if let Some(g) = groups.index_of(code) {
                counts[g] += 1;
                valid.push(response);
            }
        }

        Descriptives {
            sd: sample_std(&valid),
            count_ref: counts[REFERENCE],
            count_focal: counts[FOCAL],
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
