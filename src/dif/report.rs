//! Batch output: one row per item, one column per resolved statistic.

use super::result::ItemResult;
use super::statistic::Statistic;
use crate::data::ScoredTable;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// DIF report for a batch of items.
///
/// Unavailable and inapplicable cells hold the source table's missing-value
/// sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifReport {
    columns: Vec<Statistic>,
    items: Vec<String>,
    values: Vec<Vec<f64>>,
    missing: f64,
    results: Vec<ItemResult>,
}

impl DifReport {
    /// Flattens per-item results into sentinel-padded rows.
    #[must_use]
    pub fn from_results(columns: Vec<Statistic>, results: Vec<ItemResult>, missing: f64) -> Self {
        let values = results
            .iter()
            .map(|result| {
                columns
                    .iter()
                    .map(|&stat| result.value(stat).unwrap_or(missing))
                    .collect()
            })
            .collect();
        let items = results.iter().map(|r| r.item.clone()).collect();
        Self {
            columns,
            items,
            values,
            missing,
            results,
        }
    }

    /// Report columns in order.
    #[must_use]
    pub fn columns(&self) -> &[Statistic] {
        &self.columns
    }

    /// Item labels in request order.
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Sentinel used for unavailable cells.
    #[must_use]
    pub fn missing_value(&self) -> f64 {
        self.missing
    }

    /// True if `value` is the sentinel.
    #[must_use]
    pub fn is_missing(&self, value: f64) -> bool {
        value == self.missing || value.is_nan()
    }

    /// Number of item rows.
    #[must_use]
    pub fn n_items(&self) -> usize {
        self.items.len()
    }

    /// One cell; `None` if the item or column isn't in the report.
    #[must_use]
    pub fn get(&self, item: &str, stat: Statistic) -> Option<f64> {
        let col = self.column_index(stat)?;
        self.row(item).map(|row| row[col])
    }

    /// All cells of one item, in column order.
    #[must_use]
    pub fn row(&self, item: &str) -> Option<&[f64]> {
        let idx = self.items.iter().position(|i| i == item)?;
        Some(&self.values[idx])
    }

    /// One column across items, in item order.
    #[must_use]
    pub fn column(&self, stat: Statistic) -> Option<Vec<f64>> {
        let col = self.column_index(stat)?;
        Some(self.values.iter().map(|row| row[col]).collect())
    }

    /// Structured result for one item.
    #[must_use]
    pub fn result(&self, item: &str) -> Option<&ItemResult> {
        self.results.iter().find(|r| r.item == item)
    }

    /// Structured results in item order.
    #[must_use]
    pub fn results(&self) -> &[ItemResult] {
        &self.results
    }

    /// Labels of items that could not be scored.
    #[must_use]
    pub fn skipped_items(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| !r.is_scored())
            .map(|r| r.item.as_str())
            .collect()
    }

    /// Re-exposes the report as a table: rows labelled by item, columns named
    /// by statistic.
    ///
    /// # Errors
    ///
    /// Returns an error if the report has no columns or repeats an item label.
    pub fn to_scored_table(&self) -> Result<ScoredTable> {
        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(c, stat)| {
                let data = self.values.iter().map(|row| row[c]).collect();
                (stat.name().to_string(), data)
            })
            .collect();
        ScoredTable::new(columns, self.missing)?.with_row_labels(self.items.clone())
    }

    /// Serializes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::DifError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn column_index(&self, stat: Statistic) -> Option<usize> {
        self.columns.iter().position(|&s| s == stat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ScoreSource;
    use crate::dif::result::{Descriptives, ItemOutcome, ItemStatistics};
    use crate::dif::strata::StrataSpec;

    const MISSING: f64 = -99.0;

    fn sample_report() -> DifReport {
        let scored = ItemResult {
            item: "Q1".to_string(),
            outcome: ItemOutcome::Scored {
                strata_used: StrataSpec::Count(3),
                n_strata: 3,
                categories: 2,
            },
            statistics: Some(ItemStatistics::Dichotomous {
                mh: None,
                mantel: None,
            }),
            descriptives: Some(Descriptives {
                sd: Some(0.5),
                count_ref: 10,
                count_focal: 12,
            }),
            notes: vec!["MH: degenerate".to_string()],
        };
        let skipped = ItemResult::skipped("Q2", "no strata");
        DifReport::from_results(
            vec![Statistic::MhAlpha, Statistic::Sd, Statistic::CountAll],
            vec![scored, skipped],
            MISSING,
        )
    }

    #[test]
    fn test_cells_and_sentinels() {
        let report = sample_report();
        assert_eq!(report.n_items(), 2);
        assert_eq!(report.get("Q1", Statistic::Sd), Some(0.5));
        assert_eq!(report.get("Q1", Statistic::CountAll), Some(22.0));
        assert_eq!(report.get("Q1", Statistic::MhAlpha), Some(MISSING));
        assert_eq!(report.row("Q2"), Some(&[MISSING, MISSING, MISSING][..]));
        assert_eq!(report.get("Q3", Statistic::Sd), None);
        assert_eq!(report.get("Q1", Statistic::Flag), None);
        assert!(report.is_missing(MISSING));
    }

    #[test]
    fn test_column_and_skipped() {
        let report = sample_report();
        assert_eq!(report.column(Statistic::Sd), Some(vec![0.5, MISSING]));
        assert_eq!(report.skipped_items(), ["Q2"]);
        assert_eq!(report.result("Q1").map(|r| r.notes.len()), Some(1));
    }

    #[test]
    fn test_to_scored_table() {
        let table = sample_report().to_scored_table().expect("valid table");
        assert_eq!(table.shape(), (2, 3));
        assert_eq!(table.row_labels(), ["Q1", "Q2"]);
        assert_eq!(table.cell("Q1", "Count_All").expect("cell"), 22.0);
        assert!(table.is_missing(table.cell("Q2", "SD").expect("cell")));
        assert_eq!(table.missing_value(), MISSING);
    }

    #[test]
    fn test_json_round_trip() {
        let report = sample_report();
        let json = report.to_json().expect("serialize");
        assert!(json.contains("\"MH_alpha\""));
        let back: DifReport = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, report);
    }
}
