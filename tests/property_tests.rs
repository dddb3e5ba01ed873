//! Property-based tests using proptest.
//!
//! These tests verify batch-level invariants of the DIF engine over randomly
//! generated score tables.

use difstat::dif::strata::stratum_indices;
use difstat::dif::{Cardinality, ContingencyTable, GroupPair, ResolvedStatistics};
use difstat::prelude::*;
use proptest::prelude::*;

const MISSING: f64 = -1.0;

/// Rows of (response, raw score, group); the marker blanks the response (0)
/// or the raw score (1).
fn table_strategy(max_category: u8) -> impl Strategy<Value = ScoredTable> {
    proptest::collection::vec((0..=max_category, 0u8..15, 0u8..3, 0u8..8), 8..150).prop_map(
        |rows| {
            let item = rows
                .iter()
                .map(|&(r, _, _, m)| if m == 0 { MISSING } else { f64::from(r) })
                .collect();
            let raw = rows
                .iter()
                .map(|&(_, s, _, m)| if m == 1 { MISSING } else { f64::from(s) })
                .collect();
            let group = rows.iter().map(|&(_, _, g, _)| f64::from(g)).collect();
            ScoredTable::new(
                vec![
                    ("item".to_string(), item),
                    ("RawScore".to_string(), raw),
                    ("Group".to_string(), group),
                ],
                MISSING,
            )
            .expect("equal column lengths")
        },
    )
}

fn all_statistics() -> Vec<String> {
    Statistic::ALL.iter().map(|s| s.name().to_string()).collect()
}

fn inapplicable(resolved: &ResolvedStatistics, cardinality: Cardinality) -> Vec<Statistic> {
    resolved
        .columns()
        .iter()
        .copied()
        .filter(|s| !resolved.applicable(cardinality).contains(s))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn stratum_sequence_shape(n_unique in 1usize..200, n_strata in 1usize..40) {
        let idx = stratum_indices(n_unique, StrataSpec::Count(n_strata)).expect("valid spec");
        prop_assert_eq!(idx.len(), n_unique);
        prop_assert!(idx.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(idx.iter().all(|&k| k < n_strata));
        let interval = n_unique / n_strata;
        let lowest = idx.iter().filter(|&&k| k == 0).count();
        prop_assert!(lowest >= interval && lowest <= interval + n_unique % n_strata);
    }

    #[test]
    fn batch_never_fails_on_item_data(
        table in table_strategy(4),
        n_strata in 1usize..6,
    ) {
        let config = DifConfig::default()
            .with_strata(StrataSpec::Count(n_strata))
            .with_stats(all_statistics());
        let runner = DifBatchRunner::new(config).expect("valid config");
        let groups = table.column("Group").expect("exists");
        prop_assume!(groups.contains(&0.0) && groups.contains(&1.0));

        let report = runner.run(&table, &["item"]).expect("configuration is valid");
        prop_assert_eq!(report.n_items(), 1);
        let row = report.row("item").expect("one row per item");
        prop_assert_eq!(row.len(), report.columns().len());

        let result = report.result("item").expect("result");
        match &result.outcome {
            ItemOutcome::Scored { categories, .. } => {
                let cardinality = Cardinality::of(*categories);
                for stat in inapplicable(runner.resolved(), cardinality) {
                    prop_assert_eq!(report.get("item", stat), Some(MISSING));
                }
            }
            ItemOutcome::Skipped { .. } => {
                prop_assert!(row.iter().all(|&v| v == MISSING));
            }
        }
    }

    #[test]
    fn counts_match_table_total(table in table_strategy(3)) {
        let groups = table.column("Group").expect("exists");
        prop_assume!(groups.contains(&0.0) && groups.contains(&1.0));

        let report = DifBatchRunner::new(DifConfig::default().with_stats(["Counts"]).with_fallback_strata(None))
            .expect("valid config")
            .run(&table, &["item"])
            .expect("valid batch");

        let subset = table.extract_rows("Group", &[1.0, 0.0]).expect("column");
        if let Ok(built) = ContingencyTable::build(
            &subset,
            "item",
            "RawScore",
            "Group",
            GroupPair::default(),
            StrataSpec::Count(20),
        ) {
            prop_assert_eq!(report.get("item", Statistic::CountAll), Some(built.total() as f64));
            let parts = report.get("item", Statistic::CountRef).expect("column")
                + report.get("item", Statistic::CountFocal).expect("column");
            prop_assert_eq!(parts, built.total() as f64);
        } else {
            prop_assert_eq!(report.skipped_items(), vec!["item"]);
        }
    }
}
