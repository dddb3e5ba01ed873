use super::*;

fn mantel_result(chisq_pval: f64) -> MantelResult {
    MantelResult {
        dif: -6.0,
        var: 6.4,
        z: -2.37,
        pval: 0.009,
        chisq: 5.63,
        chisq_pval,
        continuity_corrected: false,
    }
}

fn polytomous(smd_dif: f64, sd: Option<f64>, chisq_pval: f64) -> ItemResult {
    ItemResult {
        item: "Q2".to_string(),
        outcome: ItemOutcome::Scored {
            strata_used: StrataSpec::Count(2),
            n_strata: 2,
            categories: 3,
        },
        statistics: Some(ItemStatistics::Polytomous {
            smd: Some(SmdResult {
                dif: smd_dif,
                var: 0.064,
                z: -2.37,
                pval: 0.009,
                chisq: 5.63,
                chisq_pval: 0.018,
            }),
            mantel: Some(mantel_result(chisq_pval)),
        }),
        descriptives: Some(Descriptives {
            sd,
            count_ref: 20,
            count_focal: 20,
        }),
        notes: Vec::new(),
    }
}

fn dichotomous(mh: Option<MhResult>) -> ItemResult {
    ItemResult {
        item: "Q1".to_string(),
        outcome: ItemOutcome::Scored {
            strata_used: StrataSpec::Count(2),
            n_strata: 2,
            categories: 2,
        },
        statistics: Some(ItemStatistics::Dichotomous {
            mh,
            mantel: Some(mantel_result(0.2)),
        }),
        descriptives: Some(Descriptives {
            sd: Some(0.5),
            count_ref: 60,
            count_focal: 60,
        }),
        notes: Vec::new(),
    }
}

fn mh_result(d_dif: f64, var: f64, pval: f64) -> MhResult {
    MhResult {
        alpha: 0.35,
        log_alpha: d_dif / 2.35,
        d_dif,
        var,
        log_alpha_var: var / 2.35,
        z: 2.7,
        pval,
        chisq: 7.5,
        chisq_pval: 0.006,
    }
}

#[test]
fn test_polytomous_values() {
    let result = polytomous(-0.6, Some(0.8), 0.01);
    assert_eq!(result.value(Statistic::SmdDif), Some(-0.6));
    assert!((result.value(Statistic::SmdOverSd).expect("sd > 0") + 0.75).abs() < 1e-12);
    assert_eq!(result.value(Statistic::MChisqPval), Some(0.01));
    assert_eq!(result.value(Statistic::CountAll), Some(40.0));
    assert_eq!(result.value(Statistic::Flag), Some(2.0));
    // MH columns are never computed for polytomous items
    assert_eq!(result.value(Statistic::MhAlpha), None);
    assert_eq!(result.statistics.as_ref().map(ItemStatistics::cardinality), Some(Cardinality::Polytomous));
}

#[test]
fn test_polytomous_flag_needs_sd() {
    let result = polytomous(-0.6, None, 0.01);
    assert_eq!(result.value(Statistic::SmdOverSd), None);
    assert_eq!(result.flag(), None);

    let zero_sd = polytomous(-0.6, Some(0.0), 0.01);
    assert_eq!(zero_sd.value(Statistic::SmdOverSd), None);

    let small = polytomous(-0.1, Some(0.8), 0.01);
    assert_eq!(small.flag(), Some(DifFlag::None));
}

#[test]
fn test_dichotomous_values() {
    let result = dichotomous(Some(mh_result(-2.48, 0.35, 0.003)));
    assert_eq!(result.value(Statistic::MhDDif), Some(-2.48));
    assert_eq!(result.value(Statistic::MhAlpha), Some(0.35));
    assert_eq!(result.value(Statistic::SmdDif), None);
    assert_eq!(result.value(Statistic::SmdOverSd), None);
    assert_eq!(result.value(Statistic::MChisqPval), Some(0.2));
    assert_eq!(result.value(Statistic::Sd), Some(0.5));
    assert_eq!(result.flag(), Some(DifFlag::Severe));
}

#[test]
fn test_dichotomous_flag_missing_mh() {
    let result = dichotomous(None);
    assert_eq!(result.value(Statistic::Flag), None);
    assert_eq!(result.value(Statistic::MDif), Some(-6.0));
}

#[test]
fn test_skipped_has_no_values() {
    let result = ItemResult::skipped("Q9", "stratum 0 has 1 observation");
    assert!(!result.is_scored());
    for stat in Statistic::ALL {
        assert_eq!(result.value(stat), None, "{stat} should be unavailable");
    }
}

#[test]
fn test_outcome_serde_tagged() {
    let json = serde_json::to_string(&ItemOutcome::Skipped {
        reason: "empty".to_string(),
    })
    .expect("serialize");
    assert_eq!(json, r#"{"state":"skipped","reason":"empty"}"#);

    let scored: ItemOutcome =
        serde_json::from_str(r#"{"state":"scored","strata_used":"all_scores","n_strata":4,"categories":2}"#)
            .expect("deserialize");
    assert_eq!(
        scored,
        ItemOutcome::Scored {
            strata_used: StrataSpec::AllScores,
            n_strata: 4,
            categories: 2
        }
    );
}
