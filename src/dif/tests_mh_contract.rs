// =========================================================================
// FALSIFY-MH: Mantel-Haenszel contract
//
// Reference case (counts per stratum indexed by category, 1 = correct):
//   focal     [[12, 18], [ 8, 22]]
//   reference [[20, 10], [15, 15]]
//   Σ R = 2 + 2.5 = 4.5, Σ S = 6 + 6.9 = 12.9 → α = 8/23
//
// References:
//   - Robins, Breslow & Greenland (1986)
//   - Holland & Thayer (1988)
// =========================================================================

use super::*;
use crate::dif::table::GroupPair;

fn table_from(focal: Vec<Vec<usize>>, reference: Vec<Vec<usize>>) -> ContingencyTable {
    ContingencyTable::from_counts(vec![0, 1], GroupPair::default(), focal, reference, -9.0)
        .expect("valid table")
}

fn reference_table() -> ContingencyTable {
    table_from(vec![vec![12, 18], vec![8, 22]], vec![vec![20, 10], vec![15, 15]])
}

/// Same examinees with the correct/incorrect codes exchanged.
fn swapped_table() -> ContingencyTable {
    table_from(vec![vec![18, 12], vec![22, 8]], vec![vec![10, 20], vec![15, 15]])
}

fn textbook() -> MhOptions {
    MhOptions {
        c_grouping: CTermGrouping::Textbook,
        ..MhOptions::default()
    }
}

/// FALSIFY-MH-001: Two-stratum scenario gives a finite positive α and a
/// probability-valued chi-square p-value
#[test]
fn falsify_mh_001_two_stratum_scenario() {
    let result = mantel_haenszel(&reference_table(), MhOptions::default()).expect("valid");
    assert!(result.alpha.is_finite() && result.alpha > 0.0, "FALSIFIED MH-001");
    assert!((result.alpha - 8.0 / 23.0).abs() < 1e-12);
    assert!((0.0..=1.0).contains(&result.chisq_pval));
}

/// FALSIFY-MH-002: Hand-computed values under the default grouping
#[test]
fn falsify_mh_002_default_grouping_values() {
    let result = mantel_haenszel(&reference_table(), MhOptions::default()).expect("valid");
    assert!((result.log_alpha + 1.056_052_674_249_313_7).abs() < 1e-12);
    assert!((result.d_dif + 2.481_723_784_485_887_5).abs() < 1e-12);
    assert!((result.log_alpha_var - 3.716_711_956_521_739).abs() < 1e-10);
    assert!((result.var - 8.734_273_097_826_087).abs() < 1e-10);
    assert!((result.chisq - 0.300_062_868_426_539).abs() < 1e-10);
    assert!((result.z - 0.547_779_945_257_709_3).abs() < 1e-10);
    assert!((result.pval - 0.291_921_505_301_444_3).abs() < 1e-9);
    assert!((result.chisq_pval - 0.583_843_010_602_888_5).abs() < 1e-8);
}

/// FALSIFY-MH-003: Hand-computed values under the published grouping
#[test]
fn falsify_mh_003_textbook_grouping_values() {
    let result = mantel_haenszel(&reference_table(), textbook()).expect("valid");
    assert!((result.log_alpha_var - 0.148_068_289_224_952_74).abs() < 1e-12);
    assert!((result.var - 0.347_960_479_678_638_97).abs() < 1e-12);
    assert!((result.chisq - 7.531_979_039_041_829).abs() < 1e-9);
    assert!((result.chisq_pval - 0.006_061_328_752_991_61).abs() < 1e-8);
}

/// FALSIFY-MH-004: Exchanging correct/incorrect inverts α and negates the
/// log-odds and D-DIF while leaving variance and tests unchanged
#[test]
fn falsify_mh_004_category_swap_symmetry() {
    let original = mantel_haenszel(&reference_table(), textbook()).expect("valid");
    let swapped = mantel_haenszel(&swapped_table(), textbook()).expect("valid");

    assert!(
        (original.alpha * swapped.alpha - 1.0).abs() < 1e-12,
        "FALSIFIED MH-004: α={} vs {}",
        original.alpha,
        swapped.alpha
    );
    assert!((original.log_alpha + swapped.log_alpha).abs() < 1e-12);
    assert!((original.d_dif + swapped.d_dif).abs() < 1e-12);
    assert!((original.var - swapped.var).abs() < 1e-12);
    assert!((original.chisq - swapped.chisq).abs() < 1e-10);
    assert!((original.pval - swapped.pval).abs() < 1e-12);
}

/// FALSIFY-MH-005: The default grouping breaks variance symmetry; α and the
/// log-odds still behave
#[test]
fn falsify_mh_005_default_grouping_asymmetry() {
    let original = mantel_haenszel(&reference_table(), MhOptions::default()).expect("valid");
    let swapped = mantel_haenszel(&swapped_table(), MhOptions::default()).expect("valid");
    assert!((original.alpha * swapped.alpha - 1.0).abs() < 1e-12);
    assert!((original.log_alpha + swapped.log_alpha).abs() < 1e-12);
    assert!((original.var - swapped.var).abs() > 1.0);
}

/// FALSIFY-MH-006: Delta scale multiplies both log-odds and variance
#[test]
fn falsify_mh_006_delta_scale() {
    let options = MhOptions {
        delta_scale: -2.35,
        ..MhOptions::default()
    };
    let negative = mantel_haenszel(&reference_table(), options).expect("valid");
    let positive = mantel_haenszel(&reference_table(), MhOptions::default()).expect("valid");
    assert!((negative.d_dif + positive.d_dif).abs() < 1e-12);
    assert!((negative.d_dif / negative.log_alpha + 2.35).abs() < 1e-12);
    assert_eq!(negative.chisq, positive.chisq);
    assert_eq!(ETS_DELTA_SCALE, 2.35);
}

/// FALSIFY-MH-007: Equal odds in every stratum gives α = 1 and no evidence of DIF
#[test]
fn falsify_mh_007_no_dif() {
    let table = table_from(vec![vec![10, 10], vec![5, 15]], vec![vec![20, 20], vec![10, 30]]);
    let result = mantel_haenszel(&table, MhOptions::default()).expect("valid");
    assert!((result.alpha - 1.0).abs() < 1e-12);
    assert!(result.log_alpha.abs() < 1e-12);
    assert!(result.chisq < 1e-20);
    assert!((result.pval - 0.5).abs() < 1e-9);
}

/// FALSIFY-MH-008: Polytomous tables are rejected
#[test]
fn falsify_mh_008_requires_two_categories() {
    let table = ContingencyTable::from_counts(
        vec![0, 1, 2],
        GroupPair::default(),
        vec![vec![1, 2, 3]],
        vec![vec![3, 2, 1]],
        -9.0,
    )
    .expect("valid table");
    let err = mantel_haenszel(&table, MhOptions::default()).expect_err("three categories");
    assert!(matches!(err, DifError::DegenerateVariance { ref family, .. } if family == "MH"));
}

/// FALSIFY-MH-009: A zero odds-ratio denominator is degenerate, not infinite
#[test]
fn falsify_mh_009_zero_denominator() {
    // No focal examinee answers correctly: Σ B·C / N = 0
    let table = table_from(vec![vec![10, 0], vec![12, 0]], vec![vec![5, 5], vec![4, 6]]);
    let err = mantel_haenszel(&table, MhOptions::default()).expect_err("α undefined");
    assert!(matches!(err, DifError::DegenerateVariance { .. }), "FALSIFIED MH-009: {err}");
}

mod mh_proptest_falsify {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(80))]

        /// FALSIFY-MH-004-prop: swap symmetry holds for arbitrary well-filled tables
        #[test]
        fn falsify_mh_004_prop_swap_symmetry(
            strata in proptest::collection::vec((1usize..40, 1usize..40, 1usize..40, 1usize..40), 1..6),
        ) {
            let focal: Vec<Vec<usize>> = strata.iter().map(|&(f0, f1, _, _)| vec![f0, f1]).collect();
            let reference: Vec<Vec<usize>> = strata.iter().map(|&(_, _, r0, r1)| vec![r0, r1]).collect();
            let focal_swapped: Vec<Vec<usize>> = strata.iter().map(|&(f0, f1, _, _)| vec![f1, f0]).collect();
            let reference_swapped: Vec<Vec<usize>> = strata.iter().map(|&(_, _, r0, r1)| vec![r1, r0]).collect();

            let original = mantel_haenszel(&table_from(focal, reference), textbook()).expect("cells > 0");
            let swapped = mantel_haenszel(&table_from(focal_swapped, reference_swapped), textbook()).expect("cells > 0");

            prop_assert!((original.alpha * swapped.alpha - 1.0).abs() < 1e-9);
            prop_assert!((original.d_dif + swapped.d_dif).abs() < 1e-9);
            prop_assert!((original.var - swapped.var).abs() < 1e-9 * original.var.max(1.0));
            prop_assert!((original.chisq - swapped.chisq).abs() < 1e-9 * original.chisq.max(1.0));
        }
    }
}
