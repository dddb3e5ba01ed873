// =========================================================================
// FALSIFY-MT: Mantel statistic contract
//
// Polytomous reference case shares its table with the SMD contract; with
// equal group sizes per stratum the Mantel z equals the SMD z.
// =========================================================================

use super::*;
use crate::dif::table::GroupPair;

fn poly_table() -> ContingencyTable {
    ContingencyTable::from_counts(
        vec![0, 1, 2],
        GroupPair::default(),
        vec![vec![6, 3, 1], vec![3, 4, 3]],
        vec![vec![2, 4, 4], vec![1, 3, 6]],
        -9.0,
    )
    .expect("valid table")
}

fn dichotomous_table() -> ContingencyTable {
    ContingencyTable::from_counts(
        vec![0, 1],
        GroupPair::default(),
        vec![vec![12, 18], vec![8, 22]],
        vec![vec![20, 10], vec![15, 15]],
        -9.0,
    )
    .expect("valid table")
}

/// FALSIFY-MT-001: Hand-computed polytomous case
#[test]
fn falsify_mt_001_polytomous_hand_computed() {
    let result = mantel(&poly_table(), false).expect("non-degenerate");
    assert!((result.dif + 6.0).abs() < 1e-12, "FALSIFIED MT-001: dif={}", result.dif);
    assert!((result.var - 6.394_736_842_105_263).abs() < 1e-10);
    assert!((result.chisq - 5.629_629_629_629_63).abs() < 1e-9);
    assert!((result.chisq_pval - 0.017_659_362_249_824_8).abs() < 1e-8);
    assert!(!result.continuity_corrected);
}

/// FALSIFY-MT-002: Polytomous items ignore the continuity correction
#[test]
fn falsify_mt_002_correction_dichotomous_only() {
    let plain = mantel(&poly_table(), false).expect("valid");
    let corrected = mantel(&poly_table(), true).expect("valid");
    assert_eq!(plain, corrected);
}

/// FALSIFY-MT-003: Continuity correction on a dichotomous item
#[test]
fn falsify_mt_003_continuity_correction() {
    let plain = mantel(&dichotomous_table(), false).expect("valid");
    let corrected = mantel(&dichotomous_table(), true).expect("valid");

    assert!((plain.dif - 7.5).abs() < 1e-12);
    assert!((plain.var - 7.402_542_372_881_356).abs() < 1e-10);
    assert!((plain.chisq - 7.598_740_698_340_011).abs() < 1e-9);

    assert!(corrected.continuity_corrected);
    assert!((corrected.chisq - 6.619_347_452_776_188).abs() < 1e-9);
    assert!(corrected.chisq < plain.chisq);
    assert!(corrected.chisq_pval > plain.chisq_pval);
    // z and its p-value are not corrected
    assert_eq!(corrected.z, plain.z);
    assert_eq!(corrected.pval, plain.pval);
}

/// FALSIFY-MT-004: Observed sum equals expectation when groups match
#[test]
fn falsify_mt_004_no_dif_when_groups_match() {
    let table = ContingencyTable::from_counts(
        vec![0, 1, 2],
        GroupPair::default(),
        vec![vec![2, 5, 3]],
        vec![vec![4, 10, 6]],
        -9.0,
    )
    .expect("valid table");
    let result = mantel(&table, false).expect("valid");
    assert!(result.dif.abs() < 1e-12);
    assert!(result.chisq.abs() < 1e-20);
    assert!((result.chisq_pval - 1.0).abs() < 1e-12);
}

/// FALSIFY-MT-005: A single-group table has zero variance
#[test]
fn falsify_mt_005_single_group_degenerate() {
    let table = ContingencyTable::from_counts(
        vec![0, 1],
        GroupPair::default(),
        vec![vec![3, 4]],
        vec![vec![0, 0]],
        -9.0,
    )
    .expect("valid table");
    let err = mantel(&table, false).expect_err("no reference examinees");
    assert!(
        matches!(err, DifError::DegenerateVariance { ref family, .. } if family == "M"),
        "FALSIFIED MT-005: {err}"
    );
}
