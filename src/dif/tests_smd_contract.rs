// =========================================================================
// FALSIFY-SMD: standardized mean difference contract
//
// Two strata, three categories:
//   focal     [[6, 3, 1], [3, 4, 3]]   means 0.5, 1.0
//   reference [[2, 4, 4], [1, 3, 6]]   means 1.2, 1.5
//   equal focal weights → SMD = 0.5·(−0.7) + 0.5·(−0.5) = −0.6
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

/// FALSIFY-SMD-001: Hand-computed estimate and variance
#[test]
fn falsify_smd_001_hand_computed() {
    let result = smd(&poly_table()).expect("non-degenerate");
    assert!((result.dif + 0.6).abs() < 1e-12, "FALSIFIED SMD-001: dif={}", result.dif);
    assert!(
        (result.var - 0.063_947_368_421_052_64).abs() < 1e-12,
        "FALSIFIED SMD-001: var={}",
        result.var
    );
    assert!((result.z + 2.372_684_056_006_958).abs() < 1e-9);
    assert!((result.chisq - 5.629_629_629_629_63).abs() < 1e-9);
    assert!((result.pval - 0.008_829_681_124_912_4).abs() < 1e-9);
    assert!((result.chisq_pval - 0.017_659_362_249_824_8).abs() < 1e-8);
}

/// FALSIFY-SMD-002: chisq is z² and both p-values are probabilities
#[test]
fn falsify_smd_002_test_statistics_consistent() {
    let result = smd(&poly_table()).expect("non-degenerate");
    assert!((result.chisq - result.z * result.z).abs() < 1e-12);
    assert!((0.0..=1.0).contains(&result.pval));
    assert!((0.0..=1.0).contains(&result.chisq_pval));
}

/// FALSIFY-SMD-003: Swapping focal and reference negates SMD when weights agree
#[test]
fn falsify_smd_003_group_swap_negates() {
    let swapped = ContingencyTable::from_counts(
        vec![0, 1, 2],
        GroupPair::new(0.0, 1.0),
        vec![vec![2, 4, 4], vec![1, 3, 6]],
        vec![vec![6, 3, 1], vec![3, 4, 3]],
        -9.0,
    )
    .expect("valid table");
    let a = smd(&poly_table()).expect("valid");
    let b = smd(&swapped).expect("valid");
    assert!((a.dif + b.dif).abs() < 1e-12, "FALSIFIED SMD-003");
    assert!((a.var - b.var).abs() < 1e-12);
}

/// FALSIFY-SMD-004: A stratum without reference examinees is degenerate
#[test]
fn falsify_smd_004_empty_group_degenerate() {
    let table = ContingencyTable::from_counts(
        vec![0, 1, 2],
        GroupPair::default(),
        vec![vec![6, 3, 1], vec![3, 4, 3]],
        vec![vec![2, 4, 4], vec![0, 0, 0]],
        -9.0,
    )
    .expect("stratum totals are still > 1");
    let err = smd(&table).expect_err("empty reference group");
    assert!(
        matches!(err, DifError::DegenerateVariance { ref family, .. } if family == "SMD"),
        "FALSIFIED SMD-004: {err}"
    );
}

/// FALSIFY-SMD-005: Identical group distributions give SMD = 0
#[test]
fn falsify_smd_005_no_dif_when_groups_match() {
    let table = ContingencyTable::from_counts(
        vec![0, 1, 2],
        GroupPair::default(),
        vec![vec![2, 5, 3], vec![1, 1, 8]],
        vec![vec![4, 10, 6], vec![2, 2, 16]],
        -9.0,
    )
    .expect("valid table");
    let result = smd(&table).expect("non-degenerate");
    assert!(result.dif.abs() < 1e-12);
    assert!(result.z.abs() < 1e-12);
    assert!((result.pval - 0.5).abs() < 1e-12);
}

/// FALSIFY-SMD-006: No response spread in any stratum means zero variance
#[test]
fn falsify_smd_006_zero_variance_degenerate() {
    let table = ContingencyTable::from_counts(
        vec![0, 1, 2],
        GroupPair::default(),
        vec![vec![0, 4, 0]],
        vec![vec![0, 3, 0]],
        -9.0,
    )
    .expect("valid table");
    let err = smd(&table).expect_err("every examinee in one category");
    assert!(matches!(err, DifError::DegenerateVariance { .. }));
}
