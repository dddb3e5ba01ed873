// =========================================================================
// FALSIFY-HT: tail probability contract (difstat stats)
//
// References:
//   - Abramowitz & Stegun (1964) 26.2 (normal), 26.4 (chi-square)
// =========================================================================

use super::*;

/// FALSIFY-HT-001: Φ(0) = 0.5 and Φ(x) + (1 - Φ(x)) = 1
#[test]
fn falsify_ht_001_normal_cdf_sf_complement() {
    assert!((normal_cdf(0.0) - 0.5).abs() < 1e-15);
    for &x in &[-3.0, -1.2, 0.0, 0.7, 1.96, 4.0] {
        let total = normal_cdf(x) + normal_sf(x);
        assert!(
            (total - 1.0).abs() < 1e-12,
            "FALSIFIED HT-001: cdf+sf={total} at x={x}"
        );
    }
}

/// FALSIFY-HT-002: Known critical values
#[test]
fn falsify_ht_002_known_quantiles() {
    assert!((normal_sf(1.644_853_626_951_472) - 0.05).abs() < 1e-9);
    assert!((normal_sf(1.959_963_984_540_054) - 0.025).abs() < 1e-9);
    let p = chi_square_sf(3.841_458_820_694_124, 1).expect("valid df");
    assert!((p - 0.05).abs() < 1e-6, "FALSIFIED HT-002: p={p}");
    let p = chi_square_sf(5.991_464_547_107_979, 2).expect("valid df");
    assert!((p - 0.05).abs() < 1e-6, "FALSIFIED HT-002: p={p}");
}

/// FALSIFY-HT-003: chi-square(1) tail equals the two-sided normal tail
#[test]
fn falsify_ht_003_chisq1_matches_two_sided_normal() {
    for &z in &[0.3, 1.0, 2.2, 3.1] {
        let chi = chi_square_sf(z * z, 1).expect("valid");
        let two_sided = 2.0 * normal_sf(z);
        assert!(
            (chi - two_sided).abs() < 1e-8,
            "FALSIFIED HT-003: chi={chi}, normal={two_sided} at z={z}"
        );
    }
}

/// FALSIFY-HT-004: z test is symmetric in the sign of the estimate
#[test]
fn falsify_ht_004_z_test_sign_symmetry() {
    let pos = z_test(1.3, 0.49).expect("valid");
    let neg = z_test(-1.3, 0.49).expect("valid");
    assert!((pos.statistic + neg.statistic).abs() < 1e-12);
    assert_eq!(pos.pvalue, neg.pvalue);
    assert_eq!(pos.chisq, neg.chisq);
    assert_eq!(pos.chisq_pvalue, neg.chisq_pvalue);
    assert!((0.0..=0.5).contains(&pos.pvalue));
    assert!((0.0..=1.0).contains(&pos.chisq_pvalue));
}

/// FALSIFY-HT-005: far-tail chi-square probabilities keep relative precision
#[test]
fn falsify_ht_005_chisq_far_tail_precision() {
    let p = chi_square_sf(80.0, 1).expect("valid");
    let expected = 3.744_097_384_202_880_6e-19;
    assert!(
        ((p - expected) / expected).abs() < 1e-8,
        "FALSIFIED HT-005: p={p}, expected {expected}"
    );

    let chi = chi_square_sf(81.0, 1).expect("valid");
    let two_sided = 2.0 * normal_sf(9.0);
    assert!(
        chi > 0.0 && ((chi - two_sided) / two_sided).abs() < 1e-8,
        "FALSIFIED HT-005: chi={chi}, normal={two_sided}"
    );
}

#[test]
fn test_z_test_rejects_degenerate_variance() {
    assert!(matches!(
        z_test(1.0, 0.0),
        Err(DifError::DegenerateVariance { .. })
    ));
    assert!(z_test(1.0, -0.5).is_err());
    assert!(z_test(1.0, f64::NAN).is_err());
    assert!(z_test(f64::INFINITY, 1.0).is_err());
}

#[test]
fn test_chi_square_sf_edges() {
    assert_eq!(chi_square_sf(0.0, 1).expect("valid"), 1.0);
    assert_eq!(chi_square_sf(-2.0, 1).expect("valid"), 1.0);
    assert!(chi_square_sf(1.0, 0).is_err());
    assert!(chi_square_sf(f64::NAN, 1).is_err());
    assert!(chi_square_sf(500.0, 1).expect("valid") < 1e-12);
}
