// =========================================================================
// FALSIFY-DS: descriptive statistics contract (difstat stats)
// =========================================================================

use super::*;

/// FALSIFY-DS-001: Empty or single-value input has no sample spread
#[test]
fn falsify_ds_001_small_inputs() {
    assert_eq!(mean(&[]), None);
    assert_eq!(sample_variance(&[3.0]), None);
    assert_eq!(sample_std(&[]), None);
    assert_eq!(mean(&[3.0]), Some(3.0));
}

/// FALSIFY-DS-002: Constant data has zero spread
#[test]
fn falsify_ds_002_constant_zero_std() {
    let sd = sample_std(&[2.0, 2.0, 2.0, 2.0]).expect("four values");
    assert_eq!(sd, 0.0, "FALSIFIED DS-002: sd={sd} for constant data");
}

/// FALSIFY-DS-003: Bessel correction
#[test]
fn falsify_ds_003_bessel_correction() {
    // Σ(x - 2.5)² = 5 over four values → 5/3
    let var = sample_variance(&[1.0, 2.0, 3.0, 4.0]).expect("four values");
    assert!((var - 5.0 / 3.0).abs() < 1e-12, "FALSIFIED DS-003: var={var}");
}

mod ds_proptest_falsify {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// FALSIFY-DS-004-prop: standard deviation is shift invariant
        #[test]
        fn falsify_ds_004_prop_shift_invariant(
            data in proptest::collection::vec(0u8..5, 2..40),
            shift in -10.0f64..10.0,
        ) {
            let values: Vec<f64> = data.iter().map(|&v| f64::from(v)).collect();
            let shifted: Vec<f64> = values.iter().map(|v| v + shift).collect();
            let a = sample_std(&values).expect("two or more");
            let b = sample_std(&shifted).expect("two or more");
            prop_assert!((a - b).abs() < 1e-9, "FALSIFIED DS-004-prop: {} vs {}", a, b);
        }
    }
}
