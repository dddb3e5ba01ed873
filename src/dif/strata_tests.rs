use super::*;

#[test]
fn test_even_split() {
    let idx = stratum_indices(6, StrataSpec::Count(3)).expect("valid");
    assert_eq!(idx, vec![0, 0, 1, 1, 2, 2]);
}

#[test]
fn test_lowest_stratum_absorbs_remainder() {
    let idx = stratum_indices(10, StrataSpec::Count(3)).expect("valid");
    // interval 3, remainder 1
    assert_eq!(idx, vec![0, 0, 0, 0, 1, 1, 1, 2, 2, 2]);
}

#[test]
fn test_single_stratum() {
    let idx = stratum_indices(5, StrataSpec::Count(1)).expect("valid");
    assert_eq!(idx, vec![0; 5]);
}

#[test]
fn test_fewer_scores_than_strata() {
    // interval 0, remainder 3: the lowest stratum absorbs every score
    let idx = stratum_indices(3, StrataSpec::Count(10)).expect("valid");
    assert_eq!(idx, vec![0, 0, 0]);

    let idx = stratum_indices(19, StrataSpec::Count(20)).expect("valid");
    assert_eq!(idx, vec![0; 19]);
}

#[test]
fn test_assignment_fewer_scores_than_strata() {
    let assignment = StratumAssignment::new(&[4.0, 1.0, 2.0, 4.0], StrataSpec::Count(10))
        .expect("valid");
    assert_eq!(assignment.n_strata(), 1);
    assert_eq!(assignment.scores_in(0), vec![1.0, 2.0, 4.0]);
    assert_eq!(assignment.stratum_of(4.0), Some(0));
}

#[test]
fn test_zero_unique_scores() {
    assert!(stratum_indices(0, StrataSpec::Count(4))
        .expect("valid")
        .is_empty());
    assert!(stratum_indices(0, StrataSpec::AllScores)
        .expect("valid")
        .is_empty());
}

#[test]
fn test_zero_strata_rejected() {
    let err = stratum_indices(5, StrataSpec::Count(0)).expect_err("invalid");
    assert!(matches!(err, DifError::InvalidParameter { .. }));
}

#[test]
fn test_assignment_lookup() {
    let raw = [12.0, 3.0, 7.0, 3.0, 9.0, 15.0, 7.0];
    let assignment = StratumAssignment::new(&raw, StrataSpec::Count(2)).expect("valid");

    assert_eq!(assignment.scores(), &[3.0, 7.0, 9.0, 12.0, 15.0]);
    assert_eq!(assignment.indices(), &[0, 0, 0, 1, 1]);
    assert_eq!(assignment.n_strata(), 2);
    assert_eq!(assignment.stratum_of(9.0), Some(0));
    assert_eq!(assignment.stratum_of(15.0), Some(1));
    assert_eq!(assignment.stratum_of(4.0), None);
    assert_eq!(assignment.scores_in(1), vec![12.0, 15.0]);
}

#[test]
fn test_assignment_all_scores() {
    let assignment =
        StratumAssignment::new(&[2.0, 1.0, 2.0, 5.0], StrataSpec::AllScores).expect("valid");
    assert_eq!(assignment.n_strata(), 3);
    assert_eq!(assignment.stratum_of(5.0), Some(2));
}

#[test]
fn test_spec_parse_and_display() {
    assert_eq!("all_scores".parse::<StrataSpec>().expect("valid"), StrataSpec::AllScores);
    assert_eq!(" 12 ".parse::<StrataSpec>().expect("valid"), StrataSpec::Count(12));
    assert!("twelve".parse::<StrataSpec>().is_err());
    assert_eq!(StrataSpec::Count(7).to_string(), "7");
    assert_eq!(StrataSpec::AllScores.to_string(), "all_scores");
}

#[test]
fn test_spec_serde() {
    let json = serde_json::to_string(&StrataSpec::AllScores).expect("serialize");
    assert_eq!(json, "\"all_scores\"");
    let json = serde_json::to_string(&StrataSpec::Count(5)).expect("serialize");
    assert_eq!(json, "5");

    let parsed: StrataSpec = serde_json::from_str("\"all_scores\"").expect("deserialize");
    assert_eq!(parsed, StrataSpec::AllScores);
    let parsed: StrataSpec = serde_json::from_str("8").expect("deserialize");
    assert_eq!(parsed, StrataSpec::Count(8));
    assert!(serde_json::from_str::<StrataSpec>("\"some\"").is_err());
}

mod strata_proptest_falsify {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// FALSIFY-ST-001-prop: U entries, values in [0, S), non-decreasing,
        /// lowest bin size in [interval, interval + U mod S]
        #[test]
        fn falsify_st_001_prop_partition_shape(u in 0usize..200, s in 1usize..40) {
            let idx = stratum_indices(u, StrataSpec::Count(s)).expect("valid");

            prop_assert_eq!(idx.len(), u);
            prop_assert!(idx.iter().all(|&i| i < s));
            prop_assert!(idx.windows(2).all(|w| w[0] <= w[1]));

            let interval = u / s;
            let lowest = idx.iter().filter(|&&i| i == 0).count();
            prop_assert!(lowest >= interval && lowest <= interval + u % s);
            for stratum in 1..s {
                prop_assert_eq!(idx.iter().filter(|&&i| i == stratum).count(), interval);
            }
        }
    }
}
