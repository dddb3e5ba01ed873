use super::*;

fn names(resolved: &ResolvedStatistics) -> Vec<&'static str> {
    resolved.columns().iter().map(|s| s.name()).collect()
}

#[test]
fn test_name_round_trip() {
    for stat in Statistic::ALL {
        let parsed: Statistic = stat.name().parse().expect("catalogue name");
        assert_eq!(parsed, stat);
        assert_eq!(stat.to_string(), stat.name());
    }
}

#[test]
fn test_serde_uses_report_names() {
    let json = serde_json::to_string(&Statistic::MhDDif).expect("serialize");
    assert_eq!(json, "\"MH_d-dif\"");
    let back: Statistic = serde_json::from_str("\"SMD/SD\"").expect("deserialize");
    assert_eq!(back, Statistic::SmdOverSd);
}

#[test]
fn test_unknown_name() {
    let err = "MH_bogus".parse::<Statistic>().expect_err("unknown");
    assert!(matches!(err, DifError::UnknownStatistic { ref name } if name == "MH_bogus"));
    // Counts is a request shorthand, not a column
    assert!("Counts".parse::<Statistic>().is_err());
    assert_eq!("Counts".parse::<StatRequest>().expect("shorthand"), StatRequest::Counts);
}

#[test]
fn test_family_and_applicability() {
    assert_eq!(Statistic::MhChisqPval.family(), Family::MantelHaenszel);
    assert_eq!(Statistic::SmdOverSd.family(), Family::Smd);
    assert_eq!(Statistic::MZ.family(), Family::Mantel);
    assert_eq!(Statistic::CountAll.family(), Family::Descriptive);
    assert_eq!(Statistic::Flag.family(), Family::Composite);

    assert!(Statistic::MhAlpha.applies_to(2));
    assert!(Statistic::MhAlpha.applies_to(1));
    assert!(!Statistic::MhAlpha.applies_to(3));
    assert!(!Statistic::SmdDif.applies_to(2));
    assert!(Statistic::SmdDif.applies_to(5));
    assert!(Statistic::MDif.applies_to(2) && Statistic::MDif.applies_to(4));
    assert!(Statistic::Sd.applies_to(2) && Statistic::Flag.applies_to(4));
}

#[test]
fn test_flag_expansion() {
    let resolved = resolve_statistics(&["Flag"]).expect("known");
    assert_eq!(
        names(&resolved),
        [
            "Flag",
            "MH_d-dif",
            "MH_var",
            "MH_pval",
            "SMD_dif",
            "SD",
            "SMD/SD",
            "M_chisq_pval"
        ]
    );
}

#[test]
fn test_counts_replaced_in_place() {
    let resolved = resolve_statistics(&["M_dif", "Counts", "SD"]).expect("known");
    assert_eq!(
        names(&resolved),
        ["M_dif", "Count_Ref", "Count_Focal", "Count_All", "SD"]
    );
    assert!(!resolved.columns().iter().any(|s| s.name() == "Counts"));
}

#[test]
fn test_duplicates_removed_request_order_kept() {
    let resolved = resolve_statistics(&["SD", "MH_alpha", "SD", "Flag", "MH_var"]).expect("known");
    assert_eq!(
        names(&resolved),
        [
            "SD",
            "MH_alpha",
            "Flag",
            "MH_var",
            "MH_d-dif",
            "MH_pval",
            "SMD_dif",
            "SMD/SD",
            "M_chisq_pval"
        ]
    );
}

#[test]
fn test_applicable_per_class() {
    let resolved = resolve_statistics(&["Flag", "Counts"]).expect("known");
    let dichotomous = resolved.applicable(Cardinality::Dichotomous);
    let polytomous = resolved.applicable(Cardinality::Polytomous);

    assert!(dichotomous.contains(&Statistic::MhVar));
    assert!(!dichotomous.contains(&Statistic::SmdDif));
    assert!(!dichotomous.contains(&Statistic::SmdOverSd));
    assert!(polytomous.contains(&Statistic::SmdOverSd));
    assert!(!polytomous.iter().any(|s| s.family() == Family::MantelHaenszel));
    for class in [dichotomous, polytomous] {
        assert!(class.contains(&Statistic::Flag));
        assert!(class.contains(&Statistic::CountAll));
        assert!(class.contains(&Statistic::MChisqPval));
    }

    assert!(resolved.needs_family(Cardinality::Dichotomous, Family::MantelHaenszel));
    assert!(!resolved.needs_family(Cardinality::Polytomous, Family::MantelHaenszel));
    assert!(resolved.contains(Statistic::Sd));
    assert!(!resolved.contains(Statistic::MhAlpha));
}

#[test]
fn test_resolve_errors() {
    let empty: [&str; 0] = [];
    let err = resolve_statistics(&empty).expect_err("empty request");
    assert!(err.is_configuration());

    let err = resolve_statistics(&["Flag", "nope"]).expect_err("unknown");
    assert!(matches!(err, DifError::UnknownStatistic { .. }));
}

#[test]
fn test_resolve_accepts_owned_names() {
    let request = vec!["SMD/SD".to_string(), " M_z ".to_string()];
    let resolved = resolve_statistics(&request).expect("known");
    assert_eq!(names(&resolved), ["SMD/SD", "M_z", "SMD_dif", "SD"]);
}
