use super::*;

fn sample_table() -> ScoredTable {
    ScoredTable::new(
        vec![
            ("item1".to_string(), vec![1.0, 0.0, -9.0, 1.0]),
            ("raw".to_string(), vec![10.0, 4.0, 7.0, 9.0]),
            ("group".to_string(), vec![1.0, 2.0, 1.0, 3.0]),
        ],
        -9.0,
    )
    .expect("valid table")
}

#[test]
fn test_new_and_shape() {
    let table = sample_table();
    assert_eq!(table.shape(), (4, 3));
    assert_eq!(table.n_rows(), 4);
    assert_eq!(table.n_cols(), 3);
    assert_eq!(table.column_names(), vec!["item1", "raw", "group"]);
    assert_eq!(table.row_labels(), &["0", "1", "2", "3"]);
}

#[test]
fn test_new_rejects_bad_input() {
    assert!(ScoredTable::new(vec![], -9.0).is_err());

    let ragged = ScoredTable::new(
        vec![
            ("a".to_string(), vec![1.0, 2.0]),
            ("b".to_string(), vec![1.0]),
        ],
        -9.0,
    );
    assert!(matches!(ragged, Err(DifError::DimensionMismatch { .. })));

    let dup = ScoredTable::new(
        vec![("a".to_string(), vec![1.0]), ("a".to_string(), vec![2.0])],
        -9.0,
    );
    assert!(dup.is_err());

    let unnamed = ScoredTable::new(vec![(String::new(), vec![1.0])], -9.0);
    assert!(unnamed.is_err());
}

#[test]
fn test_column_not_found() {
    let table = sample_table();
    let err = table.column("nope").expect_err("missing column");
    assert!(matches!(err, DifError::ColumnNotFound { .. }));
}

#[test]
fn test_missing_detection() {
    let table = sample_table();
    assert_eq!(table.missing_value(), -9.0);
    assert!(table.is_missing(-9.0));
    assert!(table.is_missing(f64::NAN));
    assert!(!table.is_missing(0.0));
    assert_eq!(table.valid_count("item1").expect("exists"), 3);
}

#[test]
fn test_unique_values_sorted_without_missing() {
    let table = sample_table();
    assert_eq!(table.unique_values("item1").expect("exists"), vec![0.0, 1.0]);
    assert_eq!(
        table.unique_values("raw").expect("exists"),
        vec![4.0, 7.0, 9.0, 10.0]
    );
}

#[test]
fn test_extract_rows_keeps_order_and_labels() {
    let table = sample_table()
        .with_row_labels(vec!["s1".into(), "s2".into(), "s3".into(), "s4".into()])
        .expect("unique labels");

    let sub = table.extract_rows("group", &[1.0, 3.0]).expect("column exists");
    assert_eq!(sub.n_rows(), 3);
    assert_eq!(sub.row_labels(), &["s1", "s3", "s4"]);
    assert_eq!(sub.column("raw").expect("exists"), &[10.0, 7.0, 9.0]);
    assert_eq!(sub.missing_value(), -9.0);
}

#[test]
fn test_extract_rows_no_match_is_empty() {
    let sub = sample_table()
        .extract_rows("group", &[42.0])
        .expect("column exists");
    assert_eq!(sub.shape(), (0, 3));
}

#[test]
fn test_row_labels_validation() {
    let table = sample_table();
    assert!(table
        .clone()
        .with_row_labels(vec!["a".into(), "b".into()])
        .is_err());
    assert!(table
        .with_row_labels(vec!["a".into(), "a".into(), "b".into(), "c".into()])
        .is_err());
}

#[test]
fn test_cell_lookup() {
    let table = sample_table()
        .with_row_labels(vec!["s1".into(), "s2".into(), "s3".into(), "s4".into()])
        .expect("unique labels");
    assert_eq!(table.cell("s2", "raw").expect("exists"), 4.0);
    assert!(table.cell("s9", "raw").is_err());
    assert!(table.cell("s2", "nope").is_err());
}

#[test]
fn test_select_and_add_column() {
    let mut table = sample_table();
    let picked = table.select(&["raw"]).expect("exists");
    assert_eq!(picked.shape(), (4, 1));
    assert!(table.select(&[]).is_err());

    table
        .add_column("item2".into(), vec![2.0, 1.0, 0.0, 2.0])
        .expect("valid column");
    assert_eq!(table.n_cols(), 4);
    assert!(table.add_column("item2".into(), vec![0.0; 4]).is_err());
    assert!(table.add_column("item3".into(), vec![0.0; 3]).is_err());
}
