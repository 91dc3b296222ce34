use super::*;

#[test]
fn test_from_columns_keeps_order() {
    let table = sample();
    assert_eq!(table.num_rows(), 3);
    assert_eq!(table.num_columns(), 3);
    assert_eq!(table.column_names(), vec!["id", "score", "name"]);
    assert!(table.has_column("score"));
    assert!(!table.has_column("missing"));
}

#[test]
fn test_empty_table() {
    let table = Table::empty();
    assert_eq!(table.num_rows(), 0);
    assert_eq!(table.num_columns(), 0);
    assert!(table.is_empty());
    assert!(table.column_names().is_empty());
}

#[test]
fn test_column_missing_errors() {
    let table = sample();
    match table.column("nope").unwrap_err() {
        CatalogError::MissingColumn { columns } => assert_eq!(columns, vec!["nope"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_set_column_length_mismatch() {
    let mut table = sample();
    let err = table.set_column("extra", i64s(&[1, 2])).unwrap_err();
    match err {
        CatalogError::LengthMismatch {
            column,
            expected,
            actual,
        } => {
            assert_eq!(column, "extra");
            assert_eq!(expected, 3);
            assert_eq!(actual, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(table.num_columns(), 3);
}

#[test]
fn test_set_column_replaces_in_place() {
    let mut table = sample();
    table.set_column("id", i64s(&[7, 8, 9])).unwrap();
    assert_eq!(table.column_names(), vec!["id", "score", "name"]);
    assert_eq!(ints(&table, "id"), vec![Some(7), Some(8), Some(9)]);
}

#[test]
fn test_set_column_may_change_type() {
    let mut table = sample();
    table.set_column("id", f64s(&[1.0, 2.0, 3.0])).unwrap();
    assert_eq!(floats(&table, "id"), vec![Some(1.0), Some(2.0), Some(3.0)]);
}

#[test]
fn test_remove_column_returns_data() {
    let mut table = sample();
    let removed = table.remove_column("score").unwrap();
    assert_eq!(removed.len(), 3);
    assert_eq!(table.column_names(), vec!["id", "name"]);
    assert!(table.remove_column("score").is_err());
}

#[test]
fn test_remove_last_column_keeps_row_count() {
    let mut table = Table::from_columns([("id", i64s(&[1, 2, 3]))]).unwrap();
    table.remove_column("id").unwrap();
    assert_eq!(table.num_columns(), 0);
    assert_eq!(table.num_rows(), 3);
}

#[test]
fn test_filter_boolean_mask() {
    let table = sample();
    let out = table.filter(&Mask::from(vec![true, false, true])).unwrap();
    assert_eq!(ints(&out, "id"), vec![Some(1), Some(3)]);
    assert_eq!(out.column_names(), table.column_names());
}

#[test]
fn test_filter_null_mask_entries_are_dropped() {
    let table = sample();
    let mask = BooleanArray::from(vec![Some(true), None, Some(false)]);
    let out = table.filter(&Mask::Boolean(mask)).unwrap();
    assert_eq!(ints(&out, "id"), vec![Some(1)]);
}

#[test]
fn test_filter_selecting_nothing() {
    let table = sample();
    let out = table.filter(&Mask::from(vec![false, false, false])).unwrap();
    assert_eq!(out.num_rows(), 0);
    assert_eq!(out.num_columns(), 3);
}

#[test]
fn test_filter_mask_length_mismatch() {
    let table = sample();
    match table.filter(&Mask::from(vec![true, false])).unwrap_err() {
        CatalogError::MaskLength { expected, actual } => {
            assert_eq!(expected, 3);
            assert_eq!(actual, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_filter_indices_in_given_order() {
    let table = sample();
    let out = table.filter(&Mask::from(vec![2usize, 0])).unwrap();
    assert_eq!(ints(&out, "id"), vec![Some(3), Some(1)]);
}

#[test]
fn test_filter_index_out_of_bounds() {
    let table = sample();
    match table.filter(&Mask::from(vec![0usize, 3])).unwrap_err() {
        CatalogError::IndexOutOfBounds { index, rows } => {
            assert_eq!(index, 3);
            assert_eq!(rows, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_filter_zero_column_table_counts_rows() {
    let mut table = Table::from_columns([("id", i64s(&[1, 2, 3]))]).unwrap();
    table.remove_column("id").unwrap();
    let out = table.filter(&Mask::from(vec![true, false, true])).unwrap();
    assert_eq!(out.num_rows(), 2);
}

#[test]
fn test_remove_rows_preserves_order() {
    let table = sample();
    let out = table.remove_rows(&[1]).unwrap();
    assert_eq!(ints(&out, "id"), vec![Some(1), Some(3)]);
    assert!(table.remove_rows(&[5]).is_err());
}

#[test]
fn test_mask_selected_counts() {
    assert_eq!(Mask::from(vec![true, false, true]).selected(), 2);
    assert_eq!(Mask::from(vec![4usize, 1, 1]).selected(), 3);
}
