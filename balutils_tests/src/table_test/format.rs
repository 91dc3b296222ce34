use super::*;

#[test]
fn test_format_table_tab_separated() {
    let out = format_table(&sample(), None).unwrap();
    assert_eq!(out, "id\tscore\tname\n1\t0.5\ta\n2\t1.5\tb\n3\t2.5\tc");
}

#[test]
fn test_format_table_limit() {
    let out = format_table(&sample(), Some(1)).unwrap();
    assert_eq!(out, "id\tscore\tname\n1\t0.5\ta");
}

#[test]
fn test_format_table_empty_prints_header() {
    let table = sample().filter(&Mask::from(Vec::<usize>::new())).unwrap();
    assert_eq!(format_table(&table, None).unwrap(), "id\tscore\tname");
}

#[test]
fn test_format_table_nulls() {
    let table = Table::from_columns([(
        "v",
        Arc::new(Int64Array::from(vec![Some(1), None])) as ArrayRef,
    )])
    .unwrap();
    assert_eq!(format_table(&table, None).unwrap(), "v\n1\nnull");
}
