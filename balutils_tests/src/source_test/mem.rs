use super::*;

fn backend() -> MemBackend {
    let mut backend = MemBackend::new();
    let table = Table::from_columns([
        (BAL_ID, i64s(&[1, 2])),
        ("ra", f64s(&[0.1, 0.2])),
    ])
    .unwrap();
    backend.insert_table("det.fits", table);
    backend.insert_store("shape.h5", MemStore::new().with_array("a/x", i64s(&[5])));
    backend
}

#[test]
fn test_mem_reader_full_and_subset() {
    let backend = backend();
    let full = backend.read_table(Path::new("det.fits"), None).unwrap();
    assert_eq!(full.column_names(), vec!["bal_id", "ra"]);

    let columns = vec!["ra".to_string()];
    let subset = backend
        .read_table(Path::new("det.fits"), Some(columns.as_slice()))
        .unwrap();
    assert_eq!(subset.column_names(), vec!["ra"]);
    assert_eq!(subset.num_rows(), 2);
}

#[test]
fn test_mem_reader_missing_columns_and_source() {
    let backend = backend();
    let columns = vec!["x".to_string(), "ra".to_string(), "y".to_string()];
    match backend
        .read_table(Path::new("det.fits"), Some(columns.as_slice()))
        .unwrap_err()
    {
        CatalogError::MissingColumn { columns } => assert_eq!(columns, vec!["x", "y"]),
        other => panic!("unexpected error: {other}"),
    }
    let err = backend.read_table(Path::new("other.fits"), None).unwrap_err();
    assert!(matches!(err, CatalogError::SourceNotFound(_)));
}

#[test]
fn test_mem_opener_shares_release_counter() {
    let backend = backend();
    let store = backend.open(Path::new("shape.h5")).unwrap();
    assert!(store.contains("a/x"));
    assert!(!store.contains("a/y"));
    store.close().unwrap();
    assert_eq!(backend.store(Path::new("shape.h5")).unwrap().release_count(), 1);
    assert!(backend.open(Path::new("nope.h5")).is_err());
}
