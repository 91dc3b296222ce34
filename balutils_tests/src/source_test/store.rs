use super::*;

#[test]
fn test_store_path_joins_with_slash() {
    assert_eq!(store_path("catalog/unsheared", "snr"), "catalog/unsheared/snr");
    assert_eq!(store_path("catalog/unsheared/", "snr"), "catalog/unsheared/snr");
    assert_eq!(store_path("", "snr"), "snr");
    assert_eq!(store_path("catalog", "/abs/snr"), "/abs/snr");
}

#[test]
fn test_handle_close_releases_once() {
    let store = MemStore::new();
    let handle = StoreHandle::new(store.clone());
    assert!(handle.store().is_ok());
    handle.close().unwrap();
    assert_eq!(store.release_count(), 1);
}

#[test]
fn test_handle_drop_releases() {
    let store = MemStore::new();
    {
        let handle = StoreHandle::new(store.clone());
        assert!(handle.store().is_ok());
        assert_eq!(store.release_count(), 0);
    }
    assert_eq!(store.release_count(), 1);
}

#[test]
fn test_handle_reads_through_store() {
    let store = MemStore::new().with_array("g/v", i64s(&[1, 2, 3]));
    let handle = StoreHandle::new(store);
    let array = handle.store().unwrap().read_array("g/v").unwrap();
    assert_eq!(array.len(), 3);
}
