use super::*;

#[test]
fn test_new_uses_defaults() {
    let options = JoinOptions::new("shape.h5", "det.fits");
    assert_eq!(options.shape_path, "catalog/unsheared");
    assert_eq!(options.match_type, "default");
    assert!(options.shape_columns.is_none());
    assert!(options.detection_columns.is_none());
    assert!(!options.save_all);
}

#[test]
fn test_builders_set_fields() {
    let options = JoinOptions::new("shape.h5", "det.fits")
        .with_shape_columns(["bal_id", "snr"])
        .with_detection_columns(vec!["bal_id".to_string()])
        .with_shape_path("catalog/sheared_1p")
        .with_match_type("sof_only")
        .with_save_all(true);
    assert_eq!(
        options.shape_columns,
        Some(vec!["bal_id".to_string(), "snr".to_string()])
    );
    assert_eq!(options.detection_columns, Some(vec!["bal_id".to_string()]));
    assert_eq!(options.shape_path, "catalog/sheared_1p");
    assert_eq!(options.match_type, "sof_only");
    assert!(options.save_all);
}

#[test]
fn test_load_minimal_json_fills_defaults() {
    let dir = temp_dir("minimal");
    let path = dir.join("join.json");
    let body = serde_json::json!({
        "shape_source": "mcal.h5",
        "detection_source": "det.fits",
    });
    std::fs::write(&path, body.to_string()).unwrap();

    let options = JoinOptions::load_from_path(&path).unwrap();
    assert_eq!(options, JoinOptions::new("mcal.h5", "det.fits"));
}

#[test]
fn test_load_full_json() {
    let dir = temp_dir("full");
    let path = dir.join("join.json");
    let options = JoinOptions::new("mcal.h5", "det.fits")
        .with_shape_columns(["bal_id", "flux_r"])
        .with_match_type("mof_only")
        .with_save_all(true);
    std::fs::write(&path, serde_json::to_string(&options).unwrap()).unwrap();

    let loaded = JoinOptions::load_from_path(&path).unwrap();
    assert_eq!(loaded, options);
    assert_eq!(
        loaded.shape_columns,
        Some(vec!["bal_id".to_string(), "flux_r".to_string()])
    );
}

#[test]
fn test_load_missing_file() {
    let dir = temp_dir("missing");
    let err = JoinOptions::load_from_path(&dir.join("absent.json")).unwrap_err();
    assert!(config_message(err).contains("does not exist"));
}

#[test]
fn test_load_empty_file() {
    let dir = temp_dir("empty");
    let path = dir.join("join.json");
    std::fs::write(&path, "  \n").unwrap();
    let err = JoinOptions::load_from_path(&path).unwrap_err();
    assert!(config_message(err).contains("is empty"));
}

#[test]
fn test_load_malformed_json() {
    let dir = temp_dir("malformed");
    let path = dir.join("join.json");
    std::fs::write(&path, "{ \"shape_source\": ").unwrap();
    let err = JoinOptions::load_from_path(&path).unwrap_err();
    assert!(config_message(err).contains("malformed"));
}

#[test]
fn test_load_requires_sources() {
    let dir = temp_dir("nosource");
    let path = dir.join("join.json");
    std::fs::write(&path, r#"{"shape_source": "mcal.h5"}"#).unwrap();
    assert!(JoinOptions::load_from_path(&path).is_err());
}
