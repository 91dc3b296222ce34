use arrow::array::{Array, ArrayRef, AsArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{Float64Type, Int64Type};
use balutils_core::catalog::DEFAULT_SHAPE_PATH;
use balutils_core::source::{MemBackend, MemStore};
use balutils_core::table::Mask;
use balutils_core::{
    BAL_ID, Catalog, CatalogError, CutPolicy, DetectionCatalog, GoldCatalog, GoldSelector,
    GoldVariant, JoinOptions, JoinedCatalog, ShapeCatalog, ShapeSelector, Table,
    flux_to_magnitude,
};
use std::path::Path;
use std::sync::Arc;

const SHAPE_SOURCE: &str = "mcal/shape.h5";
const DETECTION_SOURCE: &str = "balrog/det.fits";

fn i64s(values: &[i64]) -> ArrayRef {
    Arc::new(Int64Array::from(values.to_vec()))
}

fn f64s(values: &[f64]) -> ArrayRef {
    Arc::new(Float64Array::from(values.to_vec()))
}

fn ints(catalog: &Catalog, name: &str) -> Vec<Option<i64>> {
    catalog
        .get_column(name)
        .unwrap()
        .as_primitive::<Int64Type>()
        .iter()
        .collect()
}

fn floats(catalog: &Catalog, name: &str) -> Vec<Option<f64>> {
    catalog
        .get_column(name)
        .unwrap()
        .as_primitive::<Float64Type>()
        .iter()
        .collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn missing_columns(err: CatalogError) -> Vec<String> {
    match err {
        CatalogError::MissingColumn { columns } => columns,
        other => panic!("expected missing column error, got: {other}"),
    }
}

/// Five detections with bal_id 1..=5.
///
/// Default gold keeps ids 1 and 4, mof_only keeps 4, sof_only keeps 1.
fn gold_table() -> Table {
    Table::from_columns([
        (BAL_ID, i64s(&[1, 2, 3, 4, 5])),
        ("flags_foreground", i64s(&[0, 1, 0, 0, 0])),
        ("flags_badregions", i64s(&[0, 0, 2, 1, 0])),
        ("flags_footprint", i64s(&[1, 1, 1, 1, 0])),
        ("meas_FLAGS_GOLD", i64s(&[0, 0, 0, 1, 0])),
        ("meas_FLAGS_GOLD_MOF_ONLY", i64s(&[3, 0, 0, 0, 0])),
        ("meas_FLAGS_GOLD_SOF_ONLY", i64s(&[0, 0, 0, 2, 0])),
    ])
    .unwrap()
}

/// `bal_id` plus `det_val` counting 10, 20, 30... in row order
fn id_table(ids: &[i64]) -> Table {
    let vals: Vec<i64> = (1..=ids.len() as i64).map(|v| v * 10).collect();
    Table::from_columns([(BAL_ID, i64s(ids)), ("det_val", i64s(&vals))]).unwrap()
}

fn shape_columns() -> Vec<String> {
    ["bal_id", "flags", "T", "psf_T", "snr", "flux_r", "flux_g"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Five shape rows with bal_id 1..=5 under `catalog/unsheared`.
///
/// Only id 1 passes the shape cuts: id 2 is too small, id 3 is flagged,
/// id 4 sits exactly on the size boundary and id 5 on the upper snr bound.
fn shape_store() -> MemStore {
    let base = DEFAULT_SHAPE_PATH;
    MemStore::new()
        .with_array(format!("{base}/bal_id"), i64s(&[1, 2, 3, 4, 5]))
        .with_array(format!("{base}/flags"), i64s(&[0, 0, 1, 0, 0]))
        .with_array(format!("{base}/T"), f64s(&[1.0, 0.4, 1.0, 1.0, 1.0]))
        .with_array(format!("{base}/psf_T"), f64s(&[1.0, 1.0, 1.0, 2.0, 1.0]))
        .with_array(format!("{base}/snr"), f64s(&[50.0, 50.0, 50.0, 50.0, 100.0]))
        .with_array(
            format!("{base}/flux_r"),
            f64s(&[1000.0, 100.0, 10.0, 1.0, 0.0]),
        )
        .with_array(format!("{base}/flux_g"), f64s(&[1.0; 5]))
        .with_array(format!("{base}/flux_err_r"), f64s(&[0.1; 5]))
}

/// Shape store at SHAPE_SOURCE and a three-row detection table (ids 2, 4, 6)
/// at DETECTION_SOURCE
fn backend() -> MemBackend {
    let mut backend = MemBackend::new();
    backend.insert_store(SHAPE_SOURCE, shape_store());
    let detection = Table::from_columns([
        (BAL_ID, i64s(&[2, 4, 6])),
        ("flags_foreground", i64s(&[0, 0, 0])),
        ("flags_badregions", i64s(&[0, 0, 0])),
        ("flags_footprint", i64s(&[1, 1, 1])),
        ("meas_FLAGS_GOLD", i64s(&[0, 3, 0])),
        ("ra", f64s(&[20.0, 40.0, 60.0])),
    ])
    .unwrap();
    backend.insert_table(DETECTION_SOURCE, detection);
    backend
}

fn release_count(backend: &MemBackend) -> usize {
    backend
        .store(Path::new(SHAPE_SOURCE))
        .unwrap()
        .release_count()
}
