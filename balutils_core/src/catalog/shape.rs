use std::path::PathBuf;
use std::sync::Arc;

use arrow::array::BooleanArray;

use crate::catalog::{Catalog, CutPolicy, DEFAULT_ZERO_POINT, magnitudes};
use crate::error::{CatalogError, Result};
use crate::source::{HierarchicalStore, StoreHandle, StoreOpener, store_path};
use crate::table::{CompareOp, Table, all_of, compare, ratio};

/// Group holding the unsheared measurements in shear-calibration outputs
pub const DEFAULT_SHAPE_PATH: &str = "catalog/unsheared";

const MIN_SIZE_RATIO: f64 = 0.5;
const MIN_SNR: f64 = 10.0;
const MAX_SNR: f64 = 100.0;

/// Shape-quality selection:
/// `flags == 0 && T / psf_T > 0.5 && 10 < snr < 100`, all strict
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeSelector;

impl CutPolicy for ShapeSelector {
    fn name(&self) -> &str {
        "shape"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec!["flags", "T", "psf_T", "snr"]
    }

    fn mask(&self, table: &Table) -> Result<BooleanArray> {
        let size_ratio = ratio(&table.float_column("T")?, &table.float_column("psf_T")?);
        let snr = table.float_column("snr")?;
        all_of(&[
            compare(&table.float_column("flags")?, CompareOp::Eq, 0.0),
            compare(&size_ratio, CompareOp::Gt, MIN_SIZE_RATIO),
            compare(&snr, CompareOp::Gt, MIN_SNR),
            compare(&snr, CompareOp::Lt, MAX_SNR),
        ])
    }
}

/// Shear/shape-measurement catalog read column by column from a hierarchical store.
///
/// The store stays open for the catalog's lifetime so columns can be added
/// later; it is released by `close` or when the catalog is dropped.
#[derive(Debug)]
pub struct ShapeCatalog<S: HierarchicalStore> {
    catalog: Catalog,
    base_path: String,
    store: StoreHandle<S>,
}

impl<S: HierarchicalStore> ShapeCatalog<S> {
    pub fn load<O>(
        opener: &O,
        source: impl Into<PathBuf>,
        base_path: impl Into<String>,
        columns: Option<Vec<String>>,
    ) -> Result<Self>
    where
        O: StoreOpener<Store = S> + ?Sized,
    {
        let source = source.into();
        let store = opener.open(&source)?;
        Self::from_store(store, source, base_path, columns)
    }

    /// Loads `columns` from an already open store, then derives magnitudes.
    /// Without `columns` the table starts with no columns at all.
    pub fn from_store(
        store: S,
        source: impl Into<PathBuf>,
        base_path: impl Into<String>,
        columns: Option<Vec<String>>,
    ) -> Result<Self> {
        // Owned by the handle from here on, so early returns still release it.
        let store = StoreHandle::new(store);
        let source = source.into();
        let base_path = base_path.into();

        let mut table = Table::empty();
        for name in columns.iter().flatten() {
            let array = store.store()?.read_array(&store_path(&base_path, name))?;
            table.set_column(name.clone(), array)?;
        }
        tracing::info!(
            source = %source.display(),
            base_path = %base_path,
            rows = table.num_rows(),
            columns = table.num_columns(),
            "loaded shape catalog"
        );

        let mut shape = Self {
            catalog: Catalog::new(source, columns, table),
            base_path,
            store,
        };
        shape.calc_mags()?;
        Ok(shape)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn row_count(&self) -> usize {
        self.catalog.row_count()
    }

    /// Reads one more column from the open store
    pub fn add_col(&mut self, name: &str) -> Result<()> {
        let store = self.store.store()?;
        let path = store_path(&self.base_path, name);
        if !store.contains(&path) {
            return Err(CatalogError::missing([path]));
        }
        let array = store.read_array(&path)?;
        self.catalog.set_column(name, array)
    }

    pub fn delete_col(&mut self, name: &str) -> Result<()> {
        self.catalog.delete_column(name)?;
        Ok(())
    }

    /// Adds a `mag_<band>` column for every flux column, returning the names created.
    ///
    /// The band is the last character of the flux column's name. When a
    /// `flux_<band>` column exists it is the source for that band, so error and
    /// covariance columns never overwrite the magnitude.
    pub fn calc_mags(&mut self) -> Result<Vec<String>> {
        let mut created: Vec<String> = Vec::new();
        for name in self.catalog.column_names() {
            if !name.to_lowercase().contains("flux") {
                continue;
            }
            let Some(band) = name.chars().last() else {
                continue;
            };
            let mag_name = format!("mag_{band}");
            if created.contains(&mag_name) {
                continue;
            }

            let canonical = format!("flux_{band}");
            let flux_name = if self.catalog.has_column(&canonical) {
                canonical
            } else {
                name
            };
            let flux = self.catalog.table().float_column(&flux_name)?;
            let mags = magnitudes(&flux, DEFAULT_ZERO_POINT);
            self.catalog.set_column(mag_name.clone(), Arc::new(mags))?;
            tracing::debug!(flux = %flux_name, mag = %mag_name, "derived magnitude column");
            created.push(mag_name);
        }
        Ok(created)
    }

    pub fn apply_shape_cuts(&mut self) -> Result<()> {
        self.catalog.apply_policy(&ShapeSelector)
    }

    /// Releases the store and hands back the loaded catalog
    pub fn close(self) -> Result<Catalog> {
        let Self { catalog, store, .. } = self;
        store.close()?;
        Ok(catalog)
    }
}
