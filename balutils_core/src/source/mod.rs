pub mod mem;
pub mod parquet;
#[cfg(feature = "fits")]
pub mod fits;
#[cfg(feature = "hdf5")]
pub mod h5;

use std::path::Path;

use arrow::array::ArrayRef;

use crate::error::{CatalogError, Result};
use crate::table::Table;

// Re-export main types for convenience
pub use mem::{MemBackend, MemStore};
pub use self::parquet::{ParquetReader, ParquetStore, ParquetStoreOpener};
#[cfg(feature = "fits")]
pub use fits::FitsReader;
#[cfg(feature = "hdf5")]
pub use h5::{H5Opener, H5Store};

/// Reader for flat binary tables (one table per source)
pub trait ColumnarReader {
    /// Reads `columns` from `source`, or every column when `columns` is None.
    /// A requested column missing from the source is a `MissingColumn` error.
    fn read_table(&self, source: &Path, columns: Option<&[String]>) -> Result<Table>;
}

/// An open, path-addressed store of named one-dimensional arrays
pub trait HierarchicalStore {
    fn read_array(&self, path: &str) -> Result<ArrayRef>;

    fn contains(&self, path: &str) -> bool;

    /// Releases the underlying resource
    fn close(self) -> Result<()>;
}

/// Opens hierarchical stores by source path
pub trait StoreOpener {
    type Store: HierarchicalStore;

    fn open(&self, source: &Path) -> Result<Self::Store>;
}

/// Owns an open store and releases it exactly once: on `close`, or on drop
/// when never closed explicitly.
#[derive(Debug)]
pub struct StoreHandle<S: HierarchicalStore> {
    store: Option<S>,
}

impl<S: HierarchicalStore> StoreHandle<S> {
    pub fn new(store: S) -> Self {
        Self { store: Some(store) }
    }

    pub fn store(&self) -> Result<&S> {
        self.store.as_ref().ok_or(CatalogError::StoreClosed)
    }

    pub fn close(mut self) -> Result<()> {
        match self.store.take() {
            Some(store) => store.close(),
            None => Ok(()),
        }
    }
}

impl<S: HierarchicalStore> Drop for StoreHandle<S> {
    fn drop(&mut self) {
        if let Some(store) = self.store.take()
            && let Err(e) = store.close()
        {
            tracing::warn!(error = %e, "failed to close store on drop");
        }
    }
}

/// Joins a store base path and a column name with '/'
pub fn store_path(base: &str, name: &str) -> String {
    if base.is_empty() || name.starts_with('/') {
        return name.to_string();
    }
    if base.ends_with('/') {
        format!("{base}{name}")
    } else {
        format!("{base}/{name}")
    }
}
