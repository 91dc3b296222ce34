use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use arrow::array::ArrayRef;

use crate::error::{CatalogError, Result};
use crate::source::{ColumnarReader, HierarchicalStore, StoreOpener};
use crate::table::Table;

/// In-memory hierarchical store.
///
/// Clones share one release counter, so the number of times any copy was
/// closed stays observable after the copy handed to a catalog is gone.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    arrays: HashMap<String, ArrayRef>,
    releases: Rc<Cell<usize>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_array(mut self, path: impl Into<String>, array: ArrayRef) -> Self {
        self.insert(path, array);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, array: ArrayRef) {
        self.arrays.insert(path.into(), array);
    }

    /// How many times this store (or a clone of it) has been closed
    pub fn release_count(&self) -> usize {
        self.releases.get()
    }
}

impl HierarchicalStore for MemStore {
    fn read_array(&self, path: &str) -> Result<ArrayRef> {
        self.arrays
            .get(path)
            .cloned()
            .ok_or_else(|| CatalogError::missing([path]))
    }

    fn contains(&self, path: &str) -> bool {
        self.arrays.contains_key(path)
    }

    fn close(self) -> Result<()> {
        self.releases.set(self.releases.get() + 1);
        Ok(())
    }
}

/// In-memory data sources keyed by path, serving both flat tables and stores
#[derive(Debug, Default)]
pub struct MemBackend {
    tables: HashMap<PathBuf, Table>,
    stores: HashMap<PathBuf, MemStore>,
}

impl MemBackend {
    /// Creates a new empty in-memory backend
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_table(&mut self, source: impl Into<PathBuf>, table: Table) {
        self.tables.insert(source.into(), table);
    }

    pub fn insert_store(&mut self, source: impl Into<PathBuf>, store: MemStore) {
        self.stores.insert(source.into(), store);
    }

    pub fn store(&self, source: &Path) -> Option<&MemStore> {
        self.stores.get(source)
    }
}

impl ColumnarReader for MemBackend {
    fn read_table(&self, source: &Path, columns: Option<&[String]>) -> Result<Table> {
        let table = self
            .tables
            .get(source)
            .ok_or_else(|| CatalogError::SourceNotFound(source.to_path_buf()))?;
        let Some(columns) = columns else {
            return Ok(table.clone());
        };

        let missing: Vec<&String> = columns.iter().filter(|c| !table.has_column(c)).collect();
        if !missing.is_empty() {
            return Err(CatalogError::missing(missing.into_iter().cloned()));
        }
        let selected = columns
            .iter()
            .map(|c| Ok((c.clone(), table.column(c)?.clone())))
            .collect::<Result<Vec<_>>>()?;
        Table::from_columns(selected)
    }
}

impl StoreOpener for MemBackend {
    type Store = MemStore;

    fn open(&self, source: &Path) -> Result<MemStore> {
        self.stores
            .get(source)
            .cloned()
            .ok_or_else(|| CatalogError::SourceNotFound(source.to_path_buf()))
    }
}
