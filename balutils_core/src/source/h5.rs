//! Native HDF5 shape stores (feature `hdf5`)

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array};
use hdf5::types::TypeDescriptor;

use crate::error::{CatalogError, Result};
use crate::source::{HierarchicalStore, StoreOpener};

/// An HDF5 file addressed by dataset path, e.g. `catalog/unsheared/snr`
#[derive(Debug)]
pub struct H5Store {
    path: PathBuf,
    file: hdf5::File,
}

impl H5Store {
    pub fn open(source: &Path) -> Result<Self> {
        if !source.exists() {
            return Err(CatalogError::SourceNotFound(source.to_path_buf()));
        }
        let file = hdf5::File::open(source)?;
        tracing::debug!(path = %source.display(), "opened hdf5 store");
        Ok(Self {
            path: source.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HierarchicalStore for H5Store {
    fn read_array(&self, path: &str) -> Result<ArrayRef> {
        if !self.contains(path) {
            return Err(CatalogError::missing([path]));
        }
        let dataset = self.file.dataset(path)?;
        let descriptor = dataset.dtype()?.to_descriptor()?;
        if dataset.ndim() != 1 {
            return Err(CatalogError::UnsupportedType {
                column: path.to_string(),
                data_type: format!("{}-dimensional {descriptor}", dataset.ndim()),
            });
        }

        let array: ArrayRef = match descriptor {
            TypeDescriptor::Float(_) => Arc::new(Float64Array::from(dataset.read_raw::<f64>()?)),
            TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) => {
                Arc::new(Int64Array::from(dataset.read_raw::<i64>()?))
            }
            TypeDescriptor::Boolean => Arc::new(BooleanArray::from(dataset.read_raw::<bool>()?)),
            other => {
                return Err(CatalogError::UnsupportedType {
                    column: path.to_string(),
                    data_type: other.to_string(),
                });
            }
        };
        Ok(array)
    }

    fn contains(&self, path: &str) -> bool {
        self.file.link_exists(path)
    }

    fn close(self) -> Result<()> {
        tracing::debug!(path = %self.path.display(), "closing hdf5 store");
        self.file.close()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct H5Opener;

impl StoreOpener for H5Opener {
    type Store = H5Store;

    fn open(&self, source: &Path) -> Result<H5Store> {
        H5Store::open(source)
    }
}
