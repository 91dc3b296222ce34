//! Parquet-backed data sources.
//!
//! `ParquetReader` serves flat detection-style tables. `ParquetStore` treats a
//! Parquet file whose column names are store paths (`catalog/unsheared/flux_r`)
//! as a hierarchical store, keeping the file open until the store is closed.

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use arrow::array::ArrayRef;
use arrow::compute::concat_batches;
use arrow::datatypes::SchemaRef;
use arrow::error::ArrowError;
use arrow::record_batch::{RecordBatch, RecordBatchReader};
use parquet::arrow::ProjectionMask;
use parquet::arrow::arrow_reader::{
    ArrowReaderMetadata, ArrowReaderOptions, ParquetRecordBatchReaderBuilder,
};

use crate::error::{CatalogError, Result};
use crate::source::{ColumnarReader, HierarchicalStore, StoreOpener};
use crate::table::Table;

#[derive(Debug, Clone, Copy, Default)]
pub struct ParquetReader;

impl ColumnarReader for ParquetReader {
    fn read_table(&self, source: &Path, columns: Option<&[String]>) -> Result<Table> {
        let file = open_source(source)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let Some(columns) = columns else {
            return Ok(Table::from_batch(read_all(builder)?));
        };

        let indices = root_indices(builder.schema(), columns)?;
        let mask = ProjectionMask::roots(builder.parquet_schema(), indices);
        let projected = Table::from_batch(read_all(builder.with_projection(mask))?);

        // The projection keeps file order; hand columns back in request order.
        let ordered = columns
            .iter()
            .map(|c| Ok((c.clone(), projected.column(c)?.clone())))
            .collect::<Result<Vec<_>>>()?;
        Table::from_columns(ordered)
    }
}

/// Hierarchical store over one Parquet file
#[derive(Debug)]
pub struct ParquetStore {
    path: PathBuf,
    file: File,
    metadata: ArrowReaderMetadata,
}

impl ParquetStore {
    pub fn open(source: &Path) -> Result<Self> {
        let file = open_source(source)?;
        let metadata = ArrowReaderMetadata::load(&file, ArrowReaderOptions::new())?;
        tracing::debug!(path = %source.display(), "opened parquet store");
        Ok(Self {
            path: source.to_path_buf(),
            file,
            metadata,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HierarchicalStore for ParquetStore {
    fn read_array(&self, path: &str) -> Result<ArrayRef> {
        let file = self.file.try_clone()?;
        let builder =
            ParquetRecordBatchReaderBuilder::new_with_metadata(file, self.metadata.clone());
        let indices = root_indices(builder.schema(), &[path.to_string()])?;
        let mask = ProjectionMask::roots(builder.parquet_schema(), indices);
        let batch = read_all(builder.with_projection(mask))?;
        Ok(batch.column(0).clone())
    }

    fn contains(&self, path: &str) -> bool {
        self.metadata.schema().index_of(path).is_ok()
    }

    fn close(self) -> Result<()> {
        tracing::debug!(path = %self.path.display(), "closing parquet store");
        drop(self.file);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParquetStoreOpener;

impl StoreOpener for ParquetStoreOpener {
    type Store = ParquetStore;

    fn open(&self, source: &Path) -> Result<ParquetStore> {
        ParquetStore::open(source)
    }
}

fn open_source(source: &Path) -> Result<File> {
    File::open(source).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CatalogError::SourceNotFound(source.to_path_buf()),
        _ => CatalogError::Io(e),
    })
}

fn root_indices(schema: &SchemaRef, columns: &[String]) -> Result<Vec<usize>> {
    let mut indices = Vec::with_capacity(columns.len());
    let mut missing = Vec::new();
    for c in columns {
        match schema.index_of(c) {
            Ok(idx) => indices.push(idx),
            Err(_) => missing.push(c.clone()),
        }
    }
    if !missing.is_empty() {
        return Err(CatalogError::MissingColumn { columns: missing });
    }
    Ok(indices)
}

fn read_all(builder: ParquetRecordBatchReaderBuilder<File>) -> Result<RecordBatch> {
    let reader = builder.build()?;
    let schema = reader.schema();
    let batches = reader.collect::<std::result::Result<Vec<_>, ArrowError>>()?;
    Ok(concat_batches(&schema, &batches)?)
}
