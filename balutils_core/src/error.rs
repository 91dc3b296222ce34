use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use thiserror::Error;

/// Errors raised while loading, cutting or joining catalogs.
///
/// Every variant aborts the enclosing operation; a catalog whose operation
/// failed must not be used further.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(
        "column(s) {} not found in catalog but required for requested operation",
        .columns.join(", ")
    )]
    MissingColumn { columns: Vec<String> },

    #[error("invalid gold match type '{0}': expected one of default, mof_only, sof_only")]
    InvalidVariant(String),

    #[error(
        "duplicate repair left {actual} rows, expected {expected}; \
         ids with more than one surplus row among {duplicate_ids:?}"
    )]
    DuplicateRepairIntegrity {
        expected: usize,
        actual: usize,
        duplicate_ids: Vec<String>,
    },

    #[error("column '{column}' has {actual} rows but the table has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("boolean mask has {actual} entries but the table has {expected} rows")]
    MaskLength { expected: usize, actual: usize },

    #[error("row index {index} out of bounds for table with {rows} rows")]
    IndexOutOfBounds { index: usize, rows: usize },

    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedType { column: String, data_type: String },

    #[error("join key '{column}' is {left} on the left but {right} on the right")]
    KeyTypeMismatch {
        column: String,
        left: String,
        right: String,
    },

    #[error("store has already been closed")]
    StoreClosed,

    #[error("data source '{}' not found", .0.display())]
    SourceNotFound(PathBuf),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("parquet error: {0}")]
    Parquet(#[from] ParquetError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "fits")]
    #[error("FITS error: {0}")]
    Fits(#[from] fitsio::errors::Error),

    #[cfg(feature = "hdf5")]
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),
}

impl CatalogError {
    pub fn missing<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CatalogError::MissingColumn {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
