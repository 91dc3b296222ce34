pub mod detection;
pub mod gold;
pub mod joined;
pub mod policy;
pub mod shape;

use std::fmt;
use std::path::{Path, PathBuf};

use arrow::array::{ArrayRef, Float64Array};

use crate::error::{CatalogError, Result};
use crate::source::ColumnarReader;
use crate::table::{Mask, Table, format_table};

// Re-export main types for convenience
pub use detection::{DetectionCatalog, DuplicateReport, repair_duplicates};
pub use gold::{GoldCatalog, GoldSelector, GoldVariant};
pub use joined::JoinedCatalog;
pub use policy::CutPolicy;
pub use shape::{DEFAULT_SHAPE_PATH, ShapeCatalog, ShapeSelector};

/// Identifier shared by detection and shape-measurement catalogs
pub const BAL_ID: &str = "bal_id";

pub const DEFAULT_ZERO_POINT: f64 = 30.0;

const DISPLAY_ROWS: usize = 10;

/// A loaded table of measurements plus where it came from.
///
/// The row count is always read from the table itself.
#[derive(Debug, Clone)]
pub struct Catalog {
    source: PathBuf,
    requested_columns: Option<Vec<String>>,
    table: Table,
}

impl Catalog {
    pub fn new(
        source: impl Into<PathBuf>,
        requested_columns: Option<Vec<String>>,
        table: Table,
    ) -> Self {
        Self {
            source: source.into(),
            requested_columns,
            table,
        }
    }

    /// Reads a flat table, restricted to `columns` when given
    pub fn load_columnar<R>(
        reader: &R,
        source: impl Into<PathBuf>,
        columns: Option<Vec<String>>,
    ) -> Result<Self>
    where
        R: ColumnarReader + ?Sized,
    {
        let source = source.into();
        let table = reader.read_table(&source, columns.as_deref())?;
        tracing::info!(
            source = %source.display(),
            rows = table.num_rows(),
            columns = table.num_columns(),
            "loaded columnar catalog"
        );
        Ok(Self::new(source, columns, table))
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn requested_columns(&self) -> Option<&[String]> {
        self.requested_columns.as_deref()
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }

    pub fn row_count(&self) -> usize {
        self.table.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.table.column_names()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.table.has_column(name)
    }

    pub fn get_column(&self, name: &str) -> Result<&ArrayRef> {
        self.table.column(name)
    }

    pub fn set_column(&mut self, name: impl Into<String>, array: ArrayRef) -> Result<()> {
        self.table.set_column(name, array)
    }

    pub fn delete_column(&mut self, name: &str) -> Result<ArrayRef> {
        self.table.remove_column(name)
    }

    /// Keeps only the rows selected by `mask`. Selecting nothing leaves an empty table.
    pub fn apply_cut(&mut self, mask: &Mask) -> Result<()> {
        self.table = self.table.filter(mask)?;
        Ok(())
    }

    /// Fails with every absent name, in request order
    pub fn check_columns_present(&self, names: &[&str]) -> Result<()> {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|n| !self.table.has_column(n))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::missing(missing))
        }
    }

    /// Checks the policy's columns, builds its mask and applies it
    pub fn apply_policy(&mut self, policy: &dyn CutPolicy) -> Result<()> {
        self.check_columns_present(&policy.required_columns())?;
        let mask = policy.mask(&self.table)?;
        let before = self.row_count();
        self.apply_cut(&Mask::Boolean(mask))?;
        tracing::debug!(
            cut = policy.name(),
            before,
            after = self.row_count(),
            "applied cut"
        );
        Ok(())
    }

    pub(crate) fn replace_table(&mut self, table: Table) {
        self.table = table;
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = format_table(&self.table, Some(DISPLAY_ROWS)).map_err(|_| fmt::Error)?;
        write!(f, "{body}")?;
        if self.row_count() > DISPLAY_ROWS {
            write!(f, "\n... ({} rows)", self.row_count())?;
        }
        Ok(())
    }
}

/// `-2.5 * log10(flux) + zero_point`. Non-positive flux gives a non-finite result.
pub fn flux_to_magnitude(flux: f64, zero_point: f64) -> f64 {
    -2.5 * flux.log10() + zero_point
}

/// Applies `flux_to_magnitude` to a whole numeric column; nulls stay null
pub fn magnitudes(flux: &Float64Array, zero_point: f64) -> Float64Array {
    flux.iter()
        .map(|v| v.map(|f| flux_to_magnitude(f, zero_point)))
        .collect()
}
