pub mod format;
pub mod join;
pub mod mask;

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, UInt64Array};
use arrow::compute::{filter_record_batch, take};
use arrow::datatypes::{Field, FieldRef, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use crate::error::{CatalogError, Result};

// Re-export main types for convenience
pub use format::format_table;
pub use join::left_join;
pub use mask::{CompareOp, Mask, all_of, compare, float_values, ratio};

/// In-memory table of named columns backed by an arrow `RecordBatch`.
///
/// A table with no columns still carries a row count, so deleting the last
/// column does not change `num_rows`.
#[derive(Debug, Clone)]
pub struct Table {
    batch: RecordBatch,
}

impl Table {
    /// Creates a table with no columns and no rows
    pub fn empty() -> Self {
        Self {
            batch: RecordBatch::new_empty(Arc::new(Schema::empty())),
        }
    }

    pub fn from_batch(batch: RecordBatch) -> Self {
        Self { batch }
    }

    /// Builds a table column by column, in the order given
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, ArrayRef)>,
        S: Into<String>,
    {
        let mut table = Self::empty();
        for (name, array) in columns {
            table.set_column(name, array)?;
        }
        Ok(table)
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn into_batch(self) -> RecordBatch {
        self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Column names in schema order
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.batch.schema_ref().index_of(name).is_ok()
    }

    pub fn column(&self, name: &str) -> Result<&ArrayRef> {
        self.batch
            .column_by_name(name)
            .ok_or_else(|| CatalogError::missing([name]))
    }

    /// The column widened to f64; non-numeric columns are `UnsupportedType`
    pub fn float_column(&self, name: &str) -> Result<Float64Array> {
        float_values(name, self.column(name)?)
    }

    /// Replaces the column called `name`, or appends it when absent.
    /// The array length must match the row count unless the table has no columns yet.
    pub fn set_column(&mut self, name: impl Into<String>, array: ArrayRef) -> Result<()> {
        let name = name.into();
        if self.num_columns() > 0 && array.len() != self.num_rows() {
            return Err(CatalogError::LengthMismatch {
                column: name,
                expected: self.num_rows(),
                actual: array.len(),
            });
        }

        let rows = array.len();
        let (mut fields, mut columns) = self.parts();
        let field: FieldRef = Arc::new(Field::new(&name, array.data_type().clone(), true));
        match self.batch.schema_ref().index_of(&name) {
            Ok(idx) => {
                fields[idx] = field;
                columns[idx] = array;
            }
            Err(_) => {
                fields.push(field);
                columns.push(array);
            }
        }

        self.batch = rebuild(fields, columns, rows)?;
        Ok(())
    }

    /// Removes a column and returns its data
    pub fn remove_column(&mut self, name: &str) -> Result<ArrayRef> {
        let idx = self
            .batch
            .schema_ref()
            .index_of(name)
            .map_err(|_| CatalogError::missing([name]))?;
        let rows = self.num_rows();
        let (mut fields, mut columns) = self.parts();
        fields.remove(idx);
        let removed = columns.remove(idx);
        self.batch = rebuild(fields, columns, rows)?;
        Ok(removed)
    }

    /// Returns the rows selected by `mask`
    pub fn filter(&self, mask: &Mask) -> Result<Table> {
        match mask {
            Mask::Boolean(selection) => {
                if selection.len() != self.num_rows() {
                    return Err(CatalogError::MaskLength {
                        expected: self.num_rows(),
                        actual: selection.len(),
                    });
                }
                if self.num_columns() == 0 {
                    return Ok(Self::from_batch(rebuild(
                        Vec::new(),
                        Vec::new(),
                        selection.true_count(),
                    )?));
                }
                Ok(Self::from_batch(filter_record_batch(&self.batch, selection)?))
            }
            Mask::Indices(indices) => self.take_rows(indices),
        }
    }

    /// Returns the rows at `indices`, in the order given
    pub fn take_rows(&self, indices: &[usize]) -> Result<Table> {
        self.check_bounds(indices)?;
        let indices = UInt64Array::from_iter_values(indices.iter().map(|&i| i as u64));
        let columns = self
            .batch
            .columns()
            .iter()
            .map(|c| take(c.as_ref(), &indices, None))
            .collect::<std::result::Result<Vec<_>, ArrowError>>()?;
        let (fields, _) = self.parts();
        Ok(Self::from_batch(rebuild(fields, columns, indices.len())?))
    }

    /// Returns a copy without the rows at `positions`; order is preserved
    pub fn remove_rows(&self, positions: &[usize]) -> Result<Table> {
        self.check_bounds(positions)?;
        let mut keep = vec![true; self.num_rows()];
        for &p in positions {
            keep[p] = false;
        }
        self.filter(&Mask::Boolean(BooleanArray::from(keep)))
    }

    fn check_bounds(&self, indices: &[usize]) -> Result<()> {
        let rows = self.num_rows();
        match indices.iter().find(|&&i| i >= rows) {
            Some(&index) => Err(CatalogError::IndexOutOfBounds { index, rows }),
            None => Ok(()),
        }
    }

    fn parts(&self) -> (Vec<FieldRef>, Vec<ArrayRef>) {
        let fields = self.batch.schema_ref().fields().iter().cloned().collect();
        (fields, self.batch.columns().to_vec())
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::empty()
    }
}

fn rebuild(fields: Vec<FieldRef>, columns: Vec<ArrayRef>, rows: usize) -> Result<RecordBatch> {
    let options = RecordBatchOptions::new().with_row_count(Some(rows));
    let schema = Arc::new(Schema::new(fields));
    Ok(RecordBatch::try_new_with_options(schema, columns, &options)?)
}
