use arrow::array::BooleanArray;

use crate::error::Result;
use crate::table::Table;

/// A fixed row-selection rule over named columns.
///
/// Catalogs run `required_columns` through their presence check before
/// asking for the mask, so `mask` may assume those columns exist.
pub trait CutPolicy {
    fn name(&self) -> &str;

    fn required_columns(&self) -> Vec<&str>;

    /// One entry per table row; true keeps the row
    fn mask(&self, table: &Table) -> Result<BooleanArray>;
}
