use arrow::array::{Array, ArrayRef, AsArray, BooleanArray, Float64Array};
use arrow::compute::{CastOptions, cast_with_options};
use arrow::compute::kernels::boolean::and;
use arrow::datatypes::{DataType, Float64Type};

use crate::error::{CatalogError, Result};

/// Row selection over a table
#[derive(Debug, Clone)]
pub enum Mask {
    /// Row positions to keep, in output order
    Indices(Vec<usize>),
    /// One entry per row; null entries are not selected
    Boolean(BooleanArray),
}

impl Mask {
    /// Number of rows the mask keeps
    pub fn selected(&self) -> usize {
        match self {
            Mask::Indices(indices) => indices.len(),
            Mask::Boolean(selection) => selection.true_count(),
        }
    }
}

impl From<BooleanArray> for Mask {
    fn from(selection: BooleanArray) -> Self {
        Mask::Boolean(selection)
    }
}

impl From<Vec<bool>> for Mask {
    fn from(selection: Vec<bool>) -> Self {
        Mask::Boolean(BooleanArray::from(selection))
    }
}

impl From<Vec<usize>> for Mask {
    fn from(indices: Vec<usize>) -> Self {
        Mask::Indices(indices)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl CompareOp {
    fn eval(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CompareOp::Eq => lhs == rhs,
            CompareOp::NotEq => lhs != rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::LtEq => lhs <= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::GtEq => lhs >= rhs,
        }
    }
}

/// Compares every value against `value`.
///
/// Comparisons follow IEEE semantics, so a NaN never satisfies an ordering;
/// nulls stay null.
pub fn compare(values: &Float64Array, op: CompareOp, value: f64) -> BooleanArray {
    values
        .iter()
        .map(|v| v.map(|x| op.eval(x, value)))
        .collect()
}

/// Elementwise `numerator / denominator`; division by zero gives inf or NaN
pub fn ratio(numerator: &Float64Array, denominator: &Float64Array) -> Float64Array {
    numerator
        .iter()
        .zip(denominator.iter())
        .map(|(n, d)| match (n, d) {
            (Some(n), Some(d)) => Some(n / d),
            _ => None,
        })
        .collect()
}

/// Conjunction of all masks; an empty list selects nothing
pub fn all_of(masks: &[BooleanArray]) -> Result<BooleanArray> {
    let Some((first, rest)) = masks.split_first() else {
        return Ok(BooleanArray::from(Vec::<bool>::new()));
    };
    let mut acc = first.clone();
    for m in rest {
        acc = and(&acc, m)?;
    }
    Ok(acc)
}

/// Widens a numeric or boolean column to f64, keeping nulls.
/// Any other type is an `UnsupportedType` error, never a cast to nulls.
pub fn float_values(name: &str, column: &ArrayRef) -> Result<Float64Array> {
    let data_type = column.data_type();
    if !(data_type.is_numeric() || *data_type == DataType::Boolean) {
        return Err(CatalogError::UnsupportedType {
            column: name.to_string(),
            data_type: data_type.to_string(),
        });
    }
    let options = CastOptions {
        safe: false,
        ..CastOptions::default()
    };
    let widened = cast_with_options(column, &DataType::Float64, &options)?;
    Ok(widened.as_primitive::<Float64Type>().clone())
}
