use std::collections::{HashMap, HashSet};
use std::fmt;

use arrow::array::{Array, ArrayRef, AsArray, UInt64Array};
use arrow::compute::{CastOptions, cast_with_options, take};
use arrow::datatypes::{DataType, Float64Type, Int64Type};

use crate::error::{CatalogError, Result};
use crate::table::Table;

/// Left-joins `right` onto `left` by the shared column `on`.
///
/// Output keeps left-table order. A left row is repeated once per matching
/// right row; a left row without a match gets nulls in every right column.
/// Null and NaN keys never match. Integer and floating-point keys compare by
/// value, so `2` matches `2.0`; a text key only matches text. Non-key names
/// present on both sides are suffixed `_1` (left) and `_2` (right).
pub fn left_join(left: &Table, right: &Table, on: &str) -> Result<Table> {
    if !left.has_column(on) || !right.has_column(on) {
        return Err(CatalogError::missing([on]));
    }

    let left_column = left.column(on)?;
    let right_column = right.column(on)?;
    let left_family = KeyFamily::of(on, left_column.data_type())?;
    let right_family = KeyFamily::of(on, right_column.data_type())?;
    if !left_family.comparable(right_family) {
        return Err(CatalogError::KeyTypeMismatch {
            column: on.to_string(),
            left: left_column.data_type().to_string(),
            right: right_column.data_type().to_string(),
        });
    }

    let left_keys = join_keys(on, left_column)?;
    let right_keys = join_keys(on, right_column)?;

    // Hash index on the right key keeps the join linear in both inputs.
    let mut right_key_to_rows: HashMap<&JoinKey, Vec<u64>> = HashMap::new();
    for (i, k) in right_keys.iter().enumerate() {
        if let Some(k) = k {
            right_key_to_rows.entry(k).or_default().push(i as u64);
        }
    }

    let mut left_take: Vec<u64> = Vec::with_capacity(left.num_rows());
    let mut right_take: Vec<Option<u64>> = Vec::with_capacity(left.num_rows());
    for (i, k) in left_keys.iter().enumerate() {
        let matching = k.as_ref().and_then(|k| right_key_to_rows.get(k));
        match matching {
            Some(rows) => {
                for &r in rows {
                    left_take.push(i as u64);
                    right_take.push(Some(r));
                }
            }
            None => {
                left_take.push(i as u64);
                right_take.push(None);
            }
        }
    }
    let left_indices = UInt64Array::from(left_take);
    let right_indices = UInt64Array::from(right_take);

    let left_names: HashSet<String> = left.column_names().into_iter().collect();
    let right_names: HashSet<String> = right.column_names().into_iter().collect();

    let mut out: Vec<(String, ArrayRef)> = Vec::new();
    for name in left.column_names() {
        let taken = take(left.column(&name)?.as_ref(), &left_indices, None)?;
        let out_name = if name != on && right_names.contains(&name) {
            format!("{name}_1")
        } else {
            name
        };
        out.push((out_name, taken));
    }
    for name in right.column_names() {
        if name == on {
            continue;
        }
        let taken = take(right.column(&name)?.as_ref(), &right_indices, None)?;
        let out_name = if left_names.contains(&name) {
            format!("{name}_2")
        } else {
            name
        };
        out.push((out_name, taken));
    }

    Table::from_columns(out)
}

/// A key value normalized across physical column types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum JoinKey {
    Int(i64),
    /// Bit pattern of a finite non-integral or infinite value
    Float(u64),
    Text(String),
}

impl JoinKey {
    fn from_f64(value: f64) -> Option<Self> {
        if value.is_nan() {
            return None;
        }
        // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
        if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
            Some(JoinKey::Int(value as i64))
        } else {
            Some(JoinKey::Float(value.to_bits()))
        }
    }
}

impl fmt::Display for JoinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinKey::Int(v) => write!(f, "{v}"),
            JoinKey::Float(bits) => write!(f, "{}", f64::from_bits(*bits)),
            JoinKey::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyFamily {
    Integer,
    Floating,
    Text,
}

impl KeyFamily {
    fn of(column: &str, data_type: &DataType) -> Result<Self> {
        match data_type {
            t if t.is_integer() => Ok(KeyFamily::Integer),
            t if t.is_floating() => Ok(KeyFamily::Floating),
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => Ok(KeyFamily::Text),
            other => Err(CatalogError::UnsupportedType {
                column: column.to_string(),
                data_type: other.to_string(),
            }),
        }
    }

    /// Integer and floating keys share one value space
    fn comparable(self, other: Self) -> bool {
        self == other || (self != KeyFamily::Text && other != KeyFamily::Text)
    }
}

/// Normalizes a key column so equal values compare equal whatever their width
pub(crate) fn join_keys(name: &str, column: &ArrayRef) -> Result<Vec<Option<JoinKey>>> {
    let options = CastOptions {
        safe: false,
        ..CastOptions::default()
    };
    let keys = match KeyFamily::of(name, column.data_type())? {
        KeyFamily::Integer => cast_with_options(column, &DataType::Int64, &options)?
            .as_primitive::<Int64Type>()
            .iter()
            .map(|v| v.map(JoinKey::Int))
            .collect(),
        KeyFamily::Floating => cast_with_options(column, &DataType::Float64, &options)?
            .as_primitive::<Float64Type>()
            .iter()
            .map(|v| v.and_then(JoinKey::from_f64))
            .collect(),
        KeyFamily::Text => cast_with_options(column, &DataType::Utf8, &options)?
            .as_string::<i32>()
            .iter()
            .map(|v| v.map(|s| JoinKey::Text(s.to_owned())))
            .collect(),
    };
    Ok(keys)
}
