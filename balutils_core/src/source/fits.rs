//! FITS binary-table reader (feature `fits`)

use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use fitsio::FitsFile;
use fitsio::hdu::HduInfo;
use fitsio::tables::ColumnDataType;

use crate::error::{CatalogError, Result};
use crate::source::ColumnarReader;
use crate::table::Table;

/// Reads the first binary-table HDU of a FITS file
#[derive(Debug, Clone, Copy, Default)]
pub struct FitsReader;

impl ColumnarReader for FitsReader {
    fn read_table(&self, source: &Path, columns: Option<&[String]>) -> Result<Table> {
        if !source.exists() {
            return Err(CatalogError::SourceNotFound(source.to_path_buf()));
        }
        let mut fptr = FitsFile::open(source)?;
        let hdu = fptr.hdu(1)?;
        let descriptions = match &hdu.info {
            HduInfo::TableInfo {
                column_descriptions,
                ..
            } => column_descriptions.clone(),
            _ => {
                return Err(CatalogError::Fits(fitsio::errors::Error::Message(format!(
                    "HDU 1 of '{}' is not a table",
                    source.display()
                ))));
            }
        };

        let wanted: Vec<String> = match columns {
            Some(cols) => {
                let missing: Vec<String> = cols
                    .iter()
                    .filter(|c| !descriptions.iter().any(|d| &d.name == *c))
                    .cloned()
                    .collect();
                if !missing.is_empty() {
                    return Err(CatalogError::MissingColumn { columns: missing });
                }
                cols.to_vec()
            }
            None => descriptions.iter().map(|d| d.name.clone()).collect(),
        };

        let mut out: Vec<(String, ArrayRef)> = Vec::with_capacity(wanted.len());
        for name in wanted {
            let Some(desc) = descriptions.iter().find(|d| d.name == name) else {
                continue;
            };
            let array: ArrayRef = match desc.data_type.typ {
                ColumnDataType::Float | ColumnDataType::Double => {
                    let values: Vec<f64> = hdu.read_col(&mut fptr, &name)?;
                    Arc::new(Float64Array::from(values))
                }
                ColumnDataType::Text | ColumnDataType::String => {
                    let values: Vec<String> = hdu.read_col(&mut fptr, &name)?;
                    Arc::new(StringArray::from(values))
                }
                _ => {
                    let values: Vec<i64> = hdu.read_col(&mut fptr, &name)?;
                    Arc::new(Int64Array::from(values))
                }
            };
            out.push((name, array));
        }

        Table::from_columns(out)
    }
}
