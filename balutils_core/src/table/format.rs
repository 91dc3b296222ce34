use arrow::array::Array;
use arrow::util::display::array_value_to_string;

use crate::error::Result;
use crate::table::Table;

/// Formats a table as tab-separated text, at most `limit` rows
pub fn format_table(table: &Table, limit: Option<usize>) -> Result<String> {
    // Build header line with column names
    let header = table.column_names().join("\t");

    let shown = limit.map_or(table.num_rows(), |n| n.min(table.num_rows()));
    if shown == 0 {
        return Ok(header);
    }

    let columns = table.batch().columns();
    let mut lines: Vec<String> = Vec::with_capacity(shown + 1);
    lines.push(header);
    for row in 0..shown {
        let cells = columns
            .iter()
            .map(|c| {
                if c.is_null(row) {
                    Ok("null".to_string())
                } else {
                    array_value_to_string(c.as_ref(), row)
                }
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        lines.push(cells.join("\t"));
    }

    Ok(lines.join("\n"))
}
