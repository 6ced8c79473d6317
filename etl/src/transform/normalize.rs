//! Column-level cleaning: date parsing, null filling, string coercion.

use crate::error::{TransformError, TransformResult};
use crate::models::{Cell, ColumnType, Table};
use crate::parser::parse_date;

/// Parse a column into calendar dates in place.
///
/// Nulls stay null; any other value that is not a date fails the run.
pub fn parse_date_column(table: &mut Table, column: &str) -> TransformResult<()> {
    let idx = table.require_column(column)?;

    for (row_idx, row) in table.rows.iter_mut().enumerate() {
        let cell = &mut row[idx];
        if matches!(cell, Cell::Null | Cell::Date(_)) {
            continue;
        }
        let text = cell.to_text().unwrap_or_default();
        let date = parse_date(&text).ok_or_else(|| TransformError::InvalidDate {
            table: table.name.clone(),
            line: row_idx + 2,
            value: text.clone(),
        })?;
        *cell = Cell::Date(date);
    }

    table.columns[idx].kind = ColumnType::Date;
    Ok(())
}

/// Replace nulls in a column with zero of the column's type.
///
/// Returns the number of cells filled.
pub fn fill_null_with_zero(table: &mut Table, column: &str) -> TransformResult<usize> {
    let idx = table.require_column(column)?;
    let zero = match table.columns[idx].kind {
        ColumnType::Float => Cell::Float(0.0),
        ColumnType::Str => Cell::Str("0".to_string()),
        ColumnType::Int | ColumnType::Date => Cell::Int(0),
    };

    let mut filled = 0;
    for row in table.rows.iter_mut() {
        if row[idx].is_null() {
            row[idx] = zero.clone();
            filled += 1;
        }
    }
    Ok(filled)
}

/// Turn every non-null value of a column into its text form.
///
/// Numeric `0` and text `"0"` both end up as `"0"`.
pub fn coerce_to_string(table: &mut Table, column: &str) -> TransformResult<()> {
    let idx = table.require_column(column)?;

    for row in table.rows.iter_mut() {
        if let Some(text) = row[idx].to_text() {
            row[idx] = Cell::Str(text);
        }
    }

    table.columns[idx].kind = ColumnType::Str;
    Ok(())
}
