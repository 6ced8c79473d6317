//! Domain models for the Rossmann ETL pipeline.
//!
//! Every dataset flowing through the pipeline is a [`Table`]: an ordered list of
//! typed [`Column`]s plus an ordered list of rows of nullable [`Cell`]s.
//!
//! - [`Cell`] - A single nullable value
//! - [`ColumnType`] - Inferred or forced column type
//! - [`Table`] - Column schema plus rows
//! - [`JoinKey`] - Hashable key extracted from a cell for joins and grouping
//! - [`GeoRecord`] / [`RegionGeoSummary`] - Typed geo rows and their per-State aggregate

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::{TransformError, TransformResult};

// =============================================================================
// Column names
// =============================================================================

/// Store identifier, joins sales, store attributes and state mapping.
pub const STORE: &str = "Store";
/// Region code, joins state mapping and geo summary.
pub const STATE: &str = "State";
pub const DATE: &str = "Date";
pub const OPEN: &str = "Open";
pub const STATE_HOLIDAY: &str = "StateHoliday";

// =============================================================================
// Cell
// =============================================================================

/// A single nullable value in a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Str(String),
    Date(NaiveDate),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Numeric view of the cell. `None` for nulls and non-numeric values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Text form used when a column is coerced to string.
    ///
    /// Floats keep their fractional part (`0.0`), integers do not (`0`).
    pub fn to_text(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Int(i) => Some(i.to_string()),
            Cell::Float(f) => Some(format!("{:?}", f)),
            Cell::Str(s) => Some(s.clone()),
            Cell::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Some(text) => f.write_str(&text),
            None => f.write_str("null"),
        }
    }
}

/// Cells serialize as CSV fields: null becomes an empty field.
impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Null => serializer.serialize_none(),
            Cell::Int(i) => serializer.serialize_i64(*i),
            Cell::Float(f) => serializer.serialize_f64(*f),
            Cell::Str(s) => serializer.serialize_str(s),
            Cell::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
        }
    }
}

// =============================================================================
// Join keys
// =============================================================================

/// Hashable, ordered key used by joins and group-by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JoinKey {
    Int(i64),
    Str(String),
}

impl JoinKey {
    /// Extract a key from a cell. Null cells never produce a key.
    ///
    /// Integral floats collapse onto the integer key so `1.0` matches `1`.
    pub fn from_cell(cell: &Cell) -> Option<Self> {
        match cell {
            Cell::Null => None,
            Cell::Int(i) => Some(JoinKey::Int(*i)),
            Cell::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(JoinKey::Int(*f as i64)),
            other => other.to_text().map(JoinKey::Str),
        }
    }
}

impl fmt::Display for JoinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinKey::Int(i) => write!(f, "{}", i),
            JoinKey::Str(s) => f.write_str(s),
        }
    }
}

// =============================================================================
// Table
// =============================================================================

/// Column type, either inferred at parse time or forced by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Str,
    Date,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnType) -> Self {
        Self { name: name.into(), kind }
    }
}

/// An in-memory table: ordered columns and ordered rows.
///
/// Every row holds exactly one cell per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Name used in error messages and logs (usually the source file stem).
    pub name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Index of a column that the caller cannot do without.
    pub fn require_column(&self, name: &str) -> TransformResult<usize> {
        self.column_index(name)
            .ok_or_else(|| TransformError::MissingColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }

    /// Append a row. Panics if the row width does not match the schema.
    pub fn push_row(&mut self, row: Vec<Cell>) {
        assert_eq!(
            row.len(),
            self.columns.len(),
            "row width must match the column count of '{}'",
            self.name
        );
        self.rows.push(row);
    }

    /// Cell at `row` in the column called `column`, if both exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// All cells of one column, in row order.
    pub fn column_values(&self, column: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }
}

// =============================================================================
// Geo records
// =============================================================================

/// One physical location from the geo source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoRecord {
    pub state: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub opened_sunday: Option<f64>,
    pub elevation: Option<f64>,
    pub population: Option<f64>,
    pub nearest_hotel: Option<f64>,
    pub nearest_railstation: Option<f64>,
}

/// Per-State aggregate of [`GeoRecord`]s.
///
/// Means are `None` when no record of the State carried the measure.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionGeoSummary {
    pub state: String,
    pub lat_mean: Option<f64>,
    pub lon_mean: Option<f64>,
    pub opened_sunday_share: Option<f64>,
    pub avg_elevation: Option<f64>,
    /// Integral when the source population column is integral.
    pub total_population: Cell,
    pub avg_distance_hotel: Option<f64>,
    pub avg_distance_rail: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut t = Table::new(
            "store",
            vec![Column::new("Store", ColumnType::Int), Column::new("StoreType", ColumnType::Str)],
        );
        t.push_row(vec![Cell::Int(1), Cell::Str("c".into())]);
        t.push_row(vec![Cell::Int(2), Cell::Null]);
        t
    }

    #[test]
    fn test_require_column_reports_table() {
        let t = sample();
        assert_eq!(t.require_column("Store").unwrap(), 0);

        let err = t.require_column("State").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("store"));
        assert!(msg.contains("State"));
    }

    #[test]
    fn test_value_lookup() {
        let t = sample();
        assert_eq!(t.value(0, "StoreType"), Some(&Cell::Str("c".into())));
        assert_eq!(t.value(1, "StoreType"), Some(&Cell::Null));
        assert_eq!(t.value(5, "StoreType"), None);
    }

    #[test]
    fn test_join_key_float_matches_int() {
        assert_eq!(JoinKey::from_cell(&Cell::Float(3.0)), Some(JoinKey::Int(3)));
        assert_eq!(JoinKey::from_cell(&Cell::Int(3)), Some(JoinKey::Int(3)));
        assert_eq!(JoinKey::from_cell(&Cell::Null), None);
        assert_eq!(
            JoinKey::from_cell(&Cell::Str("NW".into())),
            Some(JoinKey::Str("NW".into()))
        );
    }

    #[test]
    fn test_to_text_keeps_float_fraction() {
        assert_eq!(Cell::Int(0).to_text().as_deref(), Some("0"));
        assert_eq!(Cell::Float(0.0).to_text().as_deref(), Some("0.0"));
        assert_eq!(Cell::Null.to_text(), None);
    }

    #[test]
    #[should_panic]
    fn test_push_row_rejects_wrong_width() {
        let mut t = sample();
        t.push_row(vec![Cell::Int(3)]);
    }
}
