//! CSV decoding and typed table parsing.
//!
//! Turns raw bytes into a [`Table`]: decode with the declared encoding, read
//! records with the `csv` crate, then type every column. Columns listed as
//! forced keep the given type; the others are inferred (Int, then Float,
//! then Str).

pub mod loader;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use encoding_rs::Encoding;

use crate::error::{LoadError, LoadResult};
use crate::models::{Cell, Column, ColumnType, Table};

pub use loader::{load_raw_data, load_source, RawTables, SourceSpec, SOURCES};

/// Field values read as null, whatever the column type.
pub const NA_VALUES: &[&str] = &["", "NA", "N/A", "NaN", "nan", "NULL", "null", "#N/A"];

/// CSV parsing error with context
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub source_name: String,
    pub line: usize,
    pub column: Option<String>,
    pub value: Option<String>,
    pub message: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.column, &self.value) {
            (Some(col), Some(val)) => write!(
                f,
                "{}, line {}, column '{}' (value '{}'): {}",
                self.source_name, self.line, col, val, self.message
            ),
            (Some(col), None) => write!(
                f,
                "{}, line {}, column '{}': {}",
                self.source_name, self.line, col, self.message
            ),
            _ => write!(f, "{}, line {}: {}", self.source_name, self.line, self.message),
        }
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    pub fn new(source_name: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            line,
            column: None,
            value: None,
            message: message.into(),
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Text encoding of a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    /// Decoded with the WHATWG `latin1` label (windows-1252).
    Latin1,
}

impl SourceEncoding {
    pub fn label(&self) -> &'static str {
        match self {
            SourceEncoding::Utf8 => "utf-8",
            SourceEncoding::Latin1 => "latin-1",
        }
    }

    fn encoding(&self) -> &'static Encoding {
        match self {
            SourceEncoding::Utf8 => encoding_rs::UTF_8,
            SourceEncoding::Latin1 => encoding_rs::WINDOWS_1252,
        }
    }
}

/// Decode bytes to a string using the declared encoding.
///
/// A leading byte order mark is stripped. Invalid UTF-8 is an error rather
/// than being replaced.
pub fn decode_content(source_name: &str, bytes: &[u8], encoding: SourceEncoding) -> LoadResult<String> {
    let (text, _, had_errors) = encoding.encoding().decode(bytes);
    if had_errors {
        return Err(LoadError::Encoding {
            name: source_name.to_string(),
            encoding: encoding.label(),
        });
    }
    Ok(text.into_owned())
}

pub fn is_missing(raw: &str) -> bool {
    NA_VALUES.contains(&raw.trim())
}

/// Parse a calendar date.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD` and `YYYY-MM-DD HH:MM:SS` (time dropped).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y/%m/%d"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .ok()
}

/// Infer the narrowest type holding every non-missing value.
///
/// A column with no values at all is Float, as a column of nulls.
pub fn infer_column_type<'a>(values: impl IntoIterator<Item = &'a str>) -> ColumnType {
    let mut all_int = true;
    let mut all_float = true;

    for raw in values.into_iter().filter(|v| !is_missing(v)) {
        let trimmed = raw.trim();
        if all_int && trimmed.parse::<i64>().is_err() {
            all_int = false;
        }
        if trimmed.parse::<f64>().is_err() {
            all_float = false;
            break;
        }
    }

    match (all_int, all_float) {
        (_, false) => ColumnType::Str,
        (true, true) => ColumnType::Int,
        (false, true) => ColumnType::Float,
    }
}

/// Convert one raw field into a cell of the given type.
pub fn convert_field(raw: &str, kind: ColumnType) -> Result<Cell, String> {
    if is_missing(raw) {
        return Ok(Cell::Null);
    }
    let trimmed = raw.trim();
    match kind {
        ColumnType::Int => trimmed
            .parse::<i64>()
            .map(Cell::Int)
            .map_err(|_| "expected an integer".to_string()),
        ColumnType::Float => trimmed
            .parse::<f64>()
            .map(Cell::Float)
            .map_err(|_| "expected a number".to_string()),
        ColumnType::Str => Ok(Cell::Str(raw.to_string())),
        ColumnType::Date => parse_date(trimmed)
            .map(Cell::Date)
            .ok_or_else(|| "expected a date".to_string()),
    }
}

fn csv_error(source_name: &str, err: csv::Error) -> ParseError {
    let line = err.position().map(|p| p.line() as usize).unwrap_or(0);
    match err.kind() {
        csv::ErrorKind::UnequalLengths { expected_len, len, .. } => ParseError::new(
            source_name,
            line,
            format!("expected {} fields, found {}", expected_len, len),
        ),
        _ => ParseError::new(source_name, line, err.to_string()),
    }
}

/// Parse comma-separated content into a typed table.
///
/// # Example
/// ```ignore
/// use rossmann_etl::parser::parse_table;
/// use rossmann_etl::models::ColumnType;
///
/// let table = parse_table("states", "Store,State\n1,HE\n2,TH", &[("State", ColumnType::Str)]).unwrap();
/// assert_eq!(table.len(), 2);
/// ```
pub fn parse_table(
    source_name: &str,
    content: &str,
    forced: &[(&str, ColumnType)],
) -> Result<Table, ParseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(source_name, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(ParseError::new(source_name, 1, "Empty CSV file"));
    }

    let mut records: Vec<StringRecord> = Vec::new();
    for result in reader.records() {
        records.push(result.map_err(|e| csv_error(source_name, e))?);
    }

    let columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let kind = forced
                .iter()
                .find(|(col, _)| col == name)
                .map(|(_, kind)| *kind)
                .unwrap_or_else(|| infer_column_type(records.iter().map(|r| &r[idx])));
            Column::new(name.clone(), kind)
        })
        .collect();

    let mut table = Table::new(source_name, columns);
    for (row_idx, record) in records.iter().enumerate() {
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(row_idx + 2);

        let row = table
            .columns
            .iter()
            .zip(record.iter())
            .map(|(column, raw)| {
                convert_field(raw, column.kind).map_err(|message| {
                    ParseError::new(source_name, line, message)
                        .with_column(column.name.clone())
                        .with_value(raw)
                })
            })
            .collect::<Result<Vec<Cell>, ParseError>>()?;

        table.push_row(row);
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infers_column_types() {
        let csv = "Store,CompetitionDistance,StoreType\n1,1270,c\n2,,a\n3,570.5,a";
        let table = parse_table("store", csv, &[]).unwrap();

        assert_eq!(table.columns[0].kind, ColumnType::Int);
        assert_eq!(table.columns[1].kind, ColumnType::Float);
        assert_eq!(table.columns[2].kind, ColumnType::Str);
        assert_eq!(table.value(1, "CompetitionDistance"), Some(&Cell::Null));
        assert_eq!(table.value(0, "CompetitionDistance"), Some(&Cell::Float(1270.0)));
    }

    #[test]
    fn test_int_column_with_missing_values_stays_int() {
        let csv = "Id,Open\n1,1\n2,\n3,0";
        let table = parse_table("test", csv, &[]).unwrap();

        assert_eq!(table.columns[1].kind, ColumnType::Int);
        assert_eq!(table.value(1, "Open"), Some(&Cell::Null));
    }

    #[test]
    fn test_forced_string_column() {
        let csv = "Store,StateHoliday\n1,0\n2,a\n3,0";
        let table = parse_table("train", csv, &[("StateHoliday", ColumnType::Str)]).unwrap();

        assert_eq!(table.columns[1].kind, ColumnType::Str);
        assert_eq!(table.value(0, "StateHoliday"), Some(&Cell::Str("0".into())));
    }

    #[test]
    fn test_forced_int_rejects_text() {
        let csv = "Store,State\n1,HE\nx,TH";
        let err = parse_table("store_states", csv, &[("Store", ColumnType::Int)]).unwrap_err();

        assert_eq!(err.line, 3);
        assert_eq!(err.column.as_deref(), Some("Store"));
        assert_eq!(err.value.as_deref(), Some("x"));
    }

    #[test]
    fn test_column_count_mismatch() {
        let csv = "a,b,c\n1,2,3\n4,5";
        let err = parse_table("train", csv, &[]).unwrap_err();

        assert_eq!(err.line, 3);
        assert!(err.message.contains("expected 3 fields"));
    }

    #[test]
    fn test_quoted_values() {
        let csv = "Store,PromoInterval\n1,\"Jan,Apr,Jul,Oct\"";
        let table = parse_table("store", csv, &[]).unwrap();

        assert_eq!(
            table.value(0, "PromoInterval"),
            Some(&Cell::Str("Jan,Apr,Jul,Oct".into()))
        );
    }

    #[test]
    fn test_empty_csv_error() {
        let err = parse_table("train", "", &[]).unwrap_err();
        assert!(err.message.contains("Empty"));
    }

    #[test]
    fn test_header_only_gives_empty_table() {
        let table = parse_table("train", "Store,Date\n", &[]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column_names(), vec!["Store", "Date"]);
    }

    #[test]
    fn test_error_message_format() {
        let err = ParseError::new("store", 5, "expected an integer")
            .with_column("Store")
            .with_value("abc");

        let msg = err.to_string();
        assert!(msg.contains("line 5"));
        assert!(msg.contains("column 'Store'"));
        assert!(msg.contains("value 'abc'"));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2015, 7, 31);
        assert_eq!(parse_date("2015-07-31"), expected);
        assert_eq!(parse_date("2015/07/31"), expected);
        assert_eq!(parse_date("2015-07-31 00:00:00"), expected);
        assert_eq!(parse_date("31.07.2015"), None);
    }

    #[test]
    fn test_latin1_decoding() {
        // "Thüringen" in ISO-8859-1
        let bytes: &[u8] = &[0x54, 0x68, 0xFC, 0x72, 0x69, 0x6E, 0x67, 0x65, 0x6E];
        let decoded = decode_content("geo", bytes, SourceEncoding::Latin1).unwrap();
        assert_eq!(decoded, "Thüringen");
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let bytes: &[u8] = &[0x54, 0x68, 0xFC, 0x72];
        let result = decode_content("store", bytes, SourceEncoding::Utf8);
        assert!(matches!(result, Err(LoadError::Encoding { .. })));
    }
}
