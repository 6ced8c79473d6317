//! Loads the five raw Rossmann sources into typed tables.

use std::fs;
use std::io::ErrorKind;

use super::{decode_content, parse_table, SourceEncoding};
use crate::config::{
    EtlConfig, STORE_FILE, STORE_GEO_FILE, STORE_STATES_FILE, TEST_FILE, TRAIN_FILE,
};
use crate::error::{LoadError, LoadResult};
use crate::logs::{log_info, log_success, LogSink, Stage};
use crate::models::{ColumnType, Table, STATE, STATE_HOLIDAY, STORE};

/// How one source file is read
#[derive(Debug, Clone, Copy)]
pub struct SourceSpec {
    /// Table name used in logs and errors
    pub name: &'static str,
    pub file_name: &'static str,
    pub encoding: SourceEncoding,
    /// Columns whose type is fixed instead of inferred
    pub forced: &'static [(&'static str, ColumnType)],
}

const SALES_TYPES: &[(&str, ColumnType)] = &[(STORE, ColumnType::Int), (STATE_HOLIDAY, ColumnType::Str)];
const STORE_TYPES: &[(&str, ColumnType)] = &[(STORE, ColumnType::Int)];
const STATE_TYPES: &[(&str, ColumnType)] = &[(STORE, ColumnType::Int), (STATE, ColumnType::Str)];

pub const TRAIN: SourceSpec = SourceSpec {
    name: "train",
    file_name: TRAIN_FILE,
    encoding: SourceEncoding::Utf8,
    forced: SALES_TYPES,
};

pub const TEST: SourceSpec = SourceSpec {
    name: "test",
    file_name: TEST_FILE,
    encoding: SourceEncoding::Utf8,
    forced: SALES_TYPES,
};

pub const STORE_ATTRIBUTES: SourceSpec = SourceSpec {
    name: "store",
    file_name: STORE_FILE,
    encoding: SourceEncoding::Utf8,
    forced: STORE_TYPES,
};

pub const STORE_STATES: SourceSpec = SourceSpec {
    name: "store_states",
    file_name: STORE_STATES_FILE,
    encoding: SourceEncoding::Utf8,
    forced: STATE_TYPES,
};

pub const STORE_GEO: SourceSpec = SourceSpec {
    name: "store_geo",
    file_name: STORE_GEO_FILE,
    encoding: SourceEncoding::Latin1,
    forced: STATE_TYPES,
};

/// All sources, in load order.
pub const SOURCES: [SourceSpec; 5] = [TRAIN, TEST, STORE_ATTRIBUTES, STORE_STATES, STORE_GEO];

/// The five raw tables
#[derive(Debug, Clone)]
pub struct RawTables {
    pub train: Table,
    pub test: Table,
    pub store: Table,
    pub store_states: Table,
    pub geo: Table,
}

/// Read and parse one source file.
pub fn load_source(config: &EtlConfig, spec: &SourceSpec) -> LoadResult<Table> {
    let path = config.source_path(spec.file_name);

    let bytes = fs::read(&path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LoadError::MissingSource {
            name: spec.name.to_string(),
            path: path.clone(),
        },
        _ => LoadError::Io {
            path: path.clone(),
            source,
        },
    })?;

    let content = decode_content(spec.name, &bytes, spec.encoding)?;
    Ok(parse_table(spec.name, &content, spec.forced)?)
}

/// Load train, test, store, store_states and geo from the data root.
///
/// Every source is checked for presence before any is parsed, so a missing
/// file is reported without paying for the others.
pub fn load_raw_data(config: &EtlConfig, sink: &dyn LogSink) -> LoadResult<RawTables> {
    log_info(sink, Stage::Load, format!("Reading sources from {}", config.data_dir.display()));

    for spec in &SOURCES {
        let path = config.source_path(spec.file_name);
        if !path.is_file() {
            return Err(LoadError::MissingSource {
                name: spec.name.to_string(),
                path,
            });
        }
    }

    let load = |spec: &SourceSpec| -> LoadResult<Table> {
        let table = load_source(config, spec)?;
        log_info(
            sink,
            Stage::Load,
            format!(
                "{} ({}): {} rows, {} columns",
                spec.file_name,
                spec.encoding.label(),
                table.len(),
                table.columns.len()
            ),
        );
        Ok(table)
    };

    let raw = RawTables {
        train: load(&TRAIN)?,
        test: load(&TEST)?,
        store: load(&STORE_ATTRIBUTES)?,
        store_states: load(&STORE_STATES)?,
        geo: load(&STORE_GEO)?,
    };

    log_success(sink, Stage::Load, "Loaded train, test, store, store_states, and geo CSVs.");
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::MemorySink;
    use crate::models::Cell;
    use tempfile::tempdir;

    fn write_sources(dir: &std::path::Path) {
        fs::write(dir.join(TRAIN_FILE), "Store,Date,Sales,StateHoliday\n1,2015-07-31,5263,0\n").unwrap();
        fs::write(dir.join(TEST_FILE), "Id,Store,Date,Open,StateHoliday\n1,1,2015-09-17,,0\n").unwrap();
        fs::write(dir.join(STORE_FILE), "Store,StoreType\n1,c\n").unwrap();
        fs::write(dir.join(STORE_STATES_FILE), "Store,State\n1,HE\n").unwrap();
        // "Thüringen" with a Latin-1 ü
        let mut geo = b"State,name,lat\nTH,Th".to_vec();
        geo.push(0xFC);
        geo.extend_from_slice(b"ringen,50.9\n");
        fs::write(dir.join(STORE_GEO_FILE), geo).unwrap();
    }

    #[test]
    fn test_load_all_sources() {
        let dir = tempdir().unwrap();
        write_sources(dir.path());
        let sink = MemorySink::new();

        let raw = load_raw_data(&EtlConfig::with_data_dir(dir.path()), &sink).unwrap();

        assert_eq!(raw.train.len(), 1);
        assert_eq!(raw.test.value(0, "Open"), Some(&Cell::Null));
        assert_eq!(raw.geo.value(0, "name"), Some(&Cell::Str("Thüringen".into())));
        assert_eq!(
            raw.train.value(0, "StateHoliday"),
            Some(&Cell::Str("0".into()))
        );
        let entries = sink.stage_entries(Stage::Load);
        assert!(entries.last().unwrap().message.starts_with("Loaded"));
    }

    #[test]
    fn test_missing_source() {
        let dir = tempdir().unwrap();
        write_sources(dir.path());
        fs::remove_file(dir.path().join(STORE_STATES_FILE)).unwrap();

        let result = load_raw_data(&EtlConfig::with_data_dir(dir.path()), &MemorySink::new());
        match result {
            Err(LoadError::MissingSource { name, .. }) => assert_eq!(name, "store_states"),
            other => panic!("expected MissingSource, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_row_is_parse_error() {
        let dir = tempdir().unwrap();
        write_sources(dir.path());
        fs::write(dir.path().join(STORE_FILE), "Store,StoreType\n1,c,extra\n").unwrap();

        let result = load_raw_data(&EtlConfig::with_data_dir(dir.path()), &MemorySink::new());
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }
}
