//! Persists the enriched tables as CSV.
//!
//! Each file is first written next to its destination under a `.tmp` name
//! and renamed into place once complete, so a failed write never leaves a
//! truncated output behind.

use csv::WriterBuilder;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::EtlConfig;
use crate::error::{WriteError, WriteResult};
use crate::logs::{log_info, log_success, LogSink, Stage};
use crate::models::Table;
use crate::transform::EnrichedTables;

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_csv(table: &Table, path: &Path) -> WriteResult<()> {
    let csv_err = |source| WriteError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_err)?;

    writer.write_record(table.column_names()).map_err(csv_err)?;
    for row in &table.rows {
        writer.serialize(row).map_err(csv_err)?;
    }

    writer.flush().map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write one table: header row, then every row in order, no index column.
pub fn write_table(table: &Table, path: &Path) -> WriteResult<()> {
    let tmp = temp_path(path);

    if let Err(err) = write_csv(table, &tmp) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }

    fs::rename(&tmp, path).map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Create the output directory if needed and write both enriched tables.
///
/// Returns the written paths, train first.
pub fn save_processed_data(
    tables: &EnrichedTables,
    config: &EtlConfig,
    sink: &dyn LogSink,
) -> WriteResult<Vec<PathBuf>> {
    let output_dir = config.output_dir();
    fs::create_dir_all(&output_dir).map_err(|source| WriteError::CreateDir {
        path: output_dir.clone(),
        source,
    })?;

    let targets = [
        (&tables.train, config.train_output()),
        (&tables.test, config.test_output()),
    ];

    let mut written = Vec::with_capacity(targets.len());
    for (table, path) in targets {
        write_table(table, &path)?;
        log_info(
            sink,
            Stage::Write,
            format!("{}: {} rows", path.display(), table.len()),
        );
        written.push(path);
    }

    log_success(sink, Stage::Write, format!("Saved cleaned data to {}", output_dir.display()));
    Ok(written)
}
