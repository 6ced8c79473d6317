//! Error types for the Rossmann ETL pipeline.
//!
//! One error type per stage, composed into a top-level error:
//!
//! - [`LoadError`] - Missing sources, unreadable files, malformed rows
//! - [`TransformError`] - Missing key columns, bad dates, non-numeric measures
//! - [`WriteError`] - Unwritable output location
//! - [`PipelineError`] - Top-level orchestration error
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across stage boundaries.

use std::path::PathBuf;
use thiserror::Error;

use crate::parser::ParseError;

// =============================================================================
// Load Errors
// =============================================================================

/// Errors while reading the raw sources.
#[derive(Debug, Error)]
pub enum LoadError {
    /// An expected source file is absent.
    #[error("Missing source '{name}': {} not found", path.display())]
    MissingSource { name: String, path: PathBuf },

    /// The file exists but could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content is not valid in the declared encoding.
    #[error("Source '{name}' is not valid {encoding}")]
    Encoding { name: String, encoding: &'static str },

    /// Malformed row or unparseable typed field.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

// =============================================================================
// Transform Errors
// =============================================================================

/// Errors while cleaning, aggregating and joining.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A column the transform depends on is absent.
    #[error("Schema error: table '{table}' has no column '{column}'")]
    MissingColumn { table: String, column: String },

    /// The right side of a join holds the same key twice.
    #[error("Schema error: table '{table}' repeats key {key} in column '{column}'")]
    DuplicateKey {
        table: String,
        column: String,
        key: String,
    },

    /// A Date value could not be parsed.
    #[error("Parse error: table '{table}', line {line}: unparseable date '{value}'")]
    InvalidDate {
        table: String,
        line: usize,
        value: String,
    },

    /// An aggregated measure holds a non-numeric value.
    #[error("Parse error: table '{table}', line {line}, column '{column}': '{value}' is not numeric")]
    NonNumeric {
        table: String,
        column: String,
        line: usize,
        value: String,
    },
}

// =============================================================================
// Write Errors
// =============================================================================

/// Errors while persisting the enriched tables.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Output directory could not be created.
    #[error("Cannot create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File could not be written or moved into place.
    #[error("Cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization failed.
    #[error("Cannot serialize {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level error returned by [`crate::transform::pipeline::run_pipeline`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Load failed: {0}")]
    Load(#[from] LoadError),

    #[error("Transform failed: {0}")]
    Transform(#[from] TransformError),

    #[error("Write failed: {0}")]
    Write(#[from] WriteError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for the load stage.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for the transform stage.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for the write stage.
pub type WriteResult<T> = Result<T, WriteError>;

/// Result type for a full run.
pub type PipelineResult<T> = Result<T, PipelineError>;
