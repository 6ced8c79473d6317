//! # Rossmann ETL - sales enrichment batch
//!
//! Joins Rossmann sales history with store attributes, store→State mapping and
//! State-level geo aggregates, and writes enriched train/test tables.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────────┐
//! │  5 raw CSVs │────▶│   Loader    │────▶│  Transform  │────▶│ train_clean.csv │
//! │ (UTF8/Lat1) │     │ (typed cols)│     │(join + agg) │     │ test_clean.csv  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rossmann_etl::{run_pipeline, EtlConfig, TracingSink};
//!
//! let summary = run_pipeline(&EtlConfig::default(), &TracingSink).unwrap();
//! println!("Enriched {} train rows", summary.train_rows);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Stage error types
//! - [`models`] - Tables, cells, geo records
//! - [`parser`] - Decoding, typed CSV parsing, source loading
//! - [`transform`] - Normalization, joins, aggregation, pipeline
//! - [`writer`] - CSV output
//! - [`logs`] - Injected progress sinks
//! - [`config`] - Paths and file names

// Core modules
pub mod config;
pub mod error;
pub mod logs;
pub mod models;

// Stages
pub mod parser;
pub mod transform;
pub mod writer;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::EtlConfig;

pub use error::{LoadError, PipelineError, TransformError, WriteError};

pub use logs::{LogEntry, LogLevel, LogSink, MemorySink, NullSink, Stage, TracingSink};

pub use models::{Cell, Column, ColumnType, GeoRecord, RegionGeoSummary, Table};

pub use parser::{load_raw_data, parse_table, ParseError, RawTables};

pub use transform::{clean_and_merge, left_join, region_geo_summary, run_pipeline, EnrichedTables, RunSummary};

pub use writer::save_processed_data;
