//! End-to-end run: load → transform → write.
//!
//! # Example
//!
//! ```rust,ignore
//! use rossmann_etl::{run_pipeline, EtlConfig, TracingSink};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let summary = run_pipeline(&EtlConfig::default(), &TracingSink)?;
//!     println!("Wrote {} train rows", summary.train_rows);
//!     Ok(())
//! }
//! ```

use serde::Serialize;
use std::path::PathBuf;

use super::merge::clean_and_merge;
use crate::config::EtlConfig;
use crate::error::PipelineResult;
use crate::logs::LogSink;
use crate::parser::load_raw_data;
use crate::writer::save_processed_data;

/// What a completed run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub train_rows: usize,
    pub test_rows: usize,
    pub stores: usize,
    /// Distinct States in the geo data
    pub states: usize,
    /// Written files, train first
    pub outputs: Vec<PathBuf>,
}

/// Run the three stages in order.
///
/// Nothing is written unless both tables transformed successfully.
pub fn run_pipeline(config: &EtlConfig, sink: &dyn LogSink) -> PipelineResult<RunSummary> {
    let raw = load_raw_data(config, sink)?;
    let enriched = clean_and_merge(raw, sink)?;
    let outputs = save_processed_data(&enriched, config, sink)?;

    Ok(RunSummary {
        train_rows: enriched.train.len(),
        test_rows: enriched.test.len(),
        stores: enriched.store.len(),
        states: enriched.region_summary.len(),
        outputs,
    })
}
