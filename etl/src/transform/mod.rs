//! Transformation module.
//!
//! This module turns the raw tables into the enriched outputs:
//! - Normalize: date parsing, Open imputation, StateHoliday coercion
//! - Join: hash left join on a key column
//! - Aggregate: per-State geo summary
//! - Merge: the ordered transform stage
//! - Pipeline: load → transform → write orchestration

pub mod aggregate;
pub mod join;
pub mod merge;
pub mod normalize;
pub mod pipeline;

pub use aggregate::{region_geo_summary, summarize_by_state, SUMMARY_COLUMNS};
pub use join::left_join;
pub use merge::{clean_and_merge, enrich_stores, EnrichedTables};
pub use pipeline::{run_pipeline, RunSummary};
