//! The transform stage: clean both sales tables, then enrich them.
//!
//! ```text
//! store ⟕ store_states (Store) ⟕ region_geo_summary (State)  →  enriched store
//! train ⟕ enriched store (Store)                              →  train_clean
//! test  ⟕ enriched store (Store)                              →  test_clean
//! ```

use super::aggregate::region_geo_summary;
use super::join::left_join;
use super::normalize::{coerce_to_string, fill_null_with_zero, parse_date_column};
use crate::error::TransformResult;
use crate::logs::{log_info, log_success, log_warning, LogSink, Stage};
use crate::models::{Table, DATE, OPEN, STATE, STATE_HOLIDAY, STORE};
use crate::parser::RawTables;

/// Output of the transform stage
#[derive(Debug, Clone)]
pub struct EnrichedTables {
    /// Train sales with store, state and geo columns
    pub train: Table,
    /// Test sales with store, state and geo columns
    pub test: Table,
    /// One row per store, with State and the geo summary columns
    pub store: Table,
    /// One row per State present in the geo data
    pub region_summary: Table,
}

/// Count rows whose `column` is null.
fn null_count(table: &Table, column: &str) -> usize {
    table
        .column_values(column)
        .map(|values| values.iter().filter(|c| c.is_null()).count())
        .unwrap_or(0)
}

/// Steps 1-3: dates, Open imputation (test only), StateHoliday as text.
fn clean_sales(table: &mut Table, fill_open: bool, sink: &dyn LogSink) -> TransformResult<()> {
    parse_date_column(table, DATE)?;

    if fill_open {
        let filled = fill_null_with_zero(table, OPEN)?;
        if filled > 0 {
            log_info(sink, Stage::Transform, format!("{}: filled {} missing Open values with 0", table.name, filled));
        }
    }

    coerce_to_string(table, STATE_HOLIDAY)
}

/// Store attributes enriched with State and the per-State geo summary.
pub fn enrich_stores(store: &Table, store_states: &Table, geo: &Table) -> TransformResult<(Table, Table)> {
    // State must come from the mapping; without it the second join has no key
    store_states.require_column(STATE)?;
    store.require_column(STORE)?;

    let with_state = left_join(store, store_states, STORE)?;
    let summary = region_geo_summary(geo)?;
    let mut enriched = left_join(&with_state, &summary, STATE)?;
    enriched.name = "enriched_store".to_string();

    Ok((enriched, summary))
}

/// Clean the sales tables and join them with the enriched store table.
pub fn clean_and_merge(raw: RawTables, sink: &dyn LogSink) -> TransformResult<EnrichedTables> {
    let RawTables {
        mut train,
        mut test,
        store,
        store_states,
        geo,
    } = raw;

    // Fail on a missing join key before doing any work
    train.require_column(STORE)?;
    test.require_column(STORE)?;

    clean_sales(&mut train, false, sink)?;
    clean_sales(&mut test, true, sink)?;
    log_info(sink, Stage::Transform, "Parsed dates and normalized StateHoliday");

    let (enriched_store, region_summary) = enrich_stores(&store, &store_states, &geo)?;
    log_info(
        sink,
        Stage::Transform,
        format!(
            "Built {} state geo summaries for {} stores",
            region_summary.len(),
            enriched_store.len()
        ),
    );

    let unmapped = null_count(&enriched_store, STATE);
    if unmapped > 0 {
        log_warning(sink, Stage::Transform, format!("{} stores have no State mapping", unmapped));
    }

    let train = left_join(&train, &enriched_store, STORE)?;
    let test = left_join(&test, &enriched_store, STORE)?;

    log_success(
        sink,
        Stage::Transform,
        "Cleaned and merged datasets, including state-level geo features.",
    );

    Ok(EnrichedTables {
        train,
        test,
        store: enriched_store,
        region_summary,
    })
}
