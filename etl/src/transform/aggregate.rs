//! Aggregate geo locations into one summary row per State.
//!
//! ```text
//! Geo rows (many per State)              Summary (one per State)
//! ┌──────┬─────┬───────────┬────────┐    ┌──────┬────────┬──────────────┬─────────────────┐
//! │ TH   │ 100 │ 50        │ ...    │    │ TH   │ 150.0  │ 120          │ ...             │
//! │ TH   │ 200 │ 70        │ ...    │ →  ├──────┼────────┼──────────────┼─────────────────┤
//! │ HE   │ 120 │ 10        │ ...    │    │ HE   │ 120.0  │ 10           │ ...             │
//! └──────┴─────┴───────────┴────────┘    └──────┴────────┴──────────────┴─────────────────┘
//!  State  elev  population               State  AvgElev  TotalPopulation
//! ```
//!
//! Means and sums skip nulls. Rows without a State are left out. Summary rows
//! are sorted by State.

use std::collections::BTreeMap;

use crate::error::{TransformError, TransformResult};
use crate::models::{Cell, Column, ColumnType, GeoRecord, RegionGeoSummary, Table, STATE};

// Source columns
pub const LAT: &str = "lat";
pub const LON: &str = "lon";
pub const OPENED_SUNDAY: &str = "opened_sunday";
pub const ELEVATION: &str = "elevation";
pub const POPULATION: &str = "population";
pub const NEAREST_HOTEL: &str = "nearest_hotel";
pub const NEAREST_RAILSTATION: &str = "nearest_railstation";

// Summary columns
pub const LAT_MEAN: &str = "LatMean";
pub const LON_MEAN: &str = "LonMean";
pub const OPENED_SUNDAY_SHARE: &str = "OpenedSundayShare";
pub const AVG_ELEVATION: &str = "AvgElevation";
pub const TOTAL_POPULATION: &str = "TotalPopulation";
pub const AVG_DISTANCE_HOTEL: &str = "AvgDistanceHotel";
pub const AVG_DISTANCE_RAIL: &str = "AvgDistanceRail";

/// Summary columns added to every store, in output order.
pub const SUMMARY_COLUMNS: [&str; 7] = [
    LAT_MEAN,
    LON_MEAN,
    OPENED_SUNDAY_SHARE,
    AVG_ELEVATION,
    TOTAL_POPULATION,
    AVG_DISTANCE_HOTEL,
    AVG_DISTANCE_RAIL,
];

fn numeric(table: &Table, row_idx: usize, col_idx: usize) -> TransformResult<Option<f64>> {
    let cell = &table.rows[row_idx][col_idx];
    match cell {
        Cell::Null => Ok(None),
        Cell::Int(_) | Cell::Float(_) => Ok(cell.as_f64()),
        other => Err(TransformError::NonNumeric {
            table: table.name.clone(),
            column: table.columns[col_idx].name.clone(),
            line: row_idx + 2,
            value: other.to_string(),
        }),
    }
}

/// Read the geo table into typed records.
pub fn geo_records(geo: &Table) -> TransformResult<Vec<GeoRecord>> {
    let state = geo.require_column(STATE)?;
    let lat = geo.require_column(LAT)?;
    let lon = geo.require_column(LON)?;
    let opened_sunday = geo.require_column(OPENED_SUNDAY)?;
    let elevation = geo.require_column(ELEVATION)?;
    let population = geo.require_column(POPULATION)?;
    let nearest_hotel = geo.require_column(NEAREST_HOTEL)?;
    let nearest_railstation = geo.require_column(NEAREST_RAILSTATION)?;

    (0..geo.len())
        .map(|row| {
            Ok(GeoRecord {
                state: geo.rows[row][state].to_text(),
                lat: numeric(geo, row, lat)?,
                lon: numeric(geo, row, lon)?,
                opened_sunday: numeric(geo, row, opened_sunday)?,
                elevation: numeric(geo, row, elevation)?,
                population: numeric(geo, row, population)?,
                nearest_hotel: numeric(geo, row, nearest_hotel)?,
                nearest_railstation: numeric(geo, row, nearest_railstation)?,
            })
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Accumulator for one State while grouping.
#[derive(Debug, Default)]
struct StateBuilder {
    lat: Mean,
    lon: Mean,
    opened_sunday: Mean,
    elevation: Mean,
    population: f64,
    nearest_hotel: Mean,
    nearest_railstation: Mean,
}

impl StateBuilder {
    fn add(&mut self, record: &GeoRecord) {
        self.lat.push(record.lat);
        self.lon.push(record.lon);
        self.opened_sunday.push(record.opened_sunday);
        self.elevation.push(record.elevation);
        self.population += record.population.unwrap_or(0.0);
        self.nearest_hotel.push(record.nearest_hotel);
        self.nearest_railstation.push(record.nearest_railstation);
    }

    fn build(self, state: String, integral_population: bool) -> RegionGeoSummary {
        let total_population = if integral_population {
            Cell::Int(self.population.round() as i64)
        } else {
            Cell::Float(self.population)
        };

        RegionGeoSummary {
            state,
            lat_mean: self.lat.value(),
            lon_mean: self.lon.value(),
            opened_sunday_share: self.opened_sunday.value(),
            avg_elevation: self.elevation.value(),
            total_population,
            avg_distance_hotel: self.nearest_hotel.value(),
            avg_distance_rail: self.nearest_railstation.value(),
        }
    }
}

/// Group records by State and reduce each group.
///
/// `integral_population` keeps TotalPopulation an integer.
pub fn summarize_by_state(records: &[GeoRecord], integral_population: bool) -> Vec<RegionGeoSummary> {
    let mut states: BTreeMap<&str, StateBuilder> = BTreeMap::new();

    for record in records {
        if let Some(state) = record.state.as_deref() {
            states.entry(state).or_default().add(record);
        }
    }

    states
        .into_iter()
        .map(|(state, builder)| builder.build(state.to_string(), integral_population))
        .collect()
}

/// Render summaries as a table keyed by State.
pub fn summary_table(summaries: &[RegionGeoSummary], population_kind: ColumnType) -> Table {
    let mut columns = vec![Column::new(STATE, ColumnType::Str)];
    columns.extend(SUMMARY_COLUMNS.iter().map(|name| {
        let kind = if *name == TOTAL_POPULATION { population_kind } else { ColumnType::Float };
        Column::new(*name, kind)
    }));

    let float = |v: Option<f64>| v.map(Cell::Float).unwrap_or(Cell::Null);

    let mut table = Table::new("region_geo_summary", columns);
    for s in summaries {
        table.push_row(vec![
            Cell::Str(s.state.clone()),
            float(s.lat_mean),
            float(s.lon_mean),
            float(s.opened_sunday_share),
            float(s.avg_elevation),
            s.total_population.clone(),
            float(s.avg_distance_hotel),
            float(s.avg_distance_rail),
        ]);
    }
    table
}

/// Build the per-State geo summary table from the raw geo table.
pub fn region_geo_summary(geo: &Table) -> TransformResult<Table> {
    let records = geo_records(geo)?;
    let population_kind = match geo.columns[geo.require_column(POPULATION)?].kind {
        ColumnType::Int => ColumnType::Int,
        _ => ColumnType::Float,
    };
    let summaries = summarize_by_state(&records, population_kind == ColumnType::Int);
    Ok(summary_table(&summaries, population_kind))
}
