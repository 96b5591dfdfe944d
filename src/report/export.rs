//! report::export — CSV export of simulation series and coefficient tables.
//!
//! Rows are `serde::Serialize` structs written with `csv::Writer`, so the
//! header is derived from the field names.
use std::{fs::File, io::Write, path::Path};

use serde::Serialize;

use crate::{
    data::errors::{DataError, DataResult},
    models::fitted::{CoefficientRow, FittedModel},
    simulation::monte_carlo::CltPanel,
};

#[derive(Debug, Serialize)]
struct SeriesRow {
    draw: usize,
    cumulative_average: f64,
}

#[derive(Debug, Serialize)]
struct PanelRow {
    sample_size: usize,
    replicate: usize,
    mean_difference: f64,
}

#[derive(Debug, Serialize)]
struct CoefficientCsvRow<'a> {
    model: &'a str,
    term: &'a str,
    estimate: f64,
    std_error: Option<f64>,
    statistic: Option<f64>,
    p_value: Option<f64>,
}

/// Write a running-average series as `draw,cumulative_average`.
pub fn write_series<W: Write>(writer: W, series: &[f64]) -> DataResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (i, &value) in series.iter().enumerate() {
        wtr.serialize(SeriesRow { draw: i + 1, cumulative_average: value })?;
    }
    flush(wtr)
}

/// Write CLT panels in long format `sample_size,replicate,mean_difference`.
pub fn write_clt_panels<W: Write>(writer: W, panels: &[CltPanel]) -> DataResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for panel in panels {
        for (replicate, &mean_difference) in panel.differences.iter().enumerate() {
            wtr.serialize(PanelRow { sample_size: panel.sample_size, replicate, mean_difference })?;
        }
    }
    flush(wtr)
}

/// Coefficient rows of one fitted model, labeled for export.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientTable {
    pub model: String,
    pub rows: Vec<CoefficientRow>,
}

impl CoefficientTable {
    /// Label a fit with `model` and collect its rows.
    pub fn from_fit(model: &str, fit: &FittedModel) -> Self {
        Self { model: model.to_string(), rows: fit.coefficient_table() }
    }
}

/// Write coefficient tables in long format
/// `model,term,estimate,std_error,statistic,p_value`; unusable standard
/// errors are empty cells.
pub fn write_coefficients<W: Write>(writer: W, tables: &[CoefficientTable]) -> DataResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for table in tables {
        for row in &table.rows {
            wtr.serialize(CoefficientCsvRow {
                model: &table.model,
                term: &row.name,
                estimate: row.estimate,
                std_error: row.std_error.value(),
                statistic: row.statistic,
                p_value: row.p_value,
            })?;
        }
    }
    flush(wtr)
}

/// Create `path` and write the coefficient tables to it.
pub fn export_coefficients(path: &Path, tables: &[CoefficientTable]) -> DataResult<()> {
    write_coefficients(create(path)?, tables)
}

/// Create `path` and write the running-average series to it.
pub fn export_series(path: &Path, series: &[f64]) -> DataResult<()> {
    write_series(create(path)?, series)
}

fn create(path: &Path) -> DataResult<File> {
    File::create(path).map_err(|e| DataError::Io { path: path.to_path_buf(), message: e.to_string() })
}

fn flush<W: Write>(mut wtr: csv::Writer<W>) -> DataResult<()> {
    wtr.flush().map_err(|e| DataError::Csv { message: e.to_string() })
}
