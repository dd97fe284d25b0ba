//! Normalized CSV → `model_monthly_interest_detail`.
//!
//! Every row is coerced before anything is written, then all rows go to the
//! store in one transaction: a bad row aborts the load with nothing
//! persisted.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;

use super::open_csv;
use crate::config::RunPaths;
use crate::error::EtlError;
use crate::model::DetailRow;
use crate::store::DetailStore;

/// A normalized CSV row as text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NormalizedCsvRow {
    pub model_id: String,
    pub month: String,
    pub device: String,
    pub gender: String,
    pub age_group: String,
    pub ratio: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadSummary {
    pub rows_upserted: usize,
    pub input: PathBuf,
}

fn empty_as_null(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Coerce one CSV row into a detail row. `line` is the 1-based file line,
/// used in the error.
pub fn to_detail_row(row: &NormalizedCsvRow, line: usize) -> Result<DetailRow, EtlError> {
    let invalid = |reason: String| EtlError::InvalidRecord { line, reason };

    let model_id = row
        .model_id
        .trim()
        .parse::<i64>()
        .map_err(|e| invalid(format!("model_id '{}': {}", row.model_id, e)))?;
    let month = NaiveDate::parse_from_str(row.month.trim(), "%Y-%m-%d")
        .map_err(|e| invalid(format!("month '{}': {}", row.month, e)))?;
    let ratio = row
        .ratio
        .trim()
        .parse::<f64>()
        .map_err(|e| invalid(format!("ratio '{}': {}", row.ratio, e)))?;
    if !ratio.is_finite() {
        return Err(invalid(format!("ratio '{}' is not finite", row.ratio)));
    }

    Ok(DetailRow {
        model_id,
        month,
        device: empty_as_null(&row.device),
        gender: empty_as_null(&row.gender),
        age_group: empty_as_null(&row.age_group),
        ratio,
    })
}

/// Upsert `paths.normalized_csv()` into the detail table.
pub fn load_run<S>(store: &mut S, paths: &RunPaths) -> Result<LoadSummary, EtlError>
where
    S: DetailStore + ?Sized,
{
    let csv_path = paths.normalized_csv();
    let mut reader = open_csv(&csv_path)?;
    log::info!("Loading: {}", csv_path.display());

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<NormalizedCsvRow>().enumerate() {
        let row = result?;
        // header is line 1
        rows.push(to_detail_row(&row, idx + 2)?);
    }

    let rows_upserted = store.upsert_details(&rows)?;
    log::info!("Detail table upsert complete: {} rows", rows_upserted);

    Ok(LoadSummary {
        rows_upserted,
        input: csv_path,
    })
}
