//! Raw crawl CSV → normalized detail CSV.
//!
//! Every raw row is turned into either a `NormalizedRecord` or a
//! `SkipReason`; only the records are written. Output depends on nothing but
//! the raw file, so re-running yields an identical file.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use super::{create_csv, open_csv};
use crate::config::RunPaths;
use crate::error::{EtlError, SkipReason};
use crate::logging::log_stage_summary;
use crate::model::{MONTH_DAY_SUFFIX, NORMALIZED_HEADER, NormalizedRecord};

/// A raw CSV row as text. Columns missing from the file read as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRow {
    pub model_id: String,
    pub date: String,
    pub device: String,
    pub gender: String,
    pub age_group: String,
    pub ratio: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeSummary {
    pub rows_read: usize,
    pub rows_written: usize,
    /// Skipped rows per `SkipReason::kind`.
    pub skipped: BTreeMap<&'static str, usize>,
    pub output: PathBuf,
}

impl NormalizeSummary {
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// `YYYY-MM-01` from the first seven characters of `date`, or `None` if the
/// string is shorter than that.
pub fn month_key(date: &str) -> Option<String> {
    let prefix: String = date.chars().take(7).collect();
    if prefix.chars().count() < 7 {
        return None;
    }
    Some(prefix + MONTH_DAY_SUFFIX)
}

/// Validate and reshape one raw row.
pub fn normalize_row(row: &RawRow) -> Result<NormalizedRecord, SkipReason> {
    let model_id_str = row.model_id.trim();
    let model_id: i64 = model_id_str
        .parse()
        .map_err(|_| SkipReason::InvalidModelId(model_id_str.to_string()))?;

    let date = row.date.trim();
    let ratio_str = row.ratio.trim();
    if date.is_empty() {
        return Err(SkipReason::MissingDate);
    }
    if ratio_str.is_empty() {
        return Err(SkipReason::MissingRatio);
    }

    let month = month_key(date).ok_or_else(|| SkipReason::ShortDate(date.to_string()))?;

    let ratio = ratio_str
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
        .ok_or_else(|| SkipReason::InvalidRatio(ratio_str.to_string()))?;

    Ok(NormalizedRecord {
        model_id,
        month,
        device: row.device.trim().to_string(),
        gender: row.gender.trim().to_string(),
        age_group: row.age_group.trim().to_string(),
        ratio,
    })
}

/// Normalize `paths.raw_csv()` into `paths.normalized_csv()`.
pub fn normalize_run(paths: &RunPaths) -> Result<NormalizeSummary, EtlError> {
    let raw_path = paths.raw_csv();
    let out_path = paths.normalized_csv();

    let mut reader = open_csv(&raw_path)?;
    log::info!("Loading raw CSV: {}", raw_path.display());

    let mut summary = NormalizeSummary {
        output: out_path.clone(),
        ..NormalizeSummary::default()
    };
    let mut records = Vec::new();

    for result in reader.deserialize::<RawRow>() {
        let row = result?;
        summary.rows_read += 1;

        match normalize_row(&row) {
            Ok(record) => records.push(record),
            Err(reason) => {
                if reason.is_warned() {
                    log::warn!("Skipping row: {}", reason);
                }
                *summary.skipped.entry(reason.kind()).or_insert(0) += 1;
            }
        }
    }

    if records.is_empty() {
        log::warn!("Normalization produced no rows.");
    } else {
        log::info!("Normalized records: {}", records.len());
    }

    let mut writer = create_csv(&out_path, &NORMALIZED_HEADER)?;
    for record in &records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    summary.rows_written = records.len();
    log::info!("Normalized CSV saved: {}", out_path.display());
    log_stage_summary("Normalize", summary.rows_read, summary.rows_written, summary.skipped_total());

    Ok(summary)
}
