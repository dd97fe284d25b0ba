//! Core data types for the car-model search interest pipeline.
//!
//! This module defines the shared domain model imported by all other modules:
//! catalog entries, trend points returned by the external API, and the row
//! shapes written at each stage (raw CSV, normalized CSV, detail table,
//! summary table). It contains no I/O.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// File layout constants
// ---------------------------------------------------------------------------

/// Column order of the raw crawl CSV.
pub const RAW_HEADER: [&str; 8] = [
    "model_id",
    "brand_name",
    "model_name",
    "date",
    "device",
    "gender",
    "age_group",
    "ratio",
];

/// Column order of the normalized detail CSV.
pub const NORMALIZED_HEADER: [&str; 6] = ["model_id", "month", "device", "gender", "age_group", "ratio"];

/// Day suffix appended to a `YYYY-MM` prefix to form the canonical month key.
pub const MONTH_DAY_SUFFIX: &str = "-01";

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// A car model from the `car_model` catalog table. Read-only to this pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarModel {
    pub model_id: i64,
    pub brand_name: String,
    /// Korean display name; doubles as the search keyword.
    pub model_name_kr: String,
}

// ---------------------------------------------------------------------------
// Trend query options
// ---------------------------------------------------------------------------

/// Time granularity of a trend series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Date,
    Week,
    #[default]
    Month,
}

impl TimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Date => "date",
            TimeUnit::Week => "week",
            TimeUnit::Month => "month",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device filter. The API code and the label written to CSV differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Pc,
    Mobile,
}

impl Device {
    /// Code sent to the trend API.
    pub fn code(&self) -> &'static str {
        match self {
            Device::Pc => "pc",
            Device::Mobile => "mo",
        }
    }

    /// Label stored in the raw CSV.
    pub fn label(&self) -> &'static str {
        match self {
            Device::Pc => "pc",
            Device::Mobile => "mobile",
        }
    }
}

/// Gender filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "m",
            Gender::Female => "f",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// Devices crawled for every model, in request order.
pub const DEVICE_OPTIONS: [Device; 2] = [Device::Pc, Device::Mobile];

/// Genders crawled for every model, in request order.
pub const GENDER_OPTIONS: [Gender; 2] = [Gender::Male, Gender::Female];

// ---------------------------------------------------------------------------
// Stage records
// ---------------------------------------------------------------------------

/// A single `(period, ratio)` point of a trend series.
///
/// Either field may be absent in the API payload; such points are dropped
/// by the crawler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub period: Option<String>,
    pub ratio: Option<f64>,
}

/// One row of the raw crawl CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawTrendRecord {
    pub model_id: i64,
    pub brand_name: String,
    pub model_name: String,
    pub date: String,
    pub device: String,
    pub gender: String,
    pub age_group: String,
    pub ratio: f64,
}

/// One row of the normalized detail CSV.
///
/// `month` is always `YYYY-MM-01`. Empty `device`/`gender`/`age_group`
/// mean "no filter applied".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub model_id: i64,
    pub month: String,
    pub device: String,
    pub gender: String,
    pub age_group: String,
    pub ratio: f64,
}

/// A detail table row as persisted. Empty CSV fields become `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub model_id: i64,
    pub month: NaiveDate,
    pub device: Option<String>,
    pub gender: Option<String>,
    pub age_group: Option<String>,
    pub ratio: f64,
}

impl DetailRow {
    /// The composite unique key of the detail table.
    pub fn key(&self) -> DetailKey {
        DetailKey {
            model_id: self.model_id,
            month: self.month,
            device: self.device.clone(),
            gender: self.gender.clone(),
            age_group: self.age_group.clone(),
        }
    }
}

/// `(model_id, month, device, gender, age_group)`; nulls compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DetailKey {
    pub model_id: i64,
    pub month: NaiveDate,
    pub device: Option<String>,
    pub gender: Option<String>,
    pub age_group: Option<String>,
}

/// Per-(model, month) mean ratio computed from the detail table.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyIndex {
    pub model_id: i64,
    pub month: NaiveDate,
    pub naver_index: Option<f64>,
}

/// A row of the wider `model_monthly_interest` summary table. Only
/// `naver_search_index` is owned by this pipeline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryRow {
    pub naver_search_index: Option<f64>,
    pub google_trend_index: Option<f64>,
    pub danawa_pop_rank: Option<i32>,
    pub danawa_pop_rank_size: Option<i32>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
