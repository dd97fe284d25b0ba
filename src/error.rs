//! Error types for the interest pipeline.
//!
//! Fatal conditions (missing input file, database failure, a normalized row
//! the loader cannot coerce) surface as `EtlError` and abort the stage.
//! Per-call fetch failures (`TrendError`) and per-row normalization
//! rejections (`SkipReason`) are recovered by the stage that sees them.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single trend API call.
#[derive(Error, Debug)]
pub enum TrendError {
    #[error("Naver API credentials are not configured")]
    MissingCredentials,

    /// Non-2xx HTTP response.
    #[error("HTTP error: {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be deserialized.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Failure talking to the relational store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Postgres(#[from] postgres::Error),

    #[error("Database setup error: {0}")]
    Setup(String),
}

/// Invalid or unreadable configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to parse config {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },

    #[error("Invalid run id '{0}': must be non-empty and contain no path separators")]
    InvalidRunId(String),

    #[error("Missing environment variable {0}")]
    MissingEnv(&'static str),
}

/// Stage-level failure.
#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A normalized row that cannot be coerced for persistence.
    #[error("Invalid record on line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Why the normalizer dropped a raw row.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkipReason {
    #[error("model_id is not an integer: '{0}'")]
    InvalidModelId(String),

    #[error("date is empty")]
    MissingDate,

    #[error("ratio is empty")]
    MissingRatio,

    #[error("unexpected date format: '{0}'")]
    ShortDate(String),

    #[error("ratio is not a finite number: '{0}'")]
    InvalidRatio(String),
}

impl SkipReason {
    /// Stable short name, used for per-reason counters.
    pub fn kind(&self) -> &'static str {
        match self {
            SkipReason::InvalidModelId(_) => "invalid_model_id",
            SkipReason::MissingDate => "missing_date",
            SkipReason::MissingRatio => "missing_ratio",
            SkipReason::ShortDate(_) => "short_date",
            SkipReason::InvalidRatio(_) => "invalid_ratio",
        }
    }

    /// Whether this rejection is logged. Blank fields and bad ids are
    /// dropped quietly.
    pub fn is_warned(&self) -> bool {
        matches!(self, SkipReason::ShortDate(_) | SkipReason::InvalidRatio(_))
    }
}
