//! Console and file logging for the pipeline stages.
//!
//! Installs a process-wide backend for the `log` facade. Console lines are
//! `[INFO] ...` / `[WARN] ...` on stdout and `[ERROR] ...` on stderr, with an
//! optional UTC timestamp prefix. When a log file is configured every record
//! is also appended there with its timestamp and target.

use chrono::Utc;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::Settings;
use crate::error::TrendError;

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - the API is throttling us
    Expected,
    /// Unexpected failure - credentials, request shape or API contract changed
    Unexpected,
    /// Unknown - network trouble or a server-side error
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

pub struct Logger {
    /// Minimum log level to display
    min_level: LevelFilter,
    /// Optional file path for logging
    log_file: Option<PathBuf>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
    /// Serializes appends to the log file
    file_lock: Mutex<()>,
}

impl Logger {
    pub fn new(min_level: LevelFilter, log_file: Option<PathBuf>, console_timestamps: bool) -> Self {
        Logger {
            min_level,
            log_file,
            console_timestamps,
            file_lock: Mutex::new(()),
        }
    }

    /// Console rendering of a record, or `None` if it is suppressed.
    fn console_line(&self, level: Level, message: &str) -> Option<String> {
        if self.console_timestamps {
            let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
            Some(format!("{} [{}] {}", timestamp, level_tag(level), message))
        } else if level >= Level::Debug {
            None
        } else {
            Some(format!("[{}] {}", level_tag(level), message))
        }
    }

    fn append_to_file(path: &Path, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.min_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = record.args().to_string();

        if let Some(line) = self.console_line(record.level(), &message) {
            match record.level() {
                Level::Error => eprintln!("{}", line),
                _ => println!("{}", line),
            }
        }

        if let Some(ref path) = self.log_file {
            let entry = file_entry(record.level(), record.target(), &message);
            let _guard = self.file_lock.lock().unwrap_or_else(|e| e.into_inner());
            if let Err(e) = Self::append_to_file(path, &entry) {
                eprintln!("Failed to write to log file {}: {}", path.display(), e);
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

/// Bracketed level tag used on every line.
pub fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

fn file_entry(level: Level, target: &str, message: &str) -> String {
    format!(
        "{} [{}] {}: {}",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        level_tag(level),
        target,
        message
    )
}

/// Install the global logger. Fails if a logger was already installed.
pub fn init_logger(
    min_level: LevelFilter,
    log_file: Option<&Path>,
    console_timestamps: bool,
) -> Result<(), SetLoggerError> {
    let logger = Logger::new(min_level, log_file.map(Path::to_path_buf), console_timestamps);
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(min_level);
    Ok(())
}

/// Install the global logger from the `[logging]` settings.
pub fn init_from_settings(settings: &Settings) -> Result<(), SetLoggerError> {
    init_logger(
        settings.log_level(),
        settings.logging.file.as_deref(),
        settings.logging.timestamps,
    )
}

// ---------------------------------------------------------------------------
// Fetch Failure Logging
// ---------------------------------------------------------------------------

/// Classify a failed trend API call.
pub fn classify_fetch_failure(err: &TrendError) -> FailureType {
    match err {
        TrendError::Http { status: 429, .. } => FailureType::Expected,
        TrendError::Http { status, .. } if (400..500).contains(status) => FailureType::Unexpected,
        TrendError::MissingCredentials | TrendError::Parse(_) => FailureType::Unexpected,
        TrendError::Http { .. } | TrendError::Transport(_) => FailureType::Unknown,
    }
}

/// Log a skipped (model, device, gender) combination. Always a warning:
/// the crawl carries on regardless of the classification.
pub fn log_fetch_failure(brand: &str, model_name: &str, device: &str, gender: &str, err: &TrendError) {
    log::warn!(
        "Naver API call failed [{}]: [{}] {}, device={}, gender={}, error={}",
        classify_fetch_failure(err),
        brand,
        model_name,
        device,
        gender,
        err
    );
}

// ---------------------------------------------------------------------------
// Stage Summary Logging
// ---------------------------------------------------------------------------

/// Log an end-of-stage tally.
pub fn log_stage_summary(stage: &str, total: usize, kept: usize, skipped: usize) {
    if skipped == 0 {
        log::info!("{} complete: {}/{} kept", stage, kept, total);
    } else {
        log::warn!("{} complete: {}/{} kept, {} skipped", stage, kept, total, skipped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter_ordering() {
        let logger = Logger::new(LevelFilter::Info, None, false);
        let warn = Metadata::builder().level(Level::Warn).build();
        let debug = Metadata::builder().level(Level::Debug).build();
        assert!(logger.enabled(&warn));
        assert!(!logger.enabled(&debug));
    }

    #[test]
    fn test_console_lines_are_prefixed() {
        let logger = Logger::new(LevelFilter::Debug, None, false);
        assert_eq!(
            logger.console_line(Level::Info, "loading").as_deref(),
            Some("[INFO] loading")
        );
        assert_eq!(
            logger.console_line(Level::Warn, "empty").as_deref(),
            Some("[WARN] empty")
        );
        assert_eq!(logger.console_line(Level::Debug, "noise"), None);
    }

    #[test]
    fn test_timestamped_console_keeps_debug() {
        let logger = Logger::new(LevelFilter::Debug, None, true);
        let line = logger.console_line(Level::Debug, "noise").unwrap();
        assert!(line.ends_with("[DEBUG] noise"));
        assert!(line.contains("UTC"));
    }

    #[test]
    fn test_file_sink_appends_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("etl.log");
        let logger = Logger::new(LevelFilter::Info, Some(path.clone()), false);

        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .target("interest_etl::etl::crawl")
                .args(format_args!("no data"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .target("interest_etl::etl::crawl")
                .args(format_args!("filtered out"))
                .build(),
        );

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("[WARN] interest_etl::etl::crawl: no data"));
    }

    #[test]
    fn test_failure_classification() {
        let throttled = TrendError::Http { status: 429, body: String::new() };
        assert_eq!(classify_fetch_failure(&throttled), FailureType::Expected);

        let unauthorized = TrendError::Http { status: 401, body: "auth".to_string() };
        assert_eq!(classify_fetch_failure(&unauthorized), FailureType::Unexpected);

        let server = TrendError::Http { status: 503, body: String::new() };
        assert_eq!(classify_fetch_failure(&server), FailureType::Unknown);

        let parse = TrendError::Parse("missing field `results`".to_string());
        assert_eq!(classify_fetch_failure(&parse), FailureType::Unexpected);
    }
}
