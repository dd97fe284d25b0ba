//! Service configuration and per-run file layout.
//!
//! Settings come from an optional TOML file, then environment variables
//! (loaded from `.env` by the binaries), then command-line flags. The
//! database URL is read separately by `db::database_url`.

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::model::TimeUnit;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "interest_etl.toml";

/// Subdirectory of the raw data root holding this source's runs.
pub const SOURCE_DIR: &str = "naver";

pub const DEFAULT_API_URL: &str = "https://openapi.naver.com/v1/datalab/search";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub naver: NaverSettings,
    pub crawl: CrawlSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Root of `<raw_dir>/naver/<run_id>/`.
    pub raw_dir: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("data/raw"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NaverSettings {
    pub api_url: String,
    pub timeout_secs: u64,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl Default for NaverSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
            client_id: None,
            client_secret: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlSettings {
    /// `car_model.brand_name` values to crawl.
    pub brands: Vec<String>,
    /// Delay after each successful model x filter combination.
    pub sleep_sec: f64,
    pub time_unit: TimeUnit,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            brands: vec!["현대".to_string(), "기아".to_string()],
            sleep_sec: 0.3,
            time_unit: TimeUnit::Month,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub file: Option<PathBuf>,
    pub timestamps: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            timestamps: false,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from `interest_etl.toml` in the working
    /// directory if it exists, or fall back to defaults. Environment
    /// overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
        let mut settings = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Settings::default()
                }
            }
        };
        settings.apply_env();
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Settings, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Settings, toml::de::Error> {
        toml::from_str(text)
    }

    fn apply_env(&mut self) {
        if let Ok(id) = env::var("NAVER_CLIENT_ID") {
            self.naver.client_id = Some(id);
        }
        if let Ok(secret) = env::var("NAVER_CLIENT_SECRET") {
            self.naver.client_secret = Some(secret);
        }
        if let Ok(dir) = env::var("INTEREST_DATA_DIR") {
            self.data.raw_dir = PathBuf::from(dir);
        }
    }

    /// Parse `logging.level`, defaulting to info on unknown values.
    pub fn log_level(&self) -> log::LevelFilter {
        self.logging.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

// ---------------------------------------------------------------------------
// Run paths
// ---------------------------------------------------------------------------

/// File locations for one crawl run: `<raw_dir>/naver/<run_id>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    run_id: String,
    dir: PathBuf,
}

impl RunPaths {
    pub fn new(raw_dir: &Path, run_id: &str) -> Result<RunPaths, ConfigError> {
        if !is_valid_run_id(run_id) {
            return Err(ConfigError::InvalidRunId(run_id.to_string()));
        }
        Ok(RunPaths {
            run_id: run_id.to_string(),
            dir: raw_dir.join(SOURCE_DIR).join(run_id),
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Crawler output: `naver_trend_<run_id>.csv`.
    pub fn raw_csv(&self) -> PathBuf {
        self.dir.join(format!("naver_trend_{}.csv", self.run_id))
    }

    /// Normalizer output: `naver_trend_<run_id>_detail_normalized.csv`.
    pub fn normalized_csv(&self) -> PathBuf {
        self.dir
            .join(format!("naver_trend_{}_detail_normalized.csv", self.run_id))
    }
}

fn is_valid_run_id(run_id: &str) -> bool {
    !run_id.is_empty()
        && run_id != "."
        && run_id != ".."
        && !run_id.contains(['/', '\\'])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
