//! Trend crawl: one API call per (model, device, gender), appended to the
//! run's raw CSV.
//!
//! A failed or empty call is logged and skipped; it never aborts the run.
//! The raw file is rewritten from scratch on every run.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;

use super::create_csv;
use crate::config::RunPaths;
use crate::error::EtlError;
use crate::ingest::{TrendQuery, TrendSource};
use crate::logging::log_fetch_failure;
use crate::model::{CarModel, DEVICE_OPTIONS, GENDER_OPTIONS, RAW_HEADER, RawTrendRecord, TimeUnit};
use crate::store::CatalogStore;

#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub time_unit: TimeUnit,
    /// `car_model.brand_name` values to crawl.
    pub brands: Vec<String>,
    /// Crawl only the first N catalog models.
    pub limit_models: Option<usize>,
    /// Pause after each successful, non-empty combination.
    pub sleep: Duration,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlSummary {
    pub models: usize,
    /// Calls that returned a response (empty or not).
    pub api_calls: usize,
    pub failed_calls: usize,
    pub empty_calls: usize,
    pub rows_written: usize,
    /// `None` when there was nothing to crawl and no file was written.
    pub output: Option<PathBuf>,
}

/// Crawl every target model and write `paths.raw_csv()`.
pub fn run_crawl<C, S>(
    catalog: &mut C,
    source: &S,
    paths: &RunPaths,
    options: &CrawlOptions,
) -> Result<CrawlSummary, EtlError>
where
    C: CatalogStore + ?Sized,
    S: TrendSource + ?Sized,
{
    log::info!(
        "Naver DataLab crawl start: run_id={}, period={} ~ {}, time_unit={}",
        paths.run_id(),
        options.start_date,
        options.end_date,
        options.time_unit
    );
    log::info!("Target brands: {:?}", options.brands);

    let mut models = catalog.target_models(&options.brands)?;
    if let Some(limit) = options.limit_models {
        models.truncate(limit);
    }

    let mut summary = CrawlSummary {
        models: models.len(),
        ..CrawlSummary::default()
    };

    if models.is_empty() {
        log::warn!("No target models found. Check the car_model table.");
        return Ok(summary);
    }

    log::info!("Models to crawl: {}", models.len());

    let out_path = paths.raw_csv();
    let mut writer = create_csv(&out_path, &RAW_HEADER)?;

    for (idx, model) in models.iter().enumerate() {
        log::info!(
            "({}/{}) Crawling [{}] {} (model_id={})",
            idx + 1,
            models.len(),
            model.brand_name,
            model.model_name_kr,
            model.model_id
        );

        for device in DEVICE_OPTIONS {
            for gender in GENDER_OPTIONS {
                let query = TrendQuery {
                    keyword: &model.model_name_kr,
                    start_date: options.start_date,
                    end_date: options.end_date,
                    time_unit: options.time_unit,
                    device: Some(device),
                    gender: Some(gender),
                    ages: &[],
                };

                let points = match source.fetch_trend(&query) {
                    Ok(points) => {
                        summary.api_calls += 1;
                        points
                    }
                    Err(e) => {
                        summary.failed_calls += 1;
                        log_fetch_failure(
                            &model.brand_name,
                            &model.model_name_kr,
                            device.code(),
                            gender.code(),
                            &e,
                        );
                        continue;
                    }
                };

                if points.is_empty() {
                    summary.empty_calls += 1;
                    log::warn!(
                        "No Naver data: [{}] {}, device={}, gender={}",
                        model.brand_name,
                        model.model_name_kr,
                        device.code(),
                        gender.code()
                    );
                    continue;
                }

                for point in points {
                    let (Some(period), Some(ratio)) = (point.period, point.ratio) else {
                        continue;
                    };
                    writer.serialize(raw_record(model, period, device.label(), gender.label(), ratio))?;
                    summary.rows_written += 1;
                }

                if !options.sleep.is_zero() {
                    thread::sleep(options.sleep);
                }
            }
        }
    }

    writer.flush()?;

    log::info!("Naver DataLab crawl complete: {}", out_path.display());
    log::info!("Total API calls: {}", summary.api_calls);

    summary.output = Some(out_path);
    Ok(summary)
}

fn raw_record(model: &CarModel, date: String, device: &str, gender: &str, ratio: f64) -> RawTrendRecord {
    RawTrendRecord {
        model_id: model.model_id,
        brand_name: model.brand_name.clone(),
        model_name: model.model_name_kr.clone(),
        date,
        device: device.to_string(),
        gender: gender.to_string(),
        // Age filtering is not requested yet.
        age_group: String::new(),
        ratio,
    }
}
