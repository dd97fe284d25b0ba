//! Crawl Naver DataLab search trends for catalog car models into the run's
//! raw CSV.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;

use interest_etl::config::{RunPaths, Settings};
use interest_etl::db;
use interest_etl::etl::{CrawlOptions, run_crawl};
use interest_etl::ingest::NaverDatalabClient;
use interest_etl::logging;
use interest_etl::model::TimeUnit;

#[derive(Parser)]
#[command(name = "naver_crawl")]
#[command(about = "Naver DataLab interest crawl (car_model based, device x gender detail)")]
struct Args {
    /// Run identifier, e.g. 25_11_16
    #[arg(long)]
    run_id: String,
    /// First day of the period (YYYY-MM-DD)
    #[arg(long)]
    start_date: NaiveDate,
    /// Last day of the period (YYYY-MM-DD)
    #[arg(long)]
    end_date: NaiveDate,
    /// DataLab timeUnit [config default: month]
    #[arg(long, value_enum)]
    time_unit: Option<TimeUnit>,
    /// car_model.brand_name values to crawl [config default: 현대 기아]
    #[arg(long, num_args = 1..)]
    brands: Option<Vec<String>>,
    /// Only crawl the first N models (for testing)
    #[arg(long)]
    limit_models: Option<usize>,
    /// Delay in seconds after each model x filter combination [config default: 0.3]
    #[arg(long)]
    sleep_sec: Option<f64>,
    /// Path to interest_etl.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref())?;
    logging::init_from_settings(&settings)?;

    let paths = RunPaths::new(&settings.data.raw_dir, &args.run_id)?;
    let sleep_sec = args.sleep_sec.unwrap_or(settings.crawl.sleep_sec);
    let options = CrawlOptions {
        start_date: args.start_date,
        end_date: args.end_date,
        time_unit: args.time_unit.unwrap_or(settings.crawl.time_unit),
        brands: args.brands.unwrap_or_else(|| settings.crawl.brands.clone()),
        limit_models: args.limit_models,
        sleep: Duration::try_from_secs_f64(sleep_sec)
            .with_context(|| format!("invalid sleep interval: {}", sleep_sec))?,
    };

    let mut client = db::connect_and_verify(&[db::CATALOG_TABLE])?;
    let source = NaverDatalabClient::new(&settings.naver)?;

    run_crawl(&mut client, &source, &paths, &options)?;
    Ok(())
}
