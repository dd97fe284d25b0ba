//! Normalize a run's raw Naver trend CSV into the detail CSV.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use interest_etl::config::{RunPaths, Settings};
use interest_etl::etl::normalize_run;
use interest_etl::logging;

#[derive(Parser)]
#[command(name = "naver_normalize")]
#[command(about = "Naver interest detail normalization")]
struct Args {
    /// Run identifier, e.g. 25_11_16
    #[arg(long)]
    run_id: String,
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
    normalize_run(&paths)?;
    Ok(())
}
