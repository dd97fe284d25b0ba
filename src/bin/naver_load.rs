//! Upsert a run's normalized detail CSV into model_monthly_interest_detail.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use interest_etl::config::{RunPaths, Settings};
use interest_etl::db;
use interest_etl::etl::load_run;
use interest_etl::logging;

#[derive(Parser)]
#[command(name = "naver_load")]
#[command(about = "Naver interest detail loader")]
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
    let mut client = db::connect_and_verify(&[db::DETAIL_TABLE])?;
    load_run(&mut client, &paths)?;
    Ok(())
}
