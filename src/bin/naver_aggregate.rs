//! Roll model_monthly_interest_detail up into
//! model_monthly_interest.naver_search_index.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use interest_etl::config::Settings;
use interest_etl::db;
use interest_etl::etl::run_aggregate;
use interest_etl::logging;

#[derive(Parser)]
#[command(name = "naver_aggregate")]
#[command(about = "model_monthly_interest_detail -> model_monthly_interest (naver_search_index)")]
struct Args {
    /// Path to interest_etl.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref())?;
    logging::init_from_settings(&settings)?;

    let mut client = db::connect_and_verify(&[db::DETAIL_TABLE, db::SUMMARY_TABLE])?;
    run_aggregate(&mut client)?;
    log::info!("Naver interest aggregation complete");
    Ok(())
}
