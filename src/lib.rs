//! Search interest ETL for car models.
//!
//! Crawls Naver DataLab search trends per catalog model, normalizes them to a
//! monthly detail CSV, loads the detail rows into Postgres and rolls them up
//! into the monthly summary table.

pub mod config;
pub mod db;
pub mod error;
pub mod etl;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod store;
