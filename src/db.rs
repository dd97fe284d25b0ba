//! Postgres connection helpers.
//!
//! Each stage opens one connection and hands it to the stage function as a
//! store; nothing in the library keeps a global connection.

use std::env;

use postgres::{Client, NoTls};

use crate::error::{ConfigError, StoreError};

/// Catalog table read by the crawler.
pub const CATALOG_TABLE: &str = "car_model";
/// Per-device/gender detail rows written by the loader.
pub const DETAIL_TABLE: &str = "model_monthly_interest_detail";
/// Monthly summary table the aggregator merges into.
pub const SUMMARY_TABLE: &str = "model_monthly_interest";

/// DDL for all three tables; safe to apply repeatedly.
pub const SCHEMA_SQL: &str = include_str!("../sql/001_interest_schema.sql");

/// Read `DATABASE_URL` from the environment (call `dotenv` first).
pub fn database_url() -> Result<String, ConfigError> {
    env::var("DATABASE_URL").map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))
}

pub fn connect(url: &str) -> Result<Client, StoreError> {
    Ok(Client::connect(url, NoTls)?)
}

/// Connect with `DATABASE_URL` and check that every table in `tables`
/// exists in the current search path.
pub fn connect_and_verify(tables: &[&str]) -> Result<Client, StoreError> {
    let url = database_url().map_err(|e| StoreError::Setup(e.to_string()))?;
    let mut client = connect(&url)?;

    let mut missing = Vec::new();
    for table in tables {
        let row = client.query_one("SELECT to_regclass($1::text) IS NOT NULL", &[table])?;
        let exists: bool = row.get(0);
        if !exists {
            missing.push(*table);
        }
    }

    if !missing.is_empty() {
        return Err(StoreError::Setup(format!(
            "missing table(s): {}. Apply sql/001_interest_schema.sql first.",
            missing.join(", ")
        )));
    }

    Ok(client)
}

/// Create the catalog, detail and summary tables if absent.
pub fn apply_schema(client: &mut Client) -> Result<(), StoreError> {
    client.batch_execute(SCHEMA_SQL)?;
    Ok(())
}
