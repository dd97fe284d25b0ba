//! Integration tests for the Postgres stores.
//!
//! Tests verify:
//! 1. Detail upserts collide on null device/gender/age_group keys
//! 2. Summary upserts only touch naver_search_index
//! 3. AVG aggregation matches the in-memory store
//! 4. A row rejected mid-batch rolls back the whole detail upsert
//!
//! Prerequisites:
//! - PostgreSQL 15+ reachable via DATABASE_URL (set in .env)
//! - A scratch database: tests create the tables and delete rows with
//!   model_id >= 900000
//!
//! Run with: cargo test --test postgres_store -- --ignored --test-threads=1

use chrono::NaiveDate;
use postgres::Client;

use interest_etl::db::{self, DETAIL_TABLE, SUMMARY_TABLE};
use interest_etl::etl::run_aggregate;
use interest_etl::model::{DetailRow, MonthlyIndex};
use interest_etl::store::{CatalogStore, DetailStore, SummaryStore};

const TEST_MODEL_BASE: i64 = 900_000;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn setup_test_db() -> Client {
    dotenv::dotenv().ok();
    let url = db::database_url().expect("DATABASE_URL must be set");
    let mut client = db::connect(&url).expect("Failed to connect to test database");
    db::apply_schema(&mut client).expect("Failed to apply schema");
    cleanup_test_data(&mut client);
    client
}

fn cleanup_test_data(client: &mut Client) {
    let _ = client.execute(
        "DELETE FROM model_monthly_interest_detail WHERE model_id >= $1",
        &[&TEST_MODEL_BASE],
    );
    let _ = client.execute("DELETE FROM model_monthly_interest WHERE model_id >= $1", &[&TEST_MODEL_BASE]);
    let _ = client.execute("DELETE FROM car_model WHERE model_id >= $1", &[&TEST_MODEL_BASE]);
}

fn month() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn detail(model_id: i64, device: Option<&str>, ratio: f64) -> DetailRow {
    DetailRow {
        model_id,
        month: month(),
        device: device.map(String::from),
        gender: None,
        age_group: None,
        ratio,
    }
}

fn detail_count(client: &mut Client, model_id: i64) -> i64 {
    client
        .query_one(
            "SELECT COUNT(*) FROM model_monthly_interest_detail WHERE model_id = $1",
            &[&model_id],
        )
        .map(|row| row.get(0))
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
#[ignore = "requires DATABASE_URL"]
fn test_connect_and_verify_finds_tables() {
    setup_test_db();
    let result = db::connect_and_verify(&[db::CATALOG_TABLE, DETAIL_TABLE, SUMMARY_TABLE]);
    assert!(result.is_ok(), "tables should exist after apply_schema");

    match db::connect_and_verify(&["no_such_interest_table"]) {
        Err(e) => assert!(e.to_string().contains("missing table(s): no_such_interest_table")),
        Ok(_) => panic!("expected missing table error"),
    }
}

#[test]
#[ignore = "requires DATABASE_URL"]
fn test_catalog_filters_by_brand() {
    let mut client = setup_test_db();
    client
        .execute(
            "INSERT INTO car_model (model_id, brand_name, model_name_kr) VALUES
             ($1, '테스트브랜드', '나모델'), ($2, '테스트브랜드', '가모델'), ($3, '다른브랜드', '다모델')",
            &[&TEST_MODEL_BASE, &(TEST_MODEL_BASE + 1), &(TEST_MODEL_BASE + 2)],
        )
        .unwrap();

    let models = client.target_models(&["테스트브랜드".to_string()]).unwrap();
    let ids: Vec<i64> = models.iter().map(|m| m.model_id).collect();
    assert_eq!(ids, vec![TEST_MODEL_BASE + 1, TEST_MODEL_BASE]);

    cleanup_test_data(&mut client);
}

#[test]
#[ignore = "requires DATABASE_URL"]
fn test_detail_upsert_replaces_ratio_for_null_keys() {
    let mut client = setup_test_db();
    let id = TEST_MODEL_BASE + 10;

    client.upsert_details(&[detail(id, None, 10.0), detail(id, Some("pc"), 20.0)]).unwrap();
    client.upsert_details(&[detail(id, None, 15.0), detail(id, Some("pc"), 20.0)]).unwrap();

    assert_eq!(detail_count(&mut client, id), 2);
    let row = client
        .query_one(
            "SELECT ratio FROM model_monthly_interest_detail WHERE model_id = $1 AND device IS NULL",
            &[&id],
        )
        .unwrap();
    let ratio: f64 = row.get(0);
    assert_eq!(ratio, 15.0);

    cleanup_test_data(&mut client);
}

#[test]
#[ignore = "requires DATABASE_URL"]
fn test_rejected_row_rolls_back_whole_detail_batch() {
    let mut client = setup_test_db();
    let id = TEST_MODEL_BASE + 15;

    // Postgres text cannot hold NUL, so the second insert fails server-side
    let result = client.upsert_details(&[detail(id, Some("pc"), 10.0), detail(id, Some("a\0b"), 20.0)]);

    assert!(result.is_err());
    assert_eq!(detail_count(&mut client, id), 0);

    cleanup_test_data(&mut client);
}

#[test]
#[ignore = "requires DATABASE_URL"]
fn test_aggregate_preserves_unrelated_summary_columns() {
    let mut client = setup_test_db();
    let id = TEST_MODEL_BASE + 20;

    client
        .execute(
            "INSERT INTO model_monthly_interest
             (model_id, month, naver_search_index, google_trend_index, danawa_pop_rank, danawa_pop_rank_size)
             VALUES ($1, $2, 1.0, 77.0, 3, 120)",
            &[&id, &month()],
        )
        .unwrap();
    client
        .upsert_details(&[detail(id, Some("pc"), 40.0), detail(id, Some("mobile"), 60.0)])
        .unwrap();

    run_aggregate(&mut client).unwrap();

    let row = client
        .query_one(
            "SELECT naver_search_index, google_trend_index, danawa_pop_rank, danawa_pop_rank_size
             FROM model_monthly_interest WHERE model_id = $1 AND month = $2",
            &[&id, &month()],
        )
        .unwrap();
    let naver: Option<f64> = row.get(0);
    let google: Option<f64> = row.get(1);
    let rank: Option<i32> = row.get(2);
    let rank_size: Option<i32> = row.get(3);
    assert_eq!(naver, Some(50.0));
    assert_eq!(google, Some(77.0));
    assert_eq!(rank, Some(3));
    assert_eq!(rank_size, Some(120));

    cleanup_test_data(&mut client);
}

#[test]
#[ignore = "requires DATABASE_URL"]
fn test_null_means_are_not_written() {
    let mut client = setup_test_db();
    let id = TEST_MODEL_BASE + 30;

    let written = client
        .upsert_search_index(&[MonthlyIndex { model_id: id, month: month(), naver_index: None }])
        .unwrap();
    assert_eq!(written, 0);

    let count: i64 = client
        .query_one("SELECT COUNT(*) FROM model_monthly_interest WHERE model_id = $1", &[&id])
        .unwrap()
        .get(0);
    assert_eq!(count, 0);
}
