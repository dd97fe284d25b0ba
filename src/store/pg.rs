//! Postgres-backed stores: `postgres::Client` implements every store trait.

use postgres::Client;

use super::{CatalogStore, DetailStore, SummaryStore};
use crate::error::StoreError;
use crate::model::{CarModel, DetailRow, MonthlyIndex};

const SELECT_TARGET_MODELS: &str = "
    SELECT model_id::BIGINT, brand_name, model_name_kr
    FROM car_model
    WHERE brand_name = ANY($1)
    ORDER BY brand_name, model_name_kr
";

const UPSERT_DETAIL: &str = "
    INSERT INTO model_monthly_interest_detail
        (model_id, month, device, gender, age_group, ratio, created_at)
    VALUES ($1, $2, $3, $4, $5, $6, NOW())
    ON CONFLICT (model_id, month, device, gender, age_group)
    DO UPDATE SET ratio = EXCLUDED.ratio
";

const SELECT_MONTHLY_AVERAGES: &str = "
    SELECT model_id, month, AVG(ratio) AS naver_index
    FROM model_monthly_interest_detail
    GROUP BY model_id, month
    ORDER BY month, model_id
";

const UPSERT_SEARCH_INDEX: &str = "
    INSERT INTO model_monthly_interest
        (model_id, month, naver_search_index, google_trend_index,
         danawa_pop_rank, danawa_pop_rank_size, created_at)
    VALUES ($1, $2, $3, NULL, NULL, NULL, NOW())
    ON CONFLICT (model_id, month)
    DO UPDATE SET naver_search_index = EXCLUDED.naver_search_index
";

impl CatalogStore for Client {
    fn target_models(&mut self, brands: &[String]) -> Result<Vec<CarModel>, StoreError> {
        let rows = self.query(SELECT_TARGET_MODELS, &[&brands])?;

        Ok(rows
            .iter()
            .map(|row| CarModel {
                model_id: row.get(0),
                brand_name: row.get(1),
                model_name_kr: row.get(2),
            })
            .collect())
    }
}

impl DetailStore for Client {
    fn upsert_details(&mut self, rows: &[DetailRow]) -> Result<usize, StoreError> {
        let mut tx = self.transaction()?;
        let stmt = tx.prepare(UPSERT_DETAIL)?;

        for row in rows {
            tx.execute(
                &stmt,
                &[
                    &row.model_id,
                    &row.month,
                    &row.device,
                    &row.gender,
                    &row.age_group,
                    &row.ratio,
                ],
            )?;
        }

        tx.commit()?;
        Ok(rows.len())
    }
}

impl SummaryStore for Client {
    fn monthly_averages(&mut self) -> Result<Vec<MonthlyIndex>, StoreError> {
        let rows = self.query(SELECT_MONTHLY_AVERAGES, &[])?;

        Ok(rows
            .iter()
            .map(|row| MonthlyIndex {
                model_id: row.get(0),
                month: row.get(1),
                naver_index: row.get(2),
            })
            .collect())
    }

    fn upsert_search_index(&mut self, rows: &[MonthlyIndex]) -> Result<usize, StoreError> {
        let mut tx = self.transaction()?;
        let stmt = tx.prepare(UPSERT_SEARCH_INDEX)?;
        let mut written = 0;

        for row in rows {
            let Some(index) = row.naver_index else {
                continue;
            };
            tx.execute(&stmt, &[&row.model_id, &row.month, &index])?;
            written += 1;
        }

        tx.commit()?;
        Ok(written)
    }
}
