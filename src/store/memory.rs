//! In-memory store with the same upsert semantics as the Postgres tables.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{CatalogStore, DetailStore, SummaryStore};
use crate::error::StoreError;
use crate::model::{CarModel, DetailKey, DetailRow, MonthlyIndex, SummaryRow};

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    catalog: Vec<CarModel>,
    details: BTreeMap<DetailKey, f64>,
    summary: BTreeMap<(i64, NaiveDate), SummaryRow>,
    summary_writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_models(models: Vec<CarModel>) -> Self {
        Self {
            catalog: models,
            ..Self::default()
        }
    }

    /// Seed a summary row as another pipeline would have written it.
    pub fn insert_summary_row(&mut self, model_id: i64, month: NaiveDate, row: SummaryRow) {
        self.summary.insert((model_id, month), row);
    }

    pub fn summary_row(&self, model_id: i64, month: NaiveDate) -> Option<&SummaryRow> {
        self.summary.get(&(model_id, month))
    }

    pub fn summary_len(&self) -> usize {
        self.summary.len()
    }

    /// Number of summary upserts performed so far.
    pub fn summary_writes(&self) -> usize {
        self.summary_writes
    }

    pub fn detail_ratio(&self, key: &DetailKey) -> Option<f64> {
        self.details.get(key).copied()
    }

    pub fn detail_len(&self) -> usize {
        self.details.len()
    }
}

impl CatalogStore for MemoryStore {
    fn target_models(&mut self, brands: &[String]) -> Result<Vec<CarModel>, StoreError> {
        let mut models: Vec<CarModel> = self
            .catalog
            .iter()
            .filter(|m| brands.contains(&m.brand_name))
            .cloned()
            .collect();
        models.sort_by(|a, b| {
            (&a.brand_name, &a.model_name_kr).cmp(&(&b.brand_name, &b.model_name_kr))
        });
        Ok(models)
    }
}

impl DetailStore for MemoryStore {
    fn upsert_details(&mut self, rows: &[DetailRow]) -> Result<usize, StoreError> {
        for row in rows {
            self.details.insert(row.key(), row.ratio);
        }
        Ok(rows.len())
    }
}

impl SummaryStore for MemoryStore {
    fn monthly_averages(&mut self) -> Result<Vec<MonthlyIndex>, StoreError> {
        let mut groups: BTreeMap<(NaiveDate, i64), (f64, usize)> = BTreeMap::new();
        for (key, ratio) in &self.details {
            let entry = groups.entry((key.month, key.model_id)).or_insert((0.0, 0));
            entry.0 += ratio;
            entry.1 += 1;
        }

        Ok(groups
            .into_iter()
            .map(|((month, model_id), (sum, count))| MonthlyIndex {
                model_id,
                month,
                naver_index: Some(sum / count as f64),
            })
            .collect())
    }

    fn upsert_search_index(&mut self, rows: &[MonthlyIndex]) -> Result<usize, StoreError> {
        let mut written = 0;
        for row in rows {
            let Some(index) = row.naver_index else {
                continue;
            };
            self.summary
                .entry((row.model_id, row.month))
                .or_default()
                .naver_search_index = Some(index);
            written += 1;
        }
        self.summary_writes += written;
        Ok(written)
    }
}
