//! Storage capabilities used by the pipeline stages.
//!
//! Each stage receives the store it needs as an explicit `&mut` handle.
//! `postgres::Client` implements all three traits; `MemoryStore` implements
//! them in memory so stages can be exercised without a database.

pub mod memory;
pub mod pg;

pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::model::{CarModel, DetailRow, MonthlyIndex};

/// Read-only access to the car model catalog.
pub trait CatalogStore {
    /// Models whose brand is in `brands`, ordered by brand then name.
    fn target_models(&mut self, brands: &[String]) -> Result<Vec<CarModel>, StoreError>;
}

/// Write access to the detail table.
pub trait DetailStore {
    /// Upsert every row inside one transaction. On key conflict only `ratio`
    /// is replaced. Returns the number of rows upserted.
    fn upsert_details(&mut self, rows: &[DetailRow]) -> Result<usize, StoreError>;
}

/// Read access to detail averages and write access to the summary table.
pub trait SummaryStore {
    /// Mean ratio per (model, month) over the whole detail table, ordered by
    /// month then model.
    fn monthly_averages(&mut self) -> Result<Vec<MonthlyIndex>, StoreError>;

    /// Upsert `naver_search_index` for each row whose mean is present, in one
    /// transaction. Other summary columns are never touched on conflict.
    /// Returns the number of rows written.
    fn upsert_search_index(&mut self, rows: &[MonthlyIndex]) -> Result<usize, StoreError>;
}
