//! Detail table → `model_monthly_interest.naver_search_index`.
//!
//! The averages are read and the upserts written as two separate store
//! calls; a concurrent detail writer between them is not guarded against.

use crate::error::EtlError;
use crate::store::SummaryStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateSummary {
    /// (model, month) groups found in the detail table.
    pub groups: usize,
    pub rows_written: usize,
    /// Groups whose mean was null.
    pub rows_skipped: usize,
}

/// Average detail ratios per (model, month) and upsert them as the Naver
/// search index. Rows with a null mean are neither written nor cleared.
pub fn run_aggregate<S>(store: &mut S) -> Result<AggregateSummary, EtlError>
where
    S: SummaryStore + ?Sized,
{
    log::info!("Aggregating Naver detail into model_monthly_interest");

    let averages = store.monthly_averages()?;
    log::info!("Aggregated (model_id, month) groups: {}", averages.len());

    if averages.is_empty() {
        log::warn!("No aggregated rows. Check the detail table.");
        return Ok(AggregateSummary::default());
    }

    let rows_written = store.upsert_search_index(&averages)?;
    let summary = AggregateSummary {
        groups: averages.len(),
        rows_written,
        rows_skipped: averages.len() - rows_written,
    };

    log::info!(
        "model_monthly_interest upsert complete (rows={}, skipped={})",
        summary.rows_written,
        summary.rows_skipped
    );
    Ok(summary)
}
