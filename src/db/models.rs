//! Row types for the read queries in `queries.rs`.
//! Column names match the aliases in the summary templates.

use chrono::DateTime;

use crate::error::{AppError, Result};
use crate::types::ItemWindowSummary;

#[derive(Debug, sqlx::FromRow)]
pub struct SummaryRow {
    pub item_id: String,
    pub last_observed_at: i64,
    pub mean_price: f64,
    pub floor_price: f64,
    pub peak_price: f64,
    pub total_volume: i64,
}

impl TryFrom<SummaryRow> for ItemWindowSummary {
    type Error = AppError;

    fn try_from(row: SummaryRow) -> Result<Self> {
        let last_observed_at = DateTime::from_timestamp(row.last_observed_at, 0).ok_or_else(|| {
            AppError::source_unavailable(format!(
                "observed_at {} out of range for item {}",
                row.last_observed_at, row.item_id
            ))
        })?;

        Ok(ItemWindowSummary {
            item_id: row.item_id,
            last_observed_at,
            avg_price: row.mean_price,
            min_price: row.floor_price,
            max_price: row.peak_price,
            total_volume: row.total_volume,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct MetadataRow {
    pub value: String,
}
