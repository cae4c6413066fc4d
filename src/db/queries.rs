//! Fixed query text for the read side. The relation and ORDER BY are chosen
//! from closed enums at compile time; the window cutoff and row limit are
//! always bound as parameters.

use crate::stats::Relation;
use crate::types::SortKey;

macro_rules! window_summary_sql {
    ($table:literal, $order:literal) => {
        concat!(
            "SELECT item_id,
                    MAX(observed_at) AS last_observed_at,
                    AVG(avg_price)   AS mean_price,
                    MIN(min_price)   AS floor_price,
                    MAX(max_price)   AS peak_price,
                    SUM(volume)      AS total_volume
             FROM ", $table, "
             WHERE observed_at >= ?1
             GROUP BY item_id
             ORDER BY ", $order, " DESC, item_id ASC
             LIMIT ?2"
        )
    };
}

const SHORT_BY_PRICE: &str = window_summary_sql!("item_stats_48h", "mean_price");
const SHORT_BY_VOLUME: &str = window_summary_sql!("item_stats_48h", "total_volume");
const LONG_BY_PRICE: &str = window_summary_sql!("item_stats_90d", "mean_price");
const LONG_BY_VOLUME: &str = window_summary_sql!("item_stats_90d", "total_volume");

pub const LAST_UPDATED_SQL: &str = "SELECT value FROM metadata WHERE key = ?1";

/// Grouped per-item summary over one relation, binds `(cutoff_secs, limit)`.
pub fn window_summary(relation: Relation, sort: SortKey) -> &'static str {
    match (relation, sort) {
        (Relation::ShortHorizon, SortKey::AveragePrice) => SHORT_BY_PRICE,
        (Relation::ShortHorizon, SortKey::TotalVolume) => SHORT_BY_VOLUME,
        (Relation::LongHorizon, SortKey::AveragePrice) => LONG_BY_PRICE,
        (Relation::LongHorizon, SortKey::TotalVolume) => LONG_BY_VOLUME,
    }
}
