use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

// ---------------------------------------------------------------------------
// Per-item window summary
// ---------------------------------------------------------------------------

/// One row per item for a single window query. Built fresh from the source
/// each request and dropped after projection.
///
/// `min_price <= avg_price <= max_price` holds for sane upstream data but is
/// not checked here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemWindowSummary {
    pub item_id: String,
    /// Latest observation inside the window.
    pub last_observed_at: DateTime<Utc>,
    /// Mean of the per-period averages.
    pub avg_price: f64,
    /// Minimum of the per-period minimums.
    pub min_price: f64,
    /// Maximum of the per-period maximums.
    pub max_price: f64,
    /// Sum of the per-period volumes.
    pub total_volume: i64,
}

// ---------------------------------------------------------------------------
// Ranking intents
// ---------------------------------------------------------------------------

/// Column a ranking orders by (always descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    AveragePrice,
    TotalVolume,
}

impl SortKey {
    /// Descending by key, then `item_id` ascending so equal keys come out in
    /// the same order on every run.
    pub fn compare(self, a: &ItemWindowSummary, b: &ItemWindowSummary) -> Ordering {
        let primary = match self {
            SortKey::AveragePrice => b.avg_price.total_cmp(&a.avg_price),
            SortKey::TotalVolume => b.total_volume.cmp(&a.total_volume),
        };
        primary.then_with(|| a.item_id.cmp(&b.item_id))
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::AveragePrice => write!(f, "avg_price"),
            SortKey::TotalVolume => write!(f, "total_volume"),
        }
    }
}

/// What a ranked table is for. Sellers and traded currently behave the same
/// but are separate variants so their filter rules can diverge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryIntent {
    /// Highest average price, outliers above the ceiling removed.
    ByPrice,
    /// Highest traded volume.
    ByVolumeSellers,
    /// Most traded items by volume.
    ByVolumeTraded,
}

impl QueryIntent {
    pub fn sort_key(self) -> SortKey {
        match self {
            QueryIntent::ByPrice => SortKey::AveragePrice,
            QueryIntent::ByVolumeSellers | QueryIntent::ByVolumeTraded => SortKey::TotalVolume,
        }
    }

    /// Rows to request from the source for a final table of `limit` rows.
    pub fn candidate_count(self, limit: usize) -> usize {
        use crate::config::PRICE_OVERFETCH_FACTOR;
        match self {
            QueryIntent::ByPrice => limit.saturating_mul(PRICE_OVERFETCH_FACTOR),
            QueryIntent::ByVolumeSellers => limit,
            QueryIntent::ByVolumeTraded => limit,
        }
    }

    /// Post-filter applied to candidates before truncation.
    pub fn admits(self, row: &ItemWindowSummary) -> bool {
        use crate::config::OUTLIER_PRICE_CEILING;
        match self {
            QueryIntent::ByPrice => row.avg_price <= OUTLIER_PRICE_CEILING,
            QueryIntent::ByVolumeSellers => true,
            QueryIntent::ByVolumeTraded => true,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            QueryIntent::ByPrice => "Best Performing",
            QueryIntent::ByVolumeSellers => "Top Seller",
            QueryIntent::ByVolumeTraded => "Most Traded",
        }
    }
}

impl std::fmt::Display for QueryIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            QueryIntent::ByPrice => "by_price",
            QueryIntent::ByVolumeSellers => "by_volume_sellers",
            QueryIntent::ByVolumeTraded => "by_volume_traded",
        };
        write!(f, "{s}")
    }
}

/// Caller-facing sort switch. Only two-way: `volume` covers both volume
/// intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortPreference {
    #[default]
    Price,
    Volume,
}

impl SortPreference {
    /// `volume` selects volume, anything else falls back to price.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("volume") => SortPreference::Volume,
            _ => SortPreference::Price,
        }
    }
}

// ---------------------------------------------------------------------------
// Presentation records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayTable {
    pub title: String,
    pub rows: Vec<ItemWindowSummary>,
    pub hours: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageData {
    pub hours: i64,
    pub sort_by: SortPreference,
    pub top_performer: DisplayTable,
    pub top_seller: DisplayTable,
    pub top_traded: DisplayTable,
    /// Formatted refresh time, the raw stored value, or empty when unknown.
    pub last_updated: String,
}
