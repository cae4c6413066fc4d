use crate::error::{AppError, Result};

/// Pre-aggregated relation backing a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Fine-grained periods, covers the last 48 hours.
    ShortHorizon,
    /// Daily periods, covers the last 90 days.
    LongHorizon,
}

impl Relation {
    /// Fixed allowlist. Intermediate values such as 72 are not supported.
    pub fn for_window(hours: i64) -> Option<Self> {
        match hours {
            24 | 48 => Some(Relation::ShortHorizon),
            168 | 336 | 720 | 2160 => Some(Relation::LongHorizon),
            _ => None,
        }
    }

    pub fn table_name(self) -> &'static str {
        match self {
            Relation::ShortHorizon => "item_stats_48h",
            Relation::LongHorizon => "item_stats_90d",
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.table_name())
    }
}

/// A validated window. The hours that picked the relation are the same hours
/// the aggregator filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec {
    hours: i64,
    relation: Relation,
}

impl WindowSpec {
    pub fn resolve(hours: i64) -> Result<Self> {
        let relation = Relation::for_window(hours).ok_or(AppError::InvalidWindow(hours))?;
        Ok(Self { hours, relation })
    }

    pub fn hours(&self) -> i64 {
        self.hours
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    /// Trailing window length in seconds.
    pub fn span_secs(&self) -> i64 {
        self.hours * 3_600
    }
}
