use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::db::AggregateSource;
use crate::error::{AppError, Result};
use crate::stats::{project, rank, LastUpdated, WindowSpec};
use crate::types::{DisplayTable, ItemWindowSummary, PageData, QueryIntent, SortPreference};

/// Builds the ranked tables for one page request. Holds no state besides the
/// source handle and its settings, so one instance serves all requests.
pub struct Dashboard {
    source: Arc<dyn AggregateSource>,
    result_limit: usize,
    query_timeout: Duration,
}

impl Dashboard {
    pub fn new(source: Arc<dyn AggregateSource>, result_limit: usize, query_timeout: Duration) -> Self {
        Self {
            source,
            result_limit,
            query_timeout,
        }
    }

    /// Over-fetches per the intent, then ranks and bounds to `limit`.
    pub async fn ranked(
        &self,
        window: &WindowSpec,
        intent: QueryIntent,
        limit: usize,
    ) -> Result<Vec<ItemWindowSummary>> {
        let candidates = intent.candidate_count(limit);
        let fetch = self.source.summarize(window, intent.sort_key(), candidates);

        let rows = tokio::time::timeout(self.query_timeout, fetch)
            .await
            .map_err(|_| {
                AppError::source_unavailable(format!(
                    "{intent} over {}h timed out after {:?}",
                    window.hours(),
                    self.query_timeout
                ))
            })??;

        let fetched = rows.len();
        let ranked = rank(rows, intent, limit);
        debug!(
            intent = %intent,
            hours = window.hours(),
            fetched,
            kept = ranked.len(),
            "ranking complete"
        );
        Ok(ranked)
    }

    pub async fn table(&self, window: &WindowSpec, intent: QueryIntent) -> Result<DisplayTable> {
        let rows = self.ranked(window, intent, self.result_limit).await?;
        Ok(project(rows, intent.title(), window.hours()))
    }

    pub async fn last_updated(&self) -> Result<LastUpdated> {
        let raw = tokio::time::timeout(self.query_timeout, self.source.last_updated_raw())
            .await
            .map_err(|_| {
                AppError::MetadataUnavailable(format!(
                    "lookup timed out after {:?}",
                    self.query_timeout
                ))
            })??;
        Ok(LastUpdated::from_raw(&raw))
    }

    /// All three tables plus the refresh time. A rejected window fails before
    /// any query runs; a failed ranking fails the page; missing metadata
    /// degrades to an empty string.
    pub async fn page(&self, hours: i64, sort_by: SortPreference) -> Result<PageData> {
        let window = WindowSpec::resolve(hours)?;

        let (top_performer, top_seller, top_traded) = tokio::try_join!(
            self.table(&window, QueryIntent::ByPrice),
            self.table(&window, QueryIntent::ByVolumeSellers),
            self.table(&window, QueryIntent::ByVolumeTraded),
        )
        .inspect_err(|e| error!(hours, "ranking failed: {e}"))?;

        let last_updated = match self.last_updated().await {
            Ok(v) => v.into_string(),
            Err(e) => {
                warn!("last_updated lookup failed, leaving it blank: {e}");
                String::new()
            }
        };

        Ok(PageData {
            hours,
            sort_by,
            top_performer,
            top_seller,
            top_traded,
            last_updated,
        })
    }
}
