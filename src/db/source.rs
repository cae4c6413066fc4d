use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::debug;

use crate::config::LAST_UPDATED_KEY;
use crate::db::models::{MetadataRow, SummaryRow};
use crate::db::queries::{window_summary, LAST_UPDATED_SQL};
use crate::error::{AppError, Result};
use crate::stats::WindowSpec;
use crate::types::{ItemWindowSummary, SortKey};

/// Read access to the pre-aggregated stats and the refresh metadata.
#[async_trait]
pub trait AggregateSource: Send + Sync {
    /// One summary per item over the trailing window, ordered by `sort`
    /// descending (ties by item id) and bounded to `max_rows`.
    async fn summarize(
        &self,
        window: &WindowSpec,
        sort: SortKey,
        max_rows: usize,
    ) -> Result<Vec<ItemWindowSummary>>;

    /// Raw `last_updated` value as written by the refresh job.
    async fn last_updated_raw(&self) -> Result<String>;
}

/// SQLite-backed source. Owns its pool handle; clones share the pool.
#[derive(Clone)]
pub struct SqliteSource {
    pool: SqlitePool,
}

impl SqliteSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Opens the stats database written by the refresh job. The file must
/// already exist: a wrong `DB_PATH` fails here instead of serving an empty
/// fresh database.
pub async fn open_pool(db_path: &str, max_connections: u32) -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(&format!("sqlite:{db_path}"))
        .await?;
    Ok(pool)
}

#[async_trait]
impl AggregateSource for SqliteSource {
    async fn summarize(
        &self,
        window: &WindowSpec,
        sort: SortKey,
        max_rows: usize,
    ) -> Result<Vec<ItemWindowSummary>> {
        let cutoff = Utc::now().timestamp() - window.span_secs();
        let limit = i64::try_from(max_rows).unwrap_or(i64::MAX);

        let rows: Vec<SummaryRow> = sqlx::query_as(window_summary(window.relation(), sort))
            .bind(cutoff)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::source_unavailable)?;

        debug!(
            relation = %window.relation(),
            hours = window.hours(),
            sort = %sort,
            rows = rows.len(),
            "window summary fetched"
        );

        rows.into_iter().map(ItemWindowSummary::try_from).collect()
    }

    async fn last_updated_raw(&self) -> Result<String> {
        let row: Option<MetadataRow> = sqlx::query_as(LAST_UPDATED_SQL)
            .bind(LAST_UPDATED_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::MetadataUnavailable(e.to_string()))?;

        row.map(|r| r.value)
            .ok_or_else(|| AppError::MetadataUnavailable(format!("no '{LAST_UPDATED_KEY}' row")))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::stats::Relation;

    /// Single-connection in-memory database with the schema applied.
    pub(crate) async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    pub(crate) async fn insert_period(
        pool: &SqlitePool,
        relation: Relation,
        item: &str,
        age_hours: i64,
        (avg, min, max): (f64, f64, f64),
        volume: i64,
    ) {
        let sql = match relation {
            Relation::ShortHorizon => {
                "INSERT INTO item_stats_48h (item_id, observed_at, avg_price, min_price, max_price, volume) VALUES (?, ?, ?, ?, ?, ?)"
            }
            Relation::LongHorizon => {
                "INSERT INTO item_stats_90d (item_id, observed_at, avg_price, min_price, max_price, volume) VALUES (?, ?, ?, ?, ?, ?)"
            }
        };
        let observed_at = Utc::now().timestamp() - age_hours * 3_600;
        sqlx::query(sql)
            .bind(item)
            .bind(observed_at)
            .bind(avg)
            .bind(min)
            .bind(max)
            .bind(volume)
            .execute(pool)
            .await
            .unwrap();
    }

    pub(crate) async fn set_last_updated(pool: &SqlitePool, value: &str) {
        sqlx::query("INSERT INTO metadata (key, value) VALUES ('last_updated', ?)")
            .bind(value)
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn aggregates_per_item_over_window() {
        let pool = memory_pool().await;
        let short = Relation::ShortHorizon;
        insert_period(&pool, short, "nova_prime_set", 1, (100.0, 90.0, 120.0), 4).await;
        insert_period(&pool, short, "nova_prime_set", 3, (200.0, 80.0, 260.0), 6).await;
        insert_period(&pool, short, "nova_prime_set", 30, (900.0, 900.0, 900.0), 100).await;
        insert_period(&pool, short, "loki_prime_set", 2, (50.0, 40.0, 55.0), 1).await;

        let source = SqliteSource::new(pool);
        let window = WindowSpec::resolve(24).unwrap();
        let rows = source.summarize(&window, SortKey::AveragePrice, 10).await.unwrap();

        assert_eq!(rows.len(), 2);
        let nova = &rows[0];
        assert_eq!(nova.item_id, "nova_prime_set");
        assert_eq!(nova.avg_price, 150.0);
        assert_eq!(nova.min_price, 80.0);
        assert_eq!(nova.max_price, 260.0);
        assert_eq!(nova.total_volume, 10);
        assert!(Utc::now() - nova.last_observed_at < chrono::Duration::minutes(70));
        assert_eq!(rows[1].item_id, "loki_prime_set");
    }

    #[tokio::test]
    async fn wider_window_includes_older_periods() {
        let pool = memory_pool().await;
        let short = Relation::ShortHorizon;
        insert_period(&pool, short, "nova_prime_set", 1, (100.0, 100.0, 100.0), 4).await;
        insert_period(&pool, short, "nova_prime_set", 30, (300.0, 300.0, 300.0), 6).await;

        let source = SqliteSource::new(pool);
        let rows = source
            .summarize(&WindowSpec::resolve(48).unwrap(), SortKey::TotalVolume, 10)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].avg_price, 200.0);
        assert_eq!(rows[0].total_volume, 10);
    }

    #[tokio::test]
    async fn long_windows_read_the_daily_relation() {
        let pool = memory_pool().await;
        insert_period(&pool, Relation::ShortHorizon, "only_short", 1, (1.0, 1.0, 1.0), 1).await;
        insert_period(&pool, Relation::LongHorizon, "only_long", 24 * 5, (2.0, 2.0, 2.0), 2).await;

        let source = SqliteSource::new(pool);
        let rows = source
            .summarize(&WindowSpec::resolve(168).unwrap(), SortKey::TotalVolume, 10)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item_id, "only_long");
    }

    #[tokio::test]
    async fn orders_by_volume_and_applies_limit() {
        let pool = memory_pool().await;
        let short = Relation::ShortHorizon;
        for (item, volume) in [("a", 5), ("b", 50), ("c", 20), ("d", 50)] {
            insert_period(&pool, short, item, 1, (1.0, 1.0, 1.0), volume).await;
        }

        let source = SqliteSource::new(pool);
        let rows = source
            .summarize(&WindowSpec::resolve(24).unwrap(), SortKey::TotalVolume, 3)
            .await
            .unwrap();

        let ids: Vec<_> = rows.iter().map(|r| r.item_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "c"]);
    }

    #[tokio::test]
    async fn empty_window_is_not_an_error() {
        let source = SqliteSource::new(memory_pool().await);
        let rows = source
            .summarize(&WindowSpec::resolve(2160).unwrap(), SortKey::AveragePrice, 10)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn closed_pool_is_source_unavailable() {
        let pool = memory_pool().await;
        pool.close().await;

        let source = SqliteSource::new(pool);
        let err = source
            .summarize(&WindowSpec::resolve(24).unwrap(), SortKey::AveragePrice, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn missing_database_file_is_refused() {
        let path = std::env::temp_dir().join(format!("voidwatch-absent-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let err = open_pool(path.to_str().unwrap(), 1).await.unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
        assert!(!path.exists(), "open_pool must not create the file");
    }

    #[tokio::test]
    async fn existing_database_file_opens() {
        let path = std::env::temp_dir().join(format!("voidwatch-present-{}.db", std::process::id()));
        std::fs::write(&path, b"").unwrap();

        let pool = open_pool(path.to_str().unwrap(), 1).await.unwrap();
        sqlx::query("SELECT 1").execute(&pool).await.unwrap();
        pool.close().await;

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn last_updated_missing_row() {
        let source = SqliteSource::new(memory_pool().await);
        let err = source.last_updated_raw().await.unwrap_err();
        assert!(matches!(err, AppError::MetadataUnavailable(_)));
    }

    #[tokio::test]
    async fn last_updated_returns_raw_value() {
        let pool = memory_pool().await;
        set_last_updated(&pool, "2025-07-17T14:05:09.123456").await;
        let source = SqliteSource::new(pool);
        assert_eq!(source.last_updated_raw().await.unwrap(), "2025-07-17T14:05:09.123456");
    }
}
