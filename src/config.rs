use std::time::Duration;

use crate::error::{AppError, Result};

/// Window used when the caller sends no (or a non-numeric) `hours` value.
pub const DEFAULT_WINDOW_HOURS: i64 = 24;

/// Items averaging above this price are dropped from the price ranking only.
/// Same currency unit as `avg_price` in the stats relations.
pub const OUTLIER_PRICE_CEILING: f64 = 20_000.0;

/// The price ranking asks the source for this many times `limit` candidates
/// so that outlier filtering rarely leaves it short.
pub const PRICE_OVERFETCH_FACTOR: usize = 2;

/// Key of the last-refresh row in the `metadata` relation.
pub const LAST_UPDATED_KEY: &str = "last_updated";

/// Format the refresh job writes (`datetime.isoformat()`, fraction optional).
pub const LAST_UPDATED_STORED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Rendering shown on the dashboard, e.g. `17.07.2025 14:05`.
pub const LAST_UPDATED_DISPLAY_FORMAT: &str = "%d.%m.%Y %H:%M";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub api_port: u16,
    pub log_level: String,
    /// Rows per ranked table (RESULT_LIMIT)
    pub result_limit: usize,
    /// Upper bound for a single aggregation query (QUERY_TIMEOUT_SECS)
    pub query_timeout: Duration,
    /// SQLite pool size (DB_MAX_CONNECTIONS)
    pub db_max_connections: u32,
    /// Apply `migrations/` on startup (DB_RUN_MIGRATIONS). Off by default:
    /// the refresh job owns the schema, and migrating adds `_sqlx_migrations`.
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| "voidwatch.db".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "8090".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            result_limit: std::env::var("RESULT_LIMIT")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<usize>()
                .unwrap_or(10),
            query_timeout: Duration::from_secs(
                std::env::var("QUERY_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse::<u64>()
                    .unwrap_or(5),
            ),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "4".to_string())
                .parse::<u32>()
                .unwrap_or(4)
                .max(1),
            run_migrations: std::env::var("DB_RUN_MIGRATIONS")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}
