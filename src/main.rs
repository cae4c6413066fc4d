mod api;
mod config;
mod dashboard;
mod db;
mod error;
mod stats;
mod types;

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::routes::{router, ApiState};
use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::db::{open_pool, SqliteSource};
use crate::error::Result;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    info!("voidwatch starting");

    // --- Database setup ---
    let pool = open_pool(&cfg.db_path, cfg.db_max_connections).await?;
    if cfg.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Schema migrations applied");
    }
    info!("Database ready at {}", cfg.db_path);

    // --- Dashboard ---
    let source = Arc::new(SqliteSource::new(pool.clone()));
    let dashboard = Arc::new(Dashboard::new(source, cfg.result_limit, cfg.query_timeout));
    info!(
        result_limit = cfg.result_limit,
        query_timeout_ms = cfg.query_timeout.as_millis() as u64,
        "Dashboard configured"
    );

    // --- HTTP API server ---
    let api_state = ApiState {
        dashboard,
        pool: pool.clone(),
    };
    let app = router(api_state);
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Database pool closed, shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
