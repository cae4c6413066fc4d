use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::config::DEFAULT_WINDOW_HOURS;
use crate::dashboard::Dashboard;
use crate::error::{AppError, Result};
use crate::types::{PageData, SortPreference};

#[derive(Clone)]
pub struct ApiState {
    pub dashboard: Arc<Dashboard>,
    pub pool: sqlx::SqlitePool,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(get_page))
        .route("/health", get(get_health))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Query params
// ---------------------------------------------------------------------------

/// Raw strings so a garbled `hours` falls back to the default instead of
/// rejecting the request.
#[derive(Deserialize)]
pub struct PageQuery {
    pub hours: Option<String>,
    pub sort: Option<String>,
}

impl PageQuery {
    fn hours(&self) -> i64 {
        self.hours
            .as_deref()
            .and_then(|h| h.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_WINDOW_HOURS)
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_page(
    State(state): State<ApiState>,
    Query(params): Query<PageQuery>,
) -> Result<Json<PageData>> {
    let sort_by = SortPreference::from_param(params.sort.as_deref());
    let page = state.dashboard.page(params.hours(), sort_by).await?;
    Ok(Json(page))
}

async fn get_health(State(state): State<ApiState>) -> Result<Json<serde_json::Value>> {
    sqlx::query("SELECT 1")
        .execute(&state.pool)
        .await
        .map_err(AppError::source_unavailable)?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}
