use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported window: {0}h (allowed: 24, 48, 168, 336, 720, 2160)")]
    InvalidWindow(i64),

    #[error("Aggregate source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Refresh metadata unavailable: {0}")]
    MetadataUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Collapses any query-side failure into the single opaque source error.
    pub fn source_unavailable(err: impl std::fmt::Display) -> Self {
        AppError::SourceUnavailable(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::InvalidWindow(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
