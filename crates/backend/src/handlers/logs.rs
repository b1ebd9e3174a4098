use axum::extract::{Query, State};
use axum::Json;
use contracts::shared::logger::LogEntry;
use serde::Deserialize;

use crate::routes::AppState;
use crate::shared::host::Host;
use crate::shared::logger;

#[derive(Debug, Default, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<u64>,
}

/// GET /api/logs
pub async fn list_all(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<Vec<LogEntry>>, axum::http::StatusCode> {
    match logger::repository::get_logs(state.ctx.db(), query.limit).await {
        Ok(logs) => Ok(Json(logs)),
        Err(e) => {
            tracing::error!("Failed to read log entries: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// DELETE /api/logs
pub async fn clear_all(State(state): State<AppState>) -> axum::http::StatusCode {
    match logger::repository::clear_all_logs(state.ctx.db()).await {
        Ok(deleted) => {
            tracing::info!("Cleared {} log entries", deleted);
            axum::http::StatusCode::OK
        }
        Err(e) => {
            tracing::error!("Failed to clear log entries: {}", e);
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
