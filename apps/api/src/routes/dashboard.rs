//! Dashboard statistics endpoint

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::error;

use pharma_core::DashboardStats;

use super::detached;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub data: DashboardStats,
}

/// GET /api/dashboard/stats
///
/// A failure still carries a zeroed `data` payload so the client can render.
async fn stats(State(state): State<AppState>) -> Response {
    let dashboard = state.db.dashboard();
    match detached(async move { dashboard.stats().await }).await {
        Ok(data) => Json(StatsResponse {
            success: true,
            error: None,
            data,
        })
        .into_response(),
        Err(err) => {
            error!(error = %err, "Dashboard stats failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatsResponse {
                    success: false,
                    error: Some(err.to_string()),
                    data: DashboardStats::fallback(),
                }),
            )
                .into_response()
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/dashboard/stats", get(stats))
}
