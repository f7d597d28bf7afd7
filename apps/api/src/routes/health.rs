//! Health check endpoint

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::error;

use pharma_db::PoolStatus;

use super::detached;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: &'static str,
    pub timestamp: String,
    pub pool: PoolStatus,
}

#[derive(Debug, Serialize)]
pub struct HealthFailure {
    pub success: bool,
    pub error: &'static str,
    pub details: String,
}

/// GET /api/health
async fn health(State(state): State<AppState>) -> Response {
    let db = state.db.clone();
    match detached(async move { db.health_check().await }).await {
        Ok(pool) => Json(HealthResponse {
            success: true,
            message: "Server and database are healthy",
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            pool,
        })
        .into_response(),
        Err(err) => {
            error!(error = %err, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthFailure {
                    success: false,
                    error: "Database connection failed",
                    details: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}
