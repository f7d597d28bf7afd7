//! # Pharmacy API
//!
//! REST gateway over the pharmacy database for the mobile client.
//!
//! ## Request Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Request Lifecycle                               │
//! │                                                                         │
//! │  Client ──► CORS ──► Trace ──► CatchPanic ──► Router                   │
//! │                                                 │                       │
//! │                 ┌───────────────────────────────┼──────────────┐        │
//! │                 ▼                               ▼              ▼        │
//! │           routes::health              routes::entities    fallback     │
//! │           routes::dashboard           (10 entities)       404 JSON     │
//! │                 │                               │                       │
//! │                 └──────────────┬────────────────┘                       │
//! │                                ▼                                        │
//! │                     pharma_db::Database (shared pool)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

#[cfg(test)]
mod test_support;

use std::any::Any;
use std::time::Duration;

use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pharma_db::Database;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}

/// Builds the full router with middleware.
pub fn build_router(state: AppState) -> Router {
    with_middleware(
        Router::new()
            .merge(routes::health::router())
            .merge(routes::dashboard::router())
            .merge(routes::entities::router()),
    )
    .with_state(state)
}

fn with_middleware(router: Router<AppState>) -> Router<AppState> {
    router
        .fallback(routes::not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}

/// Upper bound on the startup connectivity check.
pub const STARTUP_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Logs whether the database is reachable and reports it. Never fails
/// startup: an unreachable database only produces a warning.
pub async fn check_database(db: &Database, limit: Duration) -> bool {
    match tokio::time::timeout(limit, db.health_check()).await {
        Ok(Ok(status)) => {
            info!(?status, "Connected to database");
            true
        }
        Ok(Err(err)) => {
            warn!(error = %err, "Database connection failed, serving anyway");
            false
        }
        Err(_) => {
            warn!(timeout_ms = limit.as_millis() as u64, "Database check timed out, serving anyway");
            false
        }
    }
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - Default: `info,pharma=debug,sqlx=warn`
/// - Override with the `RUST_LOG` environment variable
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pharma=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{send, TestApp};
    use axum::http::{Method, StatusCode};
    use axum::routing::get;
    use pharma_db::DbConfig;

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = TestApp::new().await;
        let (status, body) = send(&app.router, Method::GET, "/api/unknown", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({ "success": false, "error": "Endpoint not found" }));
    }

    async fn boom() -> &'static str {
        panic!("kaboom")
    }

    #[tokio::test]
    async fn test_panic_becomes_500_json() {
        let app = TestApp::new().await;
        let router = with_middleware(Router::new().route("/boom", get(boom)))
            .with_state(AppState::new(app.db.database().clone()));

        let (status, body) = send(&router, Method::GET, "/boom", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Something went wrong!");
    }

    #[tokio::test]
    async fn test_cors_headers_present() {
        let app = TestApp::new().await;
        let request = axum::http::Request::builder()
            .uri("/api/health")
            .header("origin", "http://example.com")
            .body(axum::body::Body::empty())
            .unwrap();

        let response = tower::ServiceExt::oneshot(app.router.clone(), request).await.unwrap();
        assert!(response.headers().contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn test_unreachable_database_does_not_block_startup() {
        let config = DbConfig::from_url("mysql://root@127.0.0.1:1/pharmacy_database")
            .acquire_timeout(Duration::from_millis(500));
        let db = Database::new(&config).unwrap();

        assert!(!check_database(&db, STARTUP_CHECK_TIMEOUT).await);
        assert!(db.health_check().await.is_err());

        let router = build_router(AppState::new(db));
        let (status, body) = send(&router, Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Database connection failed");
    }

    #[tokio::test]
    async fn test_reachable_database_passes_startup_check() {
        let app = TestApp::new().await;
        assert!(check_database(app.db.database(), STARTUP_CHECK_TIMEOUT).await);
    }
}
