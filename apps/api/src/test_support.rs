//! Router fixtures shared by the route tests.

use axum::body::{to_bytes, Body};
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use pharma_db::testing::TestDatabase;

use crate::{build_router, AppState};

/// A router wired to its own temporary database.
pub struct TestApp {
    pub router: Router,
    pub db: TestDatabase,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = TestDatabase::new().await;
        let router = build_router(AppState::new(db.database().clone()));
        TestApp { router, db }
    }
}

/// Sends one request and returns the status with the parsed JSON body.
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
