//! # Entity CRUD Routes
//!
//! One set of generic handlers serves all ten catalogue entities. Each
//! route captures its `&'static Entity`, so there is no per-table handler
//! code.
//!
//! ```text
//! POST /api/branches  {"name":"Downtown","pharmacy_id":1}
//!        │
//!        ├── JsonBody            400 "Invalid JSON body"
//!        ├── prepare_insert      400 "Name and pharmacy_id are required"
//!        │                           (no connection acquired)
//!        └── repository.write    500 driver message
//!        │
//!        ▼
//! 200 {"success":true,"message":"Branch added successfully"}
//! ```

use axum::extract::{Path, State};
use axum::routing::{get, MethodRouter};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;

use pharma_core::{Entity, ExternalRow, WriteVerb, ENTITIES};

use super::{detached, not_found};
use crate::error::ApiResult;
use crate::extract::JsonBody;
use crate::AppState;

/// Acknowledgement for create, update and delete.
#[derive(Debug, Serialize)]
pub struct WriteResponse {
    pub success: bool,
    pub message: String,
}

impl WriteResponse {
    fn new(entity: &Entity, verb: WriteVerb) -> Json<Self> {
        Json(WriteResponse {
            success: true,
            message: entity.message(verb),
        })
    }
}

async fn list(state: AppState, entity: &'static Entity) -> ApiResult<Json<Vec<ExternalRow>>> {
    let repo = state.db.records(entity);
    let rows = detached(async move { repo.list().await }).await?;
    Ok(Json(rows))
}

async fn create(
    state: AppState,
    entity: &'static Entity,
    body: ExternalRow,
) -> ApiResult<Json<WriteResponse>> {
    let stmt = entity.prepare_insert(&body, Utc::now())?;
    let repo = state.db.records(entity);
    detached(async move { repo.write(&stmt).await }).await?;
    Ok(WriteResponse::new(entity, WriteVerb::Added))
}

async fn update(
    state: AppState,
    entity: &'static Entity,
    id: String,
    body: ExternalRow,
) -> ApiResult<Json<WriteResponse>> {
    let stmt = entity.prepare_update(&id, &body, Utc::now())?;
    let repo = state.db.records(entity);
    detached(async move { repo.write(&stmt).await }).await?;
    Ok(WriteResponse::new(entity, WriteVerb::Updated))
}

/// Deleting a key that does not exist still reports success.
async fn delete(
    state: AppState,
    entity: &'static Entity,
    id: String,
) -> ApiResult<Json<WriteResponse>> {
    let stmt = entity.prepare_delete(&id)?;
    let repo = state.db.records(entity);
    detached(async move { repo.write(&stmt).await }).await?;
    Ok(WriteResponse::new(entity, WriteVerb::Deleted))
}

fn collection(entity: &'static Entity) -> MethodRouter<AppState> {
    get(move |State(state): State<AppState>| list(state, entity))
        .post(move |State(state): State<AppState>, JsonBody(body): JsonBody| {
            create(state, entity, body)
        })
        .fallback(not_found)
}

fn item(entity: &'static Entity) -> MethodRouter<AppState> {
    let mut route = MethodRouter::new();
    if entity.supports_update {
        route = route.put(
            move |State(state): State<AppState>, Path(id): Path<String>, JsonBody(body): JsonBody| {
                update(state, entity, id, body)
            },
        );
    }
    if entity.supports_delete {
        route = route.delete(move |State(state): State<AppState>, Path(id): Path<String>| {
            delete(state, entity, id)
        });
    }
    route.fallback(not_found)
}

/// Routes for every catalogue entity.
pub fn router() -> Router<AppState> {
    ENTITIES.iter().fold(Router::new(), |router, &entity| {
        let router = router.route(&format!("/api/{}", entity.path), collection(entity));
        if entity.supports_update || entity.supports_delete {
            router.route(&format!("/api/{}/{{id}}", entity.path), item(entity))
        } else {
            router
        }
    })
}

#[cfg(test)]
mod tests {
    use crate::test_support::{send, TestApp};
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};
    use std::collections::HashSet;
    use tokio::task::JoinSet;

    #[tokio::test]
    async fn test_create_then_list_pharmacy() {
        let app = TestApp::new().await;

        let (status, body) = send(
            &app.router,
            Method::POST,
            "/api/pharmacies",
            Some(json!({ "name": "Acme", "address": null, "contact": null })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "message": "Pharmacy added successfully" }));

        let (status, body) = send(&app.router, Method::GET, "/api/pharmacies", None).await;
        assert_eq!(status, StatusCode::OK);

        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "Acme");
        assert!(rows[0]["pharmacy_id"].as_i64().is_some());
        assert_eq!(rows[0]["address"], Value::Null);
    }

    #[tokio::test]
    async fn test_sale_missing_quantity_is_rejected_without_insert() {
        let app = TestApp::new().await;

        let (_, before) = send(&app.router, Method::GET, "/api/sales", None).await;

        let (status, body) = send(
            &app.router,
            Method::POST,
            "/api/sales",
            Some(json!({ "employee_id": 1, "product_id": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": "Employee ID, Product ID, and Quantity are required"
            })
        );

        let (_, after) = send(&app.router, Method::GET, "/api/sales", None).await;
        assert_eq!(before.as_array().unwrap().len(), after.as_array().unwrap().len());
    }

    #[tokio::test]
    async fn test_concurrent_customer_creates() {
        let app = TestApp::new().await;
        let mut tasks = JoinSet::new();

        for i in 0..50 {
            let router = app.router.clone();
            tasks.spawn(async move {
                send(
                    &router,
                    Method::POST,
                    "/api/customers",
                    Some(json!({ "name": format!("customer-{i}") })),
                )
                .await
            });
        }
        while let Some(result) = tasks.join_next().await {
            let (status, _) = result.unwrap();
            assert_eq!(status, StatusCode::OK);
        }

        let (_, body) = send(&app.router, Method::GET, "/api/customers", None).await;
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 50);

        let keys: HashSet<i64> = rows.iter().map(|r| r["customer_id"].as_i64().unwrap()).collect();
        assert_eq!(keys.len(), 50);

        let names: HashSet<&str> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
        for i in 0..50 {
            assert!(names.contains(format!("customer-{i}").as_str()));
        }
    }

    #[tokio::test]
    async fn test_update_and_delete_branch() {
        let app = TestApp::new().await;
        send(&app.router, Method::POST, "/api/pharmacies", Some(json!({ "name": "Acme" }))).await;
        send(
            &app.router,
            Method::POST,
            "/api/branches",
            Some(json!({ "name": "Downtown", "pharmacy_id": 1 })),
        )
        .await;

        let (status, body) = send(
            &app.router,
            Method::PUT,
            "/api/branches/1",
            Some(json!({ "name": "Uptown", "pharmacy_id": "1", "contact": "555" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Branch updated successfully");

        let (_, body) = send(&app.router, Method::GET, "/api/branches", None).await;
        assert_eq!(body[0]["name"], "Uptown");
        assert_eq!(body[0]["pharmacy_id"], 1);
        assert_eq!(body[0]["pharmacy_name"], "Acme");

        let (status, body) = send(&app.router, Method::DELETE, "/api/branches/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Branch deleted successfully");

        let (_, body) = send(&app.router, Method::GET, "/api/branches", None).await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_receipt_update_takes_key_from_path() {
        let app = TestApp::new().await;
        send(
            &app.router,
            Method::POST,
            "/api/receipts",
            Some(json!({ "receipt_number": "R-1", "total_cost": 12.5 })),
        )
        .await;

        let (status, body) = send(
            &app.router,
            Method::PUT,
            "/api/receipts/R-1",
            Some(json!({ "total_cost": 5.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Receipt updated successfully");

        let (_, body) = send(&app.router, Method::GET, "/api/receipts", None).await;
        assert_eq!(body[0]["receipt_number"], "R-1");
        assert_eq!(body[0]["total_cost"], 5.0);
    }

    #[tokio::test]
    async fn test_delete_of_missing_key_succeeds() {
        let app = TestApp::new().await;
        let (status, body) = send(&app.router, Method::DELETE, "/api/customers/42", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_invalid_key_is_400() {
        let app = TestApp::new().await;
        let (status, body) = send(&app.router, Method::DELETE, "/api/products/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid product_id: abc");
    }

    #[tokio::test]
    async fn test_uncoercible_value_is_400() {
        let app = TestApp::new().await;
        let (status, body) = send(
            &app.router,
            Method::POST,
            "/api/products",
            Some(json!({ "name": "Aspirin", "quantity": "lots" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "quantity must be an integer");
    }

    #[tokio::test]
    async fn test_sales_have_no_update_or_delete() {
        let app = TestApp::new().await;
        for method in [Method::PUT, Method::DELETE] {
            let (status, body) = send(&app.router, method, "/api/sales/1", None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["error"], "Endpoint not found");
        }
    }

    #[tokio::test]
    async fn test_unsupported_method_is_404() {
        let app = TestApp::new().await;
        let (status, body) = send(&app.router, Method::PATCH, "/api/pharmacies", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Endpoint not found");
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let app = TestApp::new().await;
        let (status, body) =
            send(&app.router, Method::POST, "/api/customers", Some(json!(["Acme"]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid JSON body");
    }

    #[tokio::test]
    async fn test_supplier_product_is_server_stamped() {
        let app = TestApp::new().await;
        let (status, _) = send(
            &app.router,
            Method::POST,
            "/api/supplier-products",
            Some(json!({ "supplier_id": 1, "product_name": "Ibuprofen 200mg", "price": 4.2 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app.router, Method::GET, "/api/supplier-products", None).await;
        assert_eq!(body[0]["price"], 4.2);
        assert!(body[0]["updated_at"].as_str().is_some());
    }
}
