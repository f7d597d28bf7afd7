//! # Entity Repository
//!
//! One repository type serves every catalogue entity. Statement text comes
//! from the [`Entity`] descriptor; the repository only runs it.

use pharma_core::{Entity, ExternalRow, Statement};
use tracing::debug;

use crate::error::DbResult;
use crate::executor::{QueryExecutor, WriteAck};

/// Repository for one entity's table.
#[derive(Debug, Clone)]
pub struct EntityRepository {
    entity: &'static Entity,
    executor: QueryExecutor,
}

impl EntityRepository {
    pub fn new(entity: &'static Entity, executor: QueryExecutor) -> Self {
        EntityRepository { entity, executor }
    }

    pub fn entity(&self) -> &'static Entity {
        self.entity
    }

    /// Lists every row, joined display names included, keyed by external
    /// field names.
    pub async fn list(&self) -> DbResult<Vec<ExternalRow>> {
        debug!(entity = self.entity.label, "Listing records");
        let stmt = Statement::new(self.entity.select_sql(), Vec::new());
        self.executor.fetch_mapped(&stmt, &self.entity.renames()).await
    }

    /// Runs a prepared insert, update or delete.
    ///
    /// Build the statement with [`Entity::prepare_insert`] and friends so
    /// validation happens before any connection is acquired.
    pub async fn write(&self, stmt: &Statement) -> DbResult<WriteAck> {
        let ack = self.executor.execute(stmt).await?;
        debug!(
            entity = self.entity.label,
            rows_affected = ack.rows_affected,
            "Write applied"
        );
        Ok(ack)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestDatabase;
    use chrono::Utc;
    use pharma_core::catalog::{BRANCH, EMPLOYEE, PHARMACY, PRODUCT, RECEIPT, SALE};
    use pharma_core::SqlValue;
    use serde_json::{json, Value};

    fn body(value: Value) -> ExternalRow {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[tokio::test]
    async fn test_create_then_list_pharmacy() {
        let db = TestDatabase::new().await;
        let repo = db.database().records(&PHARMACY);

        let stmt = PHARMACY
            .prepare_insert(&body(json!({ "name": "Acme", "address": null, "contact": null })), Utc::now())
            .unwrap();
        let ack = repo.write(&stmt).await.unwrap();
        assert_eq!(ack.rows_affected, 1);

        let rows = repo.list().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], json!("Acme"));
        assert!(rows[0]["pharmacy_id"].as_i64().is_some());
        assert_eq!(
            rows[0].keys().collect::<Vec<_>>(),
            vec!["pharmacy_id", "name", "address", "contact"]
        );
    }

    #[tokio::test]
    async fn test_branch_list_embeds_pharmacy_name() {
        let db = TestDatabase::new().await;
        let now = Utc::now();

        db.database()
            .records(&PHARMACY)
            .write(&PHARMACY.prepare_insert(&body(json!({ "name": "Acme" })), now).unwrap())
            .await
            .unwrap();

        let branches = db.database().records(&BRANCH);
        branches
            .write(
                &BRANCH
                    .prepare_insert(&body(json!({ "name": "Downtown", "pharmacy_id": 1 })), now)
                    .unwrap(),
            )
            .await
            .unwrap();

        let rows = branches.list().await.unwrap();
        assert_eq!(rows[0]["pharmacy_name"], json!("Acme"));
        assert_eq!(rows[0]["pharmacy_id"], json!(1));
    }

    #[tokio::test]
    async fn test_employee_password_is_never_listed() {
        let db = TestDatabase::new().await;
        let repo = db.database().records(&EMPLOYEE);

        let stmt = EMPLOYEE
            .prepare_insert(
                &body(json!({ "name": "Ana", "branch_id": 1, "password": "pw" })),
                Utc::now(),
            )
            .unwrap();
        repo.write(&stmt).await.unwrap();

        let rows = repo.list().await.unwrap();
        assert!(!rows[0].contains_key("password"));
        assert!(!rows[0].contains_key("emp_password"));
        assert_eq!(rows[0]["branch_name"], Value::Null);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = TestDatabase::new().await;
        let repo = db.database().records(&PHARMACY);
        let now = Utc::now();

        repo.write(&PHARMACY.prepare_insert(&body(json!({ "name": "Acme" })), now).unwrap())
            .await
            .unwrap();

        let ack = repo
            .write(
                &PHARMACY
                    .prepare_update("1", &body(json!({ "name": "Acme Health" })), now)
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(ack.rows_affected, 1);
        assert_eq!(repo.list().await.unwrap()[0]["name"], json!("Acme Health"));

        repo.write(&PHARMACY.prepare_delete("1").unwrap()).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());

        // Deleting a missing key is not an error.
        let ack = repo.write(&PHARMACY.prepare_delete("1").unwrap()).await.unwrap();
        assert_eq!(ack.rows_affected, 0);
    }

    #[tokio::test]
    async fn test_sales_list_newest_first() {
        let db = TestDatabase::new().await;
        let repo = db.database().records(&SALE);
        let now = Utc::now();

        for quantity in [1, 2] {
            let stmt = SALE
                .prepare_insert(
                    &body(json!({ "employee_id": 1, "product_id": 1, "quantity": quantity })),
                    now,
                )
                .unwrap();
            repo.write(&stmt).await.unwrap();
        }

        let rows = repo.list().await.unwrap();
        assert_eq!(rows[0]["quantity"], json!(2));
        assert_eq!(rows[0]["status"], json!("completed"));
        assert_eq!(rows[1]["quantity"], json!(1));
    }

    #[tokio::test]
    async fn test_receipt_text_key() {
        let db = TestDatabase::new().await;
        let repo = db.database().records(&RECEIPT);
        let now = Utc::now();

        repo.write(
            &RECEIPT
                .prepare_insert(&body(json!({ "receipt_number": "R-1", "total_cost": 12.5 })), now)
                .unwrap(),
        )
        .await
        .unwrap();

        let rows = repo.list().await.unwrap();
        assert_eq!(rows[0]["receipt_number"], json!("R-1"));
        assert_eq!(rows[0]["total_cost"], json!(12.5));

        repo.write(&RECEIPT.prepare_delete("R-1").unwrap()).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_undeclared_columns_are_not_selected() {
        let db = TestDatabase::new().await;
        let executor = db.executor();

        executor
            .execute(&Statement::new("ALTER TABLE product ADD COLUMN prod_image BLOB", vec![]))
            .await
            .unwrap();
        executor
            .execute(&Statement::new(
                "INSERT INTO product (prod_name, prod_unit_price, prod_quantity, prod_image) \
                 VALUES (?, ?, ?, X'89504E47')",
                vec![SqlValue::from("Aspirin"), SqlValue::Integer(3), SqlValue::Integer(7)],
            ))
            .await
            .unwrap();

        let rows = db.database().records(&PRODUCT).list().await.unwrap();
        assert_eq!(
            rows[0].keys().collect::<Vec<_>>(),
            vec![
                "product_id",
                "supplier_id",
                "name",
                "unit_price",
                "quantity",
                "latest_expiry_date",
                "supplier_name"
            ]
        );
        assert_eq!(rows[0]["unit_price"], json!(3.0));
        assert_eq!(rows[0]["quantity"], json!(7));
        assert!(!PRODUCT.select_sql().contains("prod_image"));
    }
}
