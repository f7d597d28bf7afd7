//! # Dashboard Repository
//!
//! Aggregate statistics for the mobile dashboard.
//!
//! ## Query Fan-out
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stats()                                                                │
//! │    ├── COUNT products            ┐                                      │
//! │    ├── COUNT quantity > 0        │                                      │
//! │    ├── COUNT quantity <= 10      │  each on its own pooled connection,  │
//! │    ├── SUM sale.total_cost       │  all in flight at once               │
//! │    ├── COUNT suppliers           │                                      │
//! │    ├── SUM sale.prod_quantity    │  all finish before any error returns │
//! │    ├── COUNT sales               │                                      │
//! │    ├── COUNT employees           │                                      │
//! │    ├── COUNT customers           │                                      │
//! │    └── best seller by units      ┘                                      │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │            DashboardStats (+ StockStatus::classify)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sums are widened to BIGINT or DOUBLE so both backends return a
//! value the executor can decode.

use pharma_core::stats::{DashboardStats, StockStatus, LOW_STOCK_THRESHOLD, UNKNOWN_PRODUCT};
use pharma_core::{SqlValue, Statement};
use tracing::debug;

use crate::error::DbResult;
use crate::executor::QueryExecutor;

const TOTAL_PRODUCTS: &str = "SELECT COUNT(*) FROM product";
const AVAILABLE_PRODUCTS: &str = "SELECT COUNT(*) FROM product WHERE prod_quantity > 0";
const SHORTAGE_PRODUCTS: &str = "SELECT COUNT(*) FROM product WHERE prod_quantity <= ?";
const TOTAL_REVENUE: &str = "SELECT COALESCE(SUM(total_cost), 0) + 0E0 FROM sale";
const TOTAL_GROUPS: &str = "SELECT COUNT(*) FROM supplier";
const TOTAL_UNITS_SOLD: &str = "SELECT CAST(COALESCE(SUM(prod_quantity), 0) AS SIGNED) FROM sale";
const TOTAL_SALES: &str = "SELECT COUNT(*) FROM sale";
const TOTAL_EMPLOYEES: &str = "SELECT COUNT(*) FROM employee";
const TOTAL_CUSTOMERS: &str = "SELECT COUNT(*) FROM customer";
const BEST_SELLER: &str = "SELECT CAST(p.prod_name AS CHAR) FROM sale s \
     JOIN product p ON s.prod_id = p.prod_id \
     GROUP BY s.prod_id, p.prod_name \
     ORDER BY SUM(s.prod_quantity) DESC \
     LIMIT 1";

#[derive(Debug, Clone)]
pub struct DashboardRepository {
    executor: QueryExecutor,
}

impl DashboardRepository {
    pub fn new(executor: QueryExecutor) -> Self {
        DashboardRepository { executor }
    }

    /// Runs every aggregate concurrently and combines the results.
    pub async fn stats(&self) -> DbResult<DashboardStats> {
        // Every statement runs to completion, even after another one fails.
        let (
            total_products,
            available_products,
            shortage_products,
            total_revenue,
            total_groups,
            total_units_sold,
            total_sales,
            total_employees,
            total_customers,
            best_selling_product,
        ) = tokio::join!(
            self.count(TOTAL_PRODUCTS, vec![]),
            self.count(AVAILABLE_PRODUCTS, vec![]),
            self.count(SHORTAGE_PRODUCTS, vec![SqlValue::Integer(LOW_STOCK_THRESHOLD)]),
            self.sum(TOTAL_REVENUE),
            self.count(TOTAL_GROUPS, vec![]),
            self.count(TOTAL_UNITS_SOLD, vec![]),
            self.count(TOTAL_SALES, vec![]),
            self.count(TOTAL_EMPLOYEES, vec![]),
            self.count(TOTAL_CUSTOMERS, vec![]),
            self.best_seller(),
        );
        let shortage_products = shortage_products?;

        let stats = DashboardStats {
            total_products: total_products?,
            available_products: available_products?,
            shortage_products,
            shortage_status: StockStatus::classify(shortage_products),
            total_revenue: total_revenue?,
            total_groups: total_groups?,
            total_units_sold: total_units_sold?,
            total_sales: total_sales?,
            total_employees: total_employees?,
            total_customers: total_customers?,
            best_selling_product: best_selling_product?,
        };

        debug!(?stats, "Dashboard stats computed");
        Ok(stats)
    }

    async fn count(&self, sql: &str, params: Vec<SqlValue>) -> DbResult<i64> {
        let value = self.executor.fetch_scalar(&Statement::new(sql, params)).await?;
        Ok(value.as_i64().unwrap_or(0))
    }

    async fn sum(&self, sql: &str) -> DbResult<f64> {
        let value = self.executor.fetch_scalar(&Statement::new(sql, vec![])).await?;
        Ok(value.as_f64().unwrap_or(0.0))
    }

    async fn best_seller(&self) -> DbResult<String> {
        let value = self.executor.fetch_scalar(&Statement::new(BEST_SELLER, vec![])).await?;
        Ok(value
            .as_text()
            .map_or_else(|| UNKNOWN_PRODUCT.to_string(), str::to_string))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
