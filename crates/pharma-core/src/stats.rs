//! # Dashboard Statistics
//!
//! Payload and stock classification for `GET /api/dashboard/stats`.
//!
//! ## Shortage Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  product.quantity <= 10  ──► counted as a shortage                      │
//! │                                                                         │
//! │  shortage count   status                                               │
//! │  ──────────────   ──────                                               │
//! │       > 5         Critical                                             │
//! │     2 ..= 5       Warning                                              │
//! │     0 ..= 1       Good                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

/// Products at or below this quantity count as a shortage.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Shortage counts above this are critical.
pub const CRITICAL_SHORTAGE_ABOVE: i64 = 5;

/// Shortage counts from this value up are a warning.
pub const WARNING_SHORTAGE_FROM: i64 = 2;

/// Placeholder name when no best seller can be determined.
pub const UNKNOWN_PRODUCT: &str = "Unknown";

/// Overall stock health derived from the shortage count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockStatus {
    Good,
    Warning,
    Critical,
}

impl StockStatus {
    pub fn classify(shortage_count: i64) -> Self {
        if shortage_count > CRITICAL_SHORTAGE_ABOVE {
            StockStatus::Critical
        } else if shortage_count >= WARNING_SHORTAGE_FROM {
            StockStatus::Warning
        } else {
            StockStatus::Good
        }
    }
}

/// Aggregates shown on the mobile dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_products: i64,
    /// Products with quantity above zero.
    pub available_products: i64,
    /// Products at or below [`LOW_STOCK_THRESHOLD`].
    pub shortage_products: i64,
    pub shortage_status: StockStatus,
    pub total_revenue: f64,
    /// Supplier count, shown as "medicine groups".
    pub total_groups: i64,
    pub total_units_sold: i64,
    pub total_sales: i64,
    pub total_employees: i64,
    pub total_customers: i64,
    pub best_selling_product: String,
}

impl DashboardStats {
    /// Zeroed payload returned alongside an error.
    pub fn fallback() -> Self {
        DashboardStats {
            total_products: 0,
            available_products: 0,
            shortage_products: 0,
            shortage_status: StockStatus::Good,
            total_revenue: 0.0,
            total_groups: 0,
            total_units_sold: 0,
            total_sales: 0,
            total_employees: 0,
            total_customers: 0,
            best_selling_product: UNKNOWN_PRODUCT.to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify() {
        assert_eq!(StockStatus::classify(0), StockStatus::Good);
        assert_eq!(StockStatus::classify(1), StockStatus::Good);
        assert_eq!(StockStatus::classify(2), StockStatus::Warning);
        assert_eq!(StockStatus::classify(5), StockStatus::Warning);
        assert_eq!(StockStatus::classify(6), StockStatus::Critical);
    }

    #[test]
    fn test_fallback_serializes_zeroed() {
        let value = serde_json::to_value(DashboardStats::fallback()).unwrap();
        assert_eq!(value["total_products"], json!(0));
        assert_eq!(value["shortage_status"], json!("Good"));
        assert_eq!(value["best_selling_product"], json!("Unknown"));
    }
}
