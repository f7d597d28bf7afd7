//! # Entity Catalogue
//!
//! Every table the gateway exposes, described once. Routes, statements and
//! row reshaping are all driven from these definitions.
//!
//! ```text
//!   pharmacy ◄── branch ◄── employee ◄── attendance
//!                               ▲
//!   supplier ◄── product ◄──── sale ──► customer
//!      ▲                        ┆
//!      └── supplier_product     └┄┄ receipt (snapshot, informational)
//! ```

use crate::entity::{Entity, Join};
use crate::schema::{FieldKind, FieldMapping, FieldRole};

const fn key(column: &'static str, name: &'static str) -> FieldMapping {
    FieldMapping::new(column, name, FieldKind::Integer, FieldRole::GeneratedKey)
}

const fn int(column: &'static str, name: &'static str) -> FieldMapping {
    FieldMapping::new(column, name, FieldKind::Integer, FieldRole::Column)
}

const fn real(column: &'static str, name: &'static str) -> FieldMapping {
    FieldMapping::new(column, name, FieldKind::Real, FieldRole::Column)
}

const fn text(column: &'static str, name: &'static str) -> FieldMapping {
    FieldMapping::new(column, name, FieldKind::Text, FieldRole::Column)
}

const fn joined(alias: &'static str) -> FieldMapping {
    FieldMapping::new(alias, alias, FieldKind::Text, FieldRole::Joined)
}

// =============================================================================
// Pharmacy
// =============================================================================

pub static PHARMACY: Entity = Entity {
    label: "Pharmacy",
    path: "pharmacies",
    table: "pharmacy",
    alias: "ph",
    key: key("pharm_id", "pharmacy_id"),
    fields: &[
        text("pharm_name", "name"),
        text("pharm_address", "address"),
        text("pharm_contact", "contact"),
    ],
    joins: &[],
    required: &["name"],
    required_message: "Name is required",
    defaults: &[],
    newest_first: false,
    supports_update: true,
    supports_delete: true,
};

// =============================================================================
// Branch
// =============================================================================

pub static BRANCH: Entity = Entity {
    label: "Branch",
    path: "branches",
    table: "branch",
    alias: "b",
    key: key("brch_id", "branch_id"),
    fields: &[
        int("pharm_id", "pharmacy_id"),
        text("brch_name", "name"),
        text("brch_address", "address"),
        text("brch_contact", "contact"),
        joined("pharmacy_name"),
    ],
    joins: &[Join {
        table: "pharmacy",
        alias: "p",
        local_column: "pharm_id",
        remote_column: "pharm_id",
        select: &[("pharm_name", "pharmacy_name")],
    }],
    required: &["name", "pharmacy_id"],
    required_message: "Name and pharmacy_id are required",
    defaults: &[],
    newest_first: false,
    supports_update: true,
    supports_delete: true,
};

// =============================================================================
// Employee
// =============================================================================

pub static EMPLOYEE: Entity = Entity {
    label: "Employee",
    path: "employees",
    table: "employee",
    alias: "e",
    key: key("emp_id", "employee_id"),
    fields: &[
        int("brch_id", "branch_id"),
        text("emp_name", "name"),
        text("emp_position", "position"),
        text("emp_email", "email"),
        text("emp_contact", "contact"),
        text("emp_address", "address"),
        FieldMapping::new("emp_password", "password", FieldKind::Text, FieldRole::CreateOnly),
        joined("branch_name"),
    ],
    joins: &[Join {
        table: "branch",
        alias: "b",
        local_column: "brch_id",
        remote_column: "brch_id",
        select: &[("brch_name", "branch_name")],
    }],
    required: &["name", "branch_id"],
    required_message: "Name and branch_id are required",
    defaults: &[],
    newest_first: false,
    supports_update: true,
    supports_delete: true,
};

// =============================================================================
// Supplier
// =============================================================================

pub static SUPPLIER: Entity = Entity {
    label: "Supplier",
    path: "suppliers",
    table: "supplier",
    alias: "su",
    key: key("supp_id", "supplier_id"),
    fields: &[
        text("supp_name", "name"),
        text("supp_contact", "contact"),
        text("supp_product_type", "product_type"),
    ],
    joins: &[],
    required: &["name"],
    required_message: "Name is required",
    defaults: &[],
    newest_first: false,
    supports_update: true,
    supports_delete: true,
};

// =============================================================================
// Product
// =============================================================================

pub static PRODUCT: Entity = Entity {
    label: "Product",
    path: "products",
    table: "product",
    alias: "p",
    key: key("prod_id", "product_id"),
    fields: &[
        int("supp_id", "supplier_id"),
        text("prod_name", "name"),
        real("prod_unit_price", "unit_price"),
        int("prod_quantity", "quantity"),
        text("prod_latest_expiry_date", "latest_expiry_date"),
        joined("supplier_name"),
    ],
    joins: &[Join {
        table: "supplier",
        alias: "s",
        local_column: "supp_id",
        remote_column: "supp_id",
        select: &[("supp_name", "supplier_name")],
    }],
    required: &["name"],
    required_message: "Name is required",
    defaults: &[],
    newest_first: false,
    supports_update: true,
    supports_delete: true,
};

// =============================================================================
// Customer
// =============================================================================

pub static CUSTOMER: Entity = Entity {
    label: "Customer",
    path: "customers",
    table: "customer",
    alias: "c",
    key: key("cust_id", "customer_id"),
    fields: &[text("cust_name", "name"), text("cust_contact", "contact")],
    joins: &[],
    required: &["name"],
    required_message: "Name is required",
    defaults: &[],
    newest_first: false,
    supports_update: true,
    supports_delete: true,
};

// =============================================================================
// Sale
// =============================================================================

pub static SALE: Entity = Entity {
    label: "Sale",
    path: "sales",
    table: "sale",
    alias: "s",
    key: key("sale_id", "sale_id"),
    fields: &[
        int("emp_id", "employee_id"),
        int("cust_id", "customer_id"),
        int("prod_id", "product_id"),
        int("prod_quantity", "quantity"),
        real("total_cost", "total_cost"),
        text("status", "status"),
        text("payment_method", "payment_method"),
        text("recpt_number", "receipt_num"),
        joined("emp_name"),
        joined("customer_name"),
        joined("product_name"),
    ],
    joins: &[
        Join {
            table: "employee",
            alias: "e",
            local_column: "emp_id",
            remote_column: "emp_id",
            select: &[("emp_name", "emp_name")],
        },
        Join {
            table: "customer",
            alias: "c",
            local_column: "cust_id",
            remote_column: "cust_id",
            select: &[("cust_name", "customer_name")],
        },
        Join {
            table: "product",
            alias: "p",
            local_column: "prod_id",
            remote_column: "prod_id",
            select: &[("prod_name", "product_name")],
        },
    ],
    required: &["employee_id", "product_id", "quantity"],
    required_message: "Employee ID, Product ID, and Quantity are required",
    defaults: &[("status", "completed")],
    newest_first: true,
    supports_update: false,
    supports_delete: false,
};

// =============================================================================
// Receipt
// =============================================================================

pub static RECEIPT: Entity = Entity {
    label: "Receipt",
    path: "receipts",
    table: "receipt",
    alias: "r",
    key: FieldMapping::new("recpt_number", "receipt_number", FieldKind::Text, FieldRole::SuppliedKey),
    fields: &[
        int("sale_id", "sale_id"),
        text("recpt_date", "date"),
        text("cust_name", "customer_name"),
        text("emp_name", "employee_name"),
        text("prod_name", "product_name"),
        int("prod_quantity", "quantity"),
        real("total_cost", "total_cost"),
        text("payment_method", "payment_method"),
    ],
    joins: &[],
    required: &["receipt_number"],
    required_message: "Receipt number is required",
    defaults: &[],
    newest_first: false,
    supports_update: true,
    supports_delete: true,
};

// =============================================================================
// Attendance
// =============================================================================

pub static ATTENDANCE: Entity = Entity {
    label: "Attendance",
    path: "attendance",
    table: "attendance",
    alias: "a",
    key: key("attnd_id", "attnd_id"),
    fields: &[
        int("emp_id", "employee_id"),
        text("attnd_date", "date"),
        text("attnd_check_in", "check_in"),
        text("attnd_check_out", "check_out"),
        text("attnd_status", "status"),
        joined("employee_name"),
    ],
    joins: &[Join {
        table: "employee",
        alias: "e",
        local_column: "emp_id",
        remote_column: "emp_id",
        select: &[("emp_name", "employee_name")],
    }],
    required: &["employee_id", "date"],
    required_message: "Employee ID and date are required",
    defaults: &[],
    newest_first: false,
    supports_update: true,
    supports_delete: true,
};

// =============================================================================
// Supplier Product
// =============================================================================

pub static SUPPLIER_PRODUCT: Entity = Entity {
    label: "Supplier product",
    path: "supplier-products",
    table: "supplier_product",
    alias: "sp",
    key: key("supp_pro_id", "supp_pro_id"),
    fields: &[
        int("supp_id", "supplier_id"),
        text("supp_pro_name", "product_name"),
        real("supp_pro_price", "price"),
        FieldMapping::new("supp_pro_updated_at", "updated_at", FieldKind::Text, FieldRole::Timestamp),
    ],
    joins: &[],
    required: &["supplier_id", "product_name", "price"],
    required_message: "Supplier ID, product name, and price are required",
    defaults: &[],
    newest_first: false,
    supports_update: true,
    supports_delete: true,
};

/// Every exposed entity, in route registration order.
pub static ENTITIES: [&Entity; 10] = [
    &PHARMACY,
    &BRANCH,
    &EMPLOYEE,
    &PRODUCT,
    &SUPPLIER,
    &CUSTOMER,
    &SALE,
    &RECEIPT,
    &ATTENDANCE,
    &SUPPLIER_PRODUCT,
];

/// Finds an entity by its route segment.
pub fn by_path(path: &str) -> Option<&'static Entity> {
    ENTITIES.iter().copied().find(|e| e.path == path)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{InternalRow, SqlValue};
    use std::collections::HashSet;

    #[test]
    fn test_paths_are_unique() {
        let paths: HashSet<_> = ENTITIES.iter().map(|e| e.path).collect();
        assert_eq!(paths.len(), ENTITIES.len());
        assert_eq!(by_path("supplier-products").map(|e| e.table), Some("supplier_product"));
        assert!(by_path("unknown").is_none());
    }

    #[test]
    fn test_renaming_tables_are_one_to_one() {
        for entity in ENTITIES {
            let table = entity.renames();
            let mut columns = HashSet::new();
            let mut names = HashSet::new();
            for field in table.iter() {
                assert!(columns.insert(field.column), "{}: duplicate column {}", entity.path, field.column);
                assert!(names.insert(field.name), "{}: duplicate name {}", entity.path, field.name);
            }
        }
    }

    #[test]
    fn test_only_the_key_is_a_key() {
        for entity in ENTITIES {
            assert!(entity.key.role.is_key(), "{}", entity.path);
            assert!(entity.fields.iter().all(|f| !f.role.is_key()), "{}", entity.path);
        }
    }

    #[test]
    fn test_joined_fields_come_from_a_join() {
        for entity in ENTITIES {
            let aliases: HashSet<_> = entity
                .joins
                .iter()
                .flat_map(|j| j.select.iter().map(|(_, alias)| *alias))
                .collect();
            for field in entity.fields.iter().filter(|f| f.role == FieldRole::Joined) {
                assert!(aliases.contains(field.column), "{}: {}", entity.path, field.column);
            }
        }
    }

    #[test]
    fn test_required_and_default_fields_are_declared() {
        for entity in ENTITIES {
            for name in entity.required.iter().chain(entity.defaults.iter().map(|(n, _)| n)) {
                assert!(entity.renames().column_for(name).is_some(), "{}: {}", entity.path, name);
            }
        }
    }

    /// A stored row, renamed for the client and sent back through the write
    /// mapping, binds the same values it was read with.
    #[test]
    fn test_round_trip_through_write_mapping() {
        for entity in ENTITIES {
            let stored: InternalRow = entity
                .renames()
                .iter()
                .enumerate()
                .map(|(i, f)| {
                    let value = match f.kind {
                        FieldKind::Integer => SqlValue::Integer(i as i64 + 1),
                        FieldKind::Real => SqlValue::Real(i as f64 + 0.5),
                        FieldKind::Text => SqlValue::Text(format!("{}-{}", f.name, i)),
                    };
                    (f.column, value)
                })
                .collect();

            let external = entity.renames().to_external(&stored);
            let written = entity.renames().to_internal(&external).unwrap();

            for field in entity.renames().iter().filter(|f| f.role.is_readable() && f.role.is_client_writable()) {
                assert_eq!(written.get(field.column), stored.get(field.column), "{}.{}", entity.path, field.column);
            }
        }
    }

    #[test]
    fn test_every_entity_builds_statements() {
        for entity in ENTITIES {
            assert!(entity.select_sql().starts_with("SELECT "));
            assert!(entity.insert_sql().contains(entity.table));
            if entity.supports_update {
                assert!(entity.update_sql().ends_with(&format!("WHERE {} = ?", entity.key.column)));
            }
        }
        assert!(!SALE.supports_update && !SALE.supports_delete);
    }
}
