//! # pharma-core: Entity Catalogue for the Pharmacy API
//!
//! This crate describes the pharmacy schema as data and holds every rule
//! that can run without a database connection.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pharmacy API Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile client (HTTP/JSON)                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/api (axum routes)                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pharma-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │  schema   │  │validation │  │   stats   │  │   │
//! │  │   │ entities  │  │ renaming  │  │ required  │  │ shortage  │  │   │
//! │  │   │ + joins   │  │  tables   │  │ + coerce  │  │  status   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          pharma-db (pool manager + query executor)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - The ten exposed entities
//! - [`entity`] - Entity descriptor and statement building
//! - [`schema`] - Renaming tables (internal column ↔ external field)
//! - [`validation`] - Required-field checks and value coercion
//! - [`value`] - Backend-neutral SQL values and rows
//! - [`stats`] - Dashboard payload and stock classification
//! - [`error`] - Validation errors
//!
//! ## Example Usage
//!
//! ```rust
//! use pharma_core::catalog::PHARMACY;
//! use pharma_core::SqlValue;
//! use serde_json::json;
//!
//! let body = json!({ "name": "Acme", "address": null });
//! let stmt = PHARMACY
//!     .prepare_insert(body.as_object().unwrap(), chrono::Utc::now())
//!     .unwrap();
//!
//! assert_eq!(stmt.params[0], SqlValue::from("Acme"));
//! assert!(!stmt.sql.contains("Acme"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod entity;
pub mod error;
pub mod schema;
pub mod stats;
pub mod validation;
pub mod value;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::ENTITIES;
pub use entity::{Entity, Join, Statement, WriteVerb};
pub use error::{ValidationError, ValidationResult};
pub use schema::{FieldKind, FieldMapping, FieldRole, RenameTable};
pub use stats::{DashboardStats, StockStatus};
pub use value::{ExternalRow, InternalRow, SqlValue};
