//! # pharma-db: Database Layer for the Pharmacy API
//!
//! Connection pooling and statement execution over the sqlx `any` driver.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pharmacy API Data Flow                           │
//! │                                                                         │
//! │  HTTP handler (GET /api/branches)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     pharma-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  PoolManager  │    │ QueryExecutor │    │ Repositories │  │   │
//! │  │   │   (pool.rs)   │◄───│ (executor.rs) │◄───│ entity       │  │   │
//! │  │   │               │    │               │    │ dashboard    │  │   │
//! │  │   │ acquire       │    │ bind by pos.  │    │              │  │   │
//! │  │   │ release       │    │ decode rows   │    │              │  │   │
//! │  │   │ health_check  │    │ re-key rows   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        MySQL (production)  /  SQLite temp file (tests)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection Pool Manager and its configuration
//! - [`executor`] - Column-Mapping Query Executor
//! - [`database`] - The handle passed to the HTTP layer
//! - [`repository`] - Entity and dashboard repositories
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pharma_core::catalog::BRANCH;
//! use pharma_db::{Database, DbConfig};
//!
//! let db = Database::new(&DbConfig::default())?;
//! let branches = db.records(&BRANCH).list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod database;
pub mod error;
pub mod executor;
pub mod pool;
pub mod repository;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use database::Database;
pub use error::{DbError, DbResult};
pub use executor::{QueryExecutor, WriteAck};
pub use pool::{DbConfig, PoolManager, PoolStatus, PooledConnection};

// Repository re-exports for convenience
pub use repository::dashboard::DashboardRepository;
pub use repository::entity::EntityRepository;
