//! # Database Handle
//!
//! Entry point the HTTP layer holds on to: one pool, repository access on
//! top of it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Database                                                               │
//! │   ├── records(&PHARMACY)  ──► EntityRepository  (list / write)         │
//! │   ├── dashboard()          ──► DashboardRepository (stats)             │
//! │   ├── health_check()       ──► SELECT 1 + PoolStatus                   │
//! │   └── close()                                                          │
//! │              │                                                          │
//! │              ▼                                                          │
//! │        QueryExecutor ──► PoolManager ──► MySQL / SQLite                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The handle is constructed explicitly and passed in, never stored in a
//! global, so each test can own an isolated pool.

use pharma_core::Entity;
use tracing::info;

use crate::error::DbResult;
use crate::executor::QueryExecutor;
use crate::pool::{DbConfig, PoolManager, PoolStatus};
use crate::repository::dashboard::DashboardRepository;
use crate::repository::entity::EntityRepository;

/// Main database handle providing repository access.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PoolManager,
}

impl Database {
    /// Creates the (lazy) pool. No connection is opened here.
    pub fn new(config: &DbConfig) -> DbResult<Self> {
        let pool = PoolManager::new(config)?;
        Ok(Database { pool })
    }

    pub fn pool(&self) -> &PoolManager {
        &self.pool
    }

    pub fn executor(&self) -> QueryExecutor {
        QueryExecutor::new(self.pool.clone())
    }

    /// Returns the repository for one catalogue entity.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let rows = db.records(&PHARMACY).list().await?;
    /// ```
    pub fn records(&self, entity: &'static Entity) -> EntityRepository {
        EntityRepository::new(entity, self.executor())
    }

    pub fn dashboard(&self) -> DashboardRepository {
        DashboardRepository::new(self.executor())
    }

    /// Executes `SELECT 1` and reports the pool occupancy.
    pub async fn health_check(&self) -> DbResult<PoolStatus> {
        self.pool.health_check().await
    }

    pub fn pool_status(&self) -> PoolStatus {
        self.pool.status()
    }

    /// Closes the pool. Later operations fail with `PoolClosed`.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database closed");
    }
}
