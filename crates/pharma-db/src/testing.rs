//! # Test Fixtures
//!
//! Isolated, schema-loaded SQLite databases for tests in this crate and in
//! dependents that enable the `test-support` feature.
//!
//! ```rust,ignore
//! let db = TestDatabase::new().await;
//! let rows = db.database().records(&PHARMACY).list().await?;
//! ```

use std::time::Duration;

use tempfile::TempDir;

use crate::database::Database;
use crate::executor::QueryExecutor;
use crate::pool::{DbConfig, PoolManager};

/// DDL for the test schema, one statement per `;`.
pub const SQLITE_SCHEMA: &str = include_str!("../schema/sqlite.sql");

/// A database in its own temporary directory, removed on drop.
pub struct TestDatabase {
    database: Database,
    _dir: TempDir,
}

impl TestDatabase {
    pub async fn new() -> Self {
        Self::with_config(|config| config).await
    }

    /// Builds the fixture with adjusted pool settings.
    pub async fn with_config(adjust: impl FnOnce(DbConfig) -> DbConfig) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let url = format!("sqlite://{}/test.db?mode=rwc", dir.path().display());
        let config = adjust(DbConfig::from_url(url).acquire_timeout(Duration::from_secs(10)));

        let database = Database::new(&config).expect("create test pool");
        load_schema(database.pool()).await;

        TestDatabase {
            database,
            _dir: dir,
        }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn executor(&self) -> QueryExecutor {
        self.database.executor()
    }
}

async fn load_schema(pool: &PoolManager) {
    let mut conn = pool.acquire().await.expect("acquire fixture connection");

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&mut *conn)
        .await
        .expect("enable WAL");

    for ddl in SQLITE_SCHEMA.split(';').filter(|s| !s.trim().is_empty()) {
        sqlx::query(ddl)
            .execute(&mut *conn)
            .await
            .expect("apply test schema");
    }

    pool.release(conn);
}

/// Waits until every connection has been handed back to the pool.
///
/// Released connections return asynchronously, so occupancy checks must
/// poll.
pub async fn wait_for_idle(pool: &PoolManager) {
    for _ in 0..200 {
        if pool.status().in_use() == 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("connections still checked out: {:?}", pool.status());
}
