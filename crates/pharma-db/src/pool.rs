//! # Connection Pool Manager
//!
//! Bounded pool of live database connections shared by every request.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  Server Startup                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::default() / from env ← host, port, credentials, limits     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PoolManager::new(config) ← lazy: no connection opened yet            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │               AnyPool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       │ acquire() waits up to acquire_timeout, then PoolExhausted      │
//! │       ▼                                                                 │
//! │  Request 1 ──► Conn1 ──► release                                       │
//! │  Request 2 ──► Conn2 ──► release                                       │
//! │  Request 3 ──► (waits) ──► Conn1                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Backends
//! The pool uses the sqlx `any` driver. Production connects to MySQL; tests
//! point [`DbConfig::from_url`] at a temporary SQLite file.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::mysql::MySqlConnectOptions;
use sqlx::pool::PoolConnection;
use sqlx::{Any, AnyPool, ConnectOptions};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};

/// A connection checked out of the pool.
///
/// Hand it back with [`PoolManager::release`].
pub type PooledConnection = PoolConnection<Any>;

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust
/// use pharma_db::DbConfig;
/// use std::time::Duration;
///
/// let config = DbConfig::default()
///     .host("db.internal")
///     .max_connections(20)
///     .acquire_timeout(Duration::from_secs(5));
///
/// assert!(config.connect_url().starts_with("mysql://"));
/// ```
#[derive(Clone)]
pub struct DbConfig {
    /// MySQL host. Default: `localhost`
    pub host: String,

    /// MySQL port. Default: 3300
    pub port: u16,

    /// Default: `root`
    pub user: String,

    /// Default: empty
    pub password: String,

    /// Schema name. Default: `pharmacy_database`
    pub database: String,

    /// Full connection URL. Overrides the five fields above when set.
    pub url: Option<String>,

    /// Maximum number of live connections.
    /// Default: 10
    pub max_connections: u32,

    /// How long `acquire()` waits for a free connection.
    /// Default: 60 seconds
    pub acquire_timeout: Duration,

    /// Idle connections older than this are closed.
    /// Default: 60 seconds
    pub idle_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig {
            host: "localhost".to_string(),
            port: 3300,
            user: "root".to_string(),
            password: String::new(),
            database: "pharmacy_database".to_string(),
            url: None,
            max_connections: 10,
            acquire_timeout: Duration::from_secs(60),
            idle_timeout: Duration::from_secs(60),
        }
    }
}

impl DbConfig {
    /// Configuration for an explicit connection URL (`mysql://`, `sqlite://`).
    pub fn from_url(url: impl Into<String>) -> Self {
        DbConfig {
            url: Some(url.into()),
            ..DbConfig::default()
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the acquire timeout.
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// The URL handed to the driver.
    ///
    /// Without an explicit URL this is a MySQL URL with the credentials
    /// percent-encoded.
    pub fn connect_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }

        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .to_url_lossy()
            .to_string()
    }

    /// Connection target without credentials, for logs.
    fn target(&self) -> String {
        match &self.url {
            Some(url) => url.split('@').last().unwrap_or(url).to_string(),
            None => format!("{}:{}/{}", self.host, self.port, self.database),
        }
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("target", &self.target())
            .field("user", &self.user)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("idle_timeout", &self.idle_timeout)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Pool Status
// =============================================================================

/// Snapshot of pool occupancy, reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolStatus {
    /// Live connections (idle + in use).
    pub size: u32,
    pub idle: u32,
    pub max_connections: u32,
}

impl PoolStatus {
    pub fn in_use(&self) -> u32 {
        self.size.saturating_sub(self.idle)
    }
}

// =============================================================================
// Pool Manager
// =============================================================================

/// Owner of the bounded connection pool.
///
/// Cloning is cheap and every clone shares the same pool, so the manager is
/// constructed once at startup and passed to whoever needs it.
#[derive(Debug, Clone)]
pub struct PoolManager {
    pool: AnyPool,
    max_connections: u32,
}

impl PoolManager {
    /// Creates the pool without opening a connection.
    ///
    /// Connection failures surface on the first `acquire()` rather than
    /// here, so a server can start while the database is down.
    pub fn new(config: &DbConfig) -> DbResult<Self> {
        install_default_drivers();

        info!(
            target = %config.target(),
            max_connections = config.max_connections,
            "Initializing database pool"
        );

        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_lazy(&config.connect_url())?;

        Ok(PoolManager {
            pool,
            max_connections: config.max_connections,
        })
    }

    /// Checks out one connection, waiting up to the acquire timeout.
    ///
    /// ## Errors
    /// * `DbError::PoolExhausted` - no connection freed up in time
    /// * `DbError::PoolClosed` - the pool has been closed
    /// * `DbError::ConnectionFailed` - a new connection could not be opened
    pub async fn acquire(&self) -> DbResult<PooledConnection> {
        match self.pool.acquire().await {
            Ok(conn) => Ok(conn),
            Err(err) => {
                let err = DbError::from(err);
                if matches!(err, DbError::PoolExhausted) {
                    warn!(
                        max_connections = self.max_connections,
                        "Connection pool exhausted"
                    );
                }
                Err(err)
            }
        }
    }

    /// Hands a connection back to the pool.
    ///
    /// Must be called exactly once for every successful `acquire()`, on
    /// every exit path.
    pub fn release(&self, conn: PooledConnection) {
        drop(conn);
    }

    /// Runs `SELECT 1` through the pool.
    pub async fn health_check(&self) -> DbResult<PoolStatus> {
        let mut conn = self.acquire().await?;
        let result = sqlx::query("SELECT 1").execute(&mut *conn).await;
        self.release(conn);

        result?;
        debug!("Database health check passed");
        Ok(self.status())
    }

    pub fn status(&self) -> PoolStatus {
        PoolStatus {
            size: self.pool.size(),
            idle: self.pool.num_idle() as u32,
            max_connections: self.max_connections,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Closes the pool and waits for checked-out connections to return.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
