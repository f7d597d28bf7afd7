//! # Database Error Types
//!
//! Error types for pool and statement failures.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Driver error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Categorized, driver message kept verbatim     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (apps/api) ← HTTP 500 { success: false, error }              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No variant is retried anywhere. Every `DbError` is terminal for the
//! request that produced it.

use thiserror::Error;

/// Database operation errors.
///
/// `Display` yields the text returned to clients, so the driver's own
/// message is passed through unchanged.
#[derive(Debug, Error)]
pub enum DbError {
    /// No connection became free within the acquire timeout.
    #[error("Connection pool exhausted: no connection available within the acquire timeout")]
    PoolExhausted,

    /// The pool was closed (shutdown in progress).
    #[error("Connection pool is closed")]
    PoolClosed,

    /// Establishing a connection failed (bad host, credentials, ...).
    #[error("{0}")]
    ConnectionFailed(String),

    /// The backend rejected or failed the statement.
    #[error("{0}")]
    Query(String),

    /// A fetched column could not be converted to a [`pharma_core::SqlValue`].
    #[error("Could not decode column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Invalid connection settings.
    #[error("Invalid database configuration: {0}")]
    Config(String),
}

impl DbError {
    /// True when the error came from the pool rather than the backend.
    pub fn is_pool_error(&self) -> bool {
        matches!(self, DbError::PoolExhausted | DbError::PoolClosed)
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::PoolClosed
/// sqlx::Error::Database       → DbError::Query (driver message)
/// sqlx::Error::Io / Tls       → DbError::ConnectionFailed
/// sqlx::Error::Configuration  → DbError::Config
/// Other                       → DbError::Query
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::PoolClosed,
            sqlx::Error::Database(db_err) => DbError::Query(db_err.message().to_string()),
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) => DbError::ConnectionFailed(err.to_string()),
            sqlx::Error::Configuration(_) => DbError::Config(err.to_string()),
            _ => DbError::Query(err.to_string()),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================
