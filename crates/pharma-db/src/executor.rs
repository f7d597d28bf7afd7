//! # Column-Mapping Query Executor
//!
//! Runs one parameterized statement on one pooled connection and, for
//! reads, re-keys every row through the entity's renaming table.
//!
//! ## Scoped Acquisition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  execute / fetch_all                                                    │
//! │                                                                         │
//! │   acquire() ──► bind params by position ──► run ──► release()           │
//! │       │                                         │       │               │
//! │       │ PoolExhausted                           │ error │ always        │
//! │       ▼                                         ▼       ▼               │
//! │   return Err                           Err returned only after release  │
//! │                                                                         │
//! │  Two suspension points: acquire and run. No retries.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use sqlx::any::{AnyArguments, AnyRow};
use sqlx::query::Query;
use sqlx::{Any, Column, Row};
use tracing::debug;

use pharma_core::{ExternalRow, InternalRow, RenameTable, SqlValue, Statement};

use crate::error::{DbError, DbResult};
use crate::pool::PoolManager;

/// Acknowledgement of an insert, update or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WriteAck {
    pub rows_affected: u64,
    /// Generated key of an insert, when the backend reports one.
    pub last_insert_id: Option<i64>,
}

/// Executes statements through the shared pool.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    pool: PoolManager,
}

impl QueryExecutor {
    pub fn new(pool: PoolManager) -> Self {
        QueryExecutor { pool }
    }

    pub fn pool(&self) -> &PoolManager {
        &self.pool
    }

    /// Runs a write statement and reports the affected rows.
    pub async fn execute(&self, stmt: &Statement) -> DbResult<WriteAck> {
        debug!(sql = %stmt.sql, params = stmt.params.len(), "Executing statement");

        let mut conn = self.pool.acquire().await?;
        let result = bind_params(sqlx::query(&stmt.sql), &stmt.params)
            .execute(&mut *conn)
            .await;
        self.pool.release(conn);

        let done = result.map_err(|e| failed(stmt, e))?;
        Ok(WriteAck {
            rows_affected: done.rows_affected(),
            last_insert_id: done.last_insert_id(),
        })
    }

    /// Runs a query and returns its rows keyed by storage column names.
    pub async fn fetch_all(&self, stmt: &Statement) -> DbResult<Vec<InternalRow>> {
        debug!(sql = %stmt.sql, params = stmt.params.len(), "Fetching rows");

        let mut conn = self.pool.acquire().await?;
        let result = bind_params(sqlx::query(&stmt.sql), &stmt.params)
            .fetch_all(&mut *conn)
            .await;
        self.pool.release(conn);

        let rows = result.map_err(|e| failed(stmt, e))?;
        rows.iter().map(decode_row).collect()
    }

    /// Runs a query and re-keys every row to external field names.
    ///
    /// Columns missing from the renaming table are dropped.
    pub async fn fetch_mapped(
        &self,
        stmt: &Statement,
        renames: &RenameTable<'_>,
    ) -> DbResult<Vec<ExternalRow>> {
        let rows = self.fetch_all(stmt).await?;
        debug!(count = rows.len(), "Mapping rows");
        Ok(rows.iter().map(|row| renames.to_external(row)).collect())
    }

    /// First column of the first row, or `Null` for an empty result.
    pub async fn fetch_scalar(&self, stmt: &Statement) -> DbResult<SqlValue> {
        let rows = self.fetch_all(stmt).await?;
        Ok(rows
            .first()
            .and_then(InternalRow::first)
            .cloned()
            .unwrap_or(SqlValue::Null))
    }
}

fn failed(stmt: &Statement, err: sqlx::Error) -> DbError {
    let err = DbError::from(err);
    debug!(sql = %stmt.sql, error = %err, "Statement failed");
    err
}

// =============================================================================
// Binding and Decoding
// =============================================================================

/// Binds parameters by position. Values never enter the statement text.
fn bind_params<'q>(
    mut query: Query<'q, Any, AnyArguments<'q>>,
    params: &[SqlValue],
) -> Query<'q, Any, AnyArguments<'q>> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Integer(v) => query.bind(*v),
            SqlValue::Real(v) => query.bind(*v),
            SqlValue::Text(s) => query.bind(s.clone()),
        };
    }
    query
}

fn decode_row(row: &AnyRow) -> DbResult<InternalRow> {
    let mut out = InternalRow::new();
    for (index, column) in row.columns().iter().enumerate() {
        out.push(column.name(), decode_value(row, index, column.name())?);
    }
    Ok(out)
}

/// Decodes one column, trying the narrowest type first.
fn decode_value(row: &AnyRow, index: usize, name: &str) -> DbResult<SqlValue> {
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return Ok(v.into());
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return Ok(v.into());
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return Ok(v.into());
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(index) {
        return Ok(v.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()).into());
    }
    match row.try_get::<Option<bool>, _>(index) {
        Ok(v) => Ok(v.map(i64::from).into()),
        Err(err) => Err(DbError::Decode {
            column: name.to_string(),
            message: err.to_string(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
