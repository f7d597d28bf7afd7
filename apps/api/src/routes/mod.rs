//! # HTTP Routes
//!
//! ```text
//! GET    /api/health
//! GET    /api/dashboard/stats
//! GET    /api/<entity>          list (joined display names included)
//! POST   /api/<entity>          create
//! PUT    /api/<entity>/{id}     update   (not for sales)
//! DELETE /api/<entity>/{id}     delete   (not for sales)
//! ```

pub mod dashboard;
pub mod entities;
pub mod health;

use std::future::Future;

use pharma_db::DbResult;

use crate::error::{ApiError, ApiResult};

/// Fallback for unknown paths and unsupported methods.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Runs database work on its own task.
///
/// The work finishes and releases its connection even if the client
/// disconnects and the handler future is dropped.
pub(crate) async fn detached<T, F>(work: F) -> ApiResult<T>
where
    F: Future<Output = DbResult<T>> + Send + 'static,
    T: Send + 'static,
{
    match tokio::spawn(work).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(join_err) => Err(ApiError::Internal(join_err.to_string())),
    }
}
