//! Custom Axum extractors

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde_json::Value;

use pharma_core::{ExternalRow, ValidationError};

use crate::error::ApiError;

/// A request body that must be a JSON object.
///
/// An empty body reads as `{}`. Anything else that is not a JSON object
/// is rejected with 400 "Invalid JSON body". The content type is not
/// checked.
#[derive(Debug)]
pub struct JsonBody(pub ExternalRow);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::MalformedBody))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(ExternalRow::new()));
        }

        match serde_json::from_slice(&bytes) {
            Ok(Value::Object(map)) => Ok(JsonBody(map)),
            _ => Err(ApiError::Validation(ValidationError::MalformedBody)),
        }
    }
}
