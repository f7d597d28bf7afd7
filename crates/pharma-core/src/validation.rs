//! # Validation Module
//!
//! Boundary checks applied to request bodies before a statement is built.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Mobile client                                                │
//! │  └── Form-level checks                                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Declarative required-field list per entity                        │
//! │  └── Coercion of each field to its declared kind                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (external schema)                                   │
//! │  ├── NOT NULL constraints                                              │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde_json::Value;

use crate::error::{ValidationError, ValidationResult};
use crate::schema::{FieldKind, FieldMapping};
use crate::value::{ExternalRow, SqlValue};

/// Returns true if a body value counts as supplied.
///
/// Absent, `null`, blank strings, `false` and numeric zero all count as
/// missing, so a sale of 0 units is rejected as "Quantity required".
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::Bool(b)) => *b,
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Checks that every field in `required` is present in `body`.
///
/// ## Example
/// ```rust
/// use pharma_core::validation::check_required;
/// use serde_json::json;
///
/// let body = json!({ "name": "Acme" });
/// let body = body.as_object().unwrap();
/// assert!(check_required(body, &["name"], "Name is required").is_ok());
/// assert!(check_required(body, &["name", "pharmacy_id"], "missing").is_err());
/// ```
pub fn check_required(
    body: &ExternalRow,
    required: &[&str],
    message: &'static str,
) -> ValidationResult<()> {
    if required.iter().all(|name| is_present(body.get(*name))) {
        Ok(())
    } else {
        Err(ValidationError::MissingFields { message })
    }
}

/// Coerces an optional body value to the field's declared kind.
///
/// `null`, absent and blank-string values bind as SQL `NULL`.
pub fn coerce(field: &FieldMapping, value: Option<&Value>) -> ValidationResult<SqlValue> {
    let invalid = || ValidationError::InvalidValue {
        field: field.name,
        expected: field.kind.describe(),
    };

    let value = match value {
        None | Some(Value::Null) => return Ok(SqlValue::Null),
        Some(Value::String(s)) if s.trim().is_empty() && field.kind != FieldKind::Text => {
            return Ok(SqlValue::Null)
        }
        Some(v) => v,
    };

    match field.kind {
        FieldKind::Integer => match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(f))
                        .map(|f| f as i64)
                })
                .map(SqlValue::Integer)
                .ok_or_else(invalid),
            Value::String(s) => s.trim().parse().map(SqlValue::Integer).map_err(|_| invalid()),
            _ => Err(invalid()),
        },
        FieldKind::Real => match value {
            Value::Number(n) => n.as_f64().map(SqlValue::Real).ok_or_else(invalid),
            Value::String(s) => s.trim().parse().map(SqlValue::Real).map_err(|_| invalid()),
            _ => Err(invalid()),
        },
        FieldKind::Text => match value {
            Value::String(s) => Ok(SqlValue::Text(s.clone())),
            Value::Number(n) => Ok(SqlValue::Text(n.to_string())),
            Value::Bool(b) => Ok(SqlValue::Text(b.to_string())),
            _ => Err(invalid()),
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
