//! # Error Types
//!
//! Domain-specific error types for pharma-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pharma-core errors (this file)                                        │
//! │  └── ValidationError  - Request rejected before any database call      │
//! │                                                                         │
//! │  pharma-db errors (separate crate)                                     │
//! │  └── DbError          - Pool or driver failures                        │
//! │                                                                         │
//! │  API errors (in app)                                                   │
//! │  └── ApiError         - What the mobile client sees                    │
//! │                                                                         │
//! │  Flow: ValidationError ──► ApiError (400)                               │
//! │        DbError ──────────► ApiError (500)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. The `Display` text is exactly what the client receives
//! 3. A validation error always short-circuits before the executor runs

use thiserror::Error;

/// Input validation errors.
///
/// These errors occur when a request body or path parameter doesn't meet
/// the entity's declared requirements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required fields are absent.
    ///
    /// The message comes from the entity catalogue, e.g.
    /// "Employee ID, Product ID, and Quantity are required".
    #[error("{message}")]
    MissingFields { message: &'static str },

    /// A field is present but cannot be coerced to its declared kind.
    #[error("{field} must be {expected}")]
    InvalidValue {
        field: &'static str,
        expected: &'static str,
    },

    /// A path key cannot be parsed as the entity's key kind.
    #[error("Invalid {field}: {value}")]
    InvalidKey { field: &'static str, value: String },

    /// The request body is not a JSON object.
    #[error("Invalid JSON body")]
    MalformedBody,
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MissingFields {
            message: "Name is required",
        };
        assert_eq!(err.to_string(), "Name is required");

        let err = ValidationError::InvalidValue {
            field: "quantity",
            expected: "an integer",
        };
        assert_eq!(err.to_string(), "quantity must be an integer");

        let err = ValidationError::InvalidKey {
            field: "pharmacy_id",
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid pharmacy_id: abc");
    }
}
