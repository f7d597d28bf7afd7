//! # Renaming Tables
//!
//! The fixed, 1:1, order-preserving mapping between storage column names and
//! the field names the mobile client sees.
//!
//! ## Read and Write Directions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Renaming Table: branch                                 │
//! │                                                                         │
//! │   storage column        role         external field                    │
//! │   ──────────────        ────         ──────────────                    │
//! │   brch_id          ◄──► key     ◄──► branch_id                         │
//! │   pharm_id         ◄──► column  ◄──► pharmacy_id                       │
//! │   brch_name        ◄──► column  ◄──► name                              │
//! │   brch_address     ◄──► column  ◄──► address                           │
//! │   brch_contact     ◄──► column  ◄──► contact                           │
//! │   pharmacy_name     ──► joined   ──► pharmacy_name   (read only)       │
//! │                                                                         │
//! │   to_external: InternalRow ──► ExternalRow  (unknown columns dropped)  │
//! │   to_internal: ExternalRow ──► InternalRow  (client-writable only)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::iter;

use serde_json::Value;

use crate::error::ValidationResult;
use crate::validation::coerce;
use crate::value::{ExternalRow, InternalRow, SqlValue};

/// Storage kind of a field, used to coerce incoming JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Real,
    Text,
}

impl FieldKind {
    /// Human description used in validation messages.
    pub fn describe(self) -> &'static str {
        match self {
            FieldKind::Integer => "an integer",
            FieldKind::Real => "a number",
            FieldKind::Text => "a string",
        }
    }
}

/// How a field participates in reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Primary key assigned by the database on insert.
    GeneratedKey,
    /// Primary key supplied by the client on insert.
    SuppliedKey,
    /// Plain column, read and written.
    Column,
    /// Written on insert, never returned to the client.
    CreateOnly,
    /// Stamped by the server on every insert and update.
    Timestamp,
    /// Display column pulled in by a read-side join.
    Joined,
}

impl FieldRole {
    pub fn is_key(self) -> bool {
        matches!(self, FieldRole::GeneratedKey | FieldRole::SuppliedKey)
    }

    /// Returned to the client on reads.
    pub fn is_readable(self) -> bool {
        !matches!(self, FieldRole::CreateOnly)
    }

    /// Taken from the request body on writes.
    pub fn is_client_writable(self) -> bool {
        matches!(
            self,
            FieldRole::SuppliedKey | FieldRole::Column | FieldRole::CreateOnly
        )
    }

    /// Part of the INSERT column list.
    pub fn is_inserted(self) -> bool {
        self.is_client_writable() || self == FieldRole::Timestamp
    }

    /// Part of the UPDATE SET list.
    pub fn is_updated(self) -> bool {
        matches!(self, FieldRole::Column | FieldRole::Timestamp)
    }
}

/// One storage column paired with its external field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    pub column: &'static str,
    pub name: &'static str,
    pub kind: FieldKind,
    pub role: FieldRole,
}

impl FieldMapping {
    pub const fn new(
        column: &'static str,
        name: &'static str,
        kind: FieldKind,
        role: FieldRole,
    ) -> Self {
        FieldMapping {
            column,
            name,
            kind,
            role,
        }
    }
}

/// The full renaming table of one entity: its key followed by its fields.
#[derive(Debug, Clone, Copy)]
pub struct RenameTable<'a> {
    key: &'a FieldMapping,
    fields: &'a [FieldMapping],
}

impl<'a> RenameTable<'a> {
    pub fn new(key: &'a FieldMapping, fields: &'a [FieldMapping]) -> Self {
        RenameTable { key, fields }
    }

    pub fn key(&self) -> &'a FieldMapping {
        self.key
    }

    /// All mappings in declaration order, key first.
    pub fn iter(&self) -> impl Iterator<Item = &'a FieldMapping> + 'a {
        iter::once(self.key).chain(self.fields.iter())
    }

    /// External name for a storage column, if the column is part of the
    /// readable set.
    pub fn external_name(&self, column: &str) -> Option<&'static str> {
        self.iter()
            .find(|f| f.role.is_readable() && f.column == column)
            .map(|f| f.name)
    }

    /// Storage column for an external field name.
    pub fn column_for(&self, name: &str) -> Option<&'static str> {
        self.iter().find(|f| f.name == name).map(|f| f.column)
    }

    /// Re-keys a fetched row into the client-facing shape.
    ///
    /// Every readable field appears exactly once, in declaration order. A
    /// declared column missing from the row maps to `null`; columns the
    /// table doesn't declare are dropped.
    pub fn to_external(&self, row: &InternalRow) -> ExternalRow {
        self.iter()
            .filter(|f| f.role.is_readable())
            .map(|f| {
                let value = row.get(f.column).map_or(Value::Null, SqlValue::to_json);
                (f.name.to_string(), value)
            })
            .collect()
    }

    /// Maps a client body back to storage columns for the write path.
    ///
    /// Only client-writable fields are taken; absent fields become `NULL`.
    pub fn to_internal(&self, body: &ExternalRow) -> ValidationResult<InternalRow> {
        let mut row = InternalRow::new();
        for field in self.iter().filter(|f| f.role.is_client_writable()) {
            row.push(field.column, coerce(field, body.get(field.name))?);
        }
        Ok(row)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
