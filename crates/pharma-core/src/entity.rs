//! # Entities and Statements
//!
//! An [`Entity`] is the declarative description of one table: its renaming
//! table, read-side joins, required fields and supported operations. Every
//! statement the gateway runs is built here from those static identifiers.
//!
//! ## Statement Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list    SELECT CAST(b.brch_id AS SIGNED) AS brch_id, ...,              │
//! │          CAST(p.pharm_name AS CHAR) AS pharmacy_name                    │
//! │          FROM branch b LEFT JOIN pharmacy p ON b.pharm_id = p.pharm_id  │
//! │          ORDER BY b.brch_id ASC                                         │
//! │                                                                         │
//! │  insert  INSERT INTO branch (pharm_id, brch_name, ...) VALUES (?, ?, ..)│
//! │  update  UPDATE branch SET pharm_id = ?, ... WHERE brch_id = ?          │
//! │  delete  DELETE FROM branch WHERE brch_id = ?                           │
//! │                                                                         │
//! │  Request values only ever travel as positional parameters.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};

use crate::error::{ValidationError, ValidationResult};
use crate::schema::{FieldKind, FieldMapping, FieldRole, RenameTable};
use crate::validation::check_required;
use crate::value::{ExternalRow, InternalRow, SqlValue};

/// Format of server-stamped timestamp columns.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A read-side join that embeds a related entity's display columns.
#[derive(Debug, Clone, Copy)]
pub struct Join {
    pub table: &'static str,
    pub alias: &'static str,
    /// Column on the listed entity's table.
    pub local_column: &'static str,
    /// Column on the joined table.
    pub remote_column: &'static str,
    /// `(joined column, select alias)` pairs.
    pub select: &'static [(&'static str, &'static str)],
}

/// Past-tense verb used in write acknowledgements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteVerb {
    Added,
    Updated,
    Deleted,
}

impl WriteVerb {
    pub fn as_str(self) -> &'static str {
        match self {
            WriteVerb::Added => "added",
            WriteVerb::Updated => "updated",
            WriteVerb::Deleted => "deleted",
        }
    }
}

/// A statement with its positional parameters, ready for the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Statement {
            sql: sql.into(),
            params,
        }
    }
}

/// Declarative description of one business entity.
#[derive(Debug)]
pub struct Entity {
    /// Display name used in messages, e.g. "Pharmacy".
    pub label: &'static str,
    /// Route segment under `/api`, e.g. "pharmacies".
    pub path: &'static str,
    pub table: &'static str,
    pub alias: &'static str,
    pub key: FieldMapping,
    pub fields: &'static [FieldMapping],
    pub joins: &'static [Join],
    /// External names that must be present on create and update. On update
    /// the key comes from the path, so a required key name is not checked.
    pub required: &'static [&'static str],
    pub required_message: &'static str,
    /// `(external name, text value)` applied when the client omits a field.
    pub defaults: &'static [(&'static str, &'static str)],
    pub newest_first: bool,
    pub supports_update: bool,
    pub supports_delete: bool,
}

impl Entity {
    pub fn renames(&self) -> RenameTable<'_> {
        RenameTable::new(&self.key, self.fields)
    }

    /// Acknowledgement text, e.g. "Pharmacy added successfully".
    pub fn message(&self, verb: WriteVerb) -> String {
        format!("{} {} successfully", self.label, verb.as_str())
    }

    // =========================================================================
    // Statement Text
    // =========================================================================

    /// The list query: every readable column plus joined names.
    ///
    /// Columns are projected to BIGINT, DOUBLE or CHAR so the runtime-selected
    /// driver can decode them whatever the storage type (DECIMAL, DATE,
    /// TINYINT). Columns missing from the renaming table are never selected.
    pub fn select_sql(&self) -> String {
        let mut columns: Vec<String> = self
            .renames()
            .iter()
            .filter(|f| f.role.is_readable() && f.role != FieldRole::Joined)
            .map(|f| project(self.alias, f.column, f.kind, f.column))
            .collect();
        let mut joins = String::new();

        for join in self.joins {
            for (column, alias) in join.select {
                columns.push(project(join.alias, column, FieldKind::Text, alias));
            }
            joins.push_str(&format!(
                " LEFT JOIN {} {} ON {}.{} = {}.{}",
                join.table, join.alias, self.alias, join.local_column, join.alias, join.remote_column
            ));
        }

        format!(
            "SELECT {} FROM {} {}{} ORDER BY {}.{} {}",
            columns.join(", "),
            self.table,
            self.alias,
            joins,
            self.alias,
            self.key.column,
            if self.newest_first { "DESC" } else { "ASC" }
        )
    }

    pub fn insert_sql(&self) -> String {
        let columns: Vec<_> = self.inserted_fields().map(|f| f.column).collect();
        let placeholders = vec!["?"; columns.len()];
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders.join(", ")
        )
    }

    pub fn update_sql(&self) -> String {
        let assignments: Vec<_> = self
            .updated_fields()
            .map(|f| format!("{} = ?", f.column))
            .collect();
        format!(
            "UPDATE {} SET {} WHERE {} = ?",
            self.table,
            assignments.join(", "),
            self.key.column
        )
    }

    pub fn delete_sql(&self) -> String {
        format!("DELETE FROM {} WHERE {} = ?", self.table, self.key.column)
    }

    // =========================================================================
    // Prepared Writes
    // =========================================================================

    /// Parses a path key into a parameter of the key's kind.
    pub fn parse_key(&self, raw: &str) -> ValidationResult<SqlValue> {
        let invalid = || ValidationError::InvalidKey {
            field: self.key.name,
            value: raw.to_string(),
        };
        match self.key.kind {
            FieldKind::Integer => raw.trim().parse().map(SqlValue::Integer).map_err(|_| invalid()),
            FieldKind::Real => raw.trim().parse().map(SqlValue::Real).map_err(|_| invalid()),
            FieldKind::Text if raw.trim().is_empty() => Err(invalid()),
            FieldKind::Text => Ok(SqlValue::Text(raw.to_string())),
        }
    }

    /// Validates a create body and binds it to the INSERT statement.
    pub fn prepare_insert(&self, body: &ExternalRow, now: DateTime<Utc>) -> ValidationResult<Statement> {
        let row = self.validated_row(body, self.required)?;
        let params = self.bind(self.inserted_fields(), &row, now);
        Ok(Statement::new(self.insert_sql(), params))
    }

    /// Validates an update body and binds it, followed by the key.
    pub fn prepare_update(
        &self,
        key: &str,
        body: &ExternalRow,
        now: DateTime<Utc>,
    ) -> ValidationResult<Statement> {
        let key = self.parse_key(key)?;
        let required: Vec<&str> = self
            .required
            .iter()
            .copied()
            .filter(|name| *name != self.key.name)
            .collect();
        let row = self.validated_row(body, &required)?;
        let mut params = self.bind(self.updated_fields(), &row, now);
        params.push(key);
        Ok(Statement::new(self.update_sql(), params))
    }

    pub fn prepare_delete(&self, key: &str) -> ValidationResult<Statement> {
        let key = self.parse_key(key)?;
        Ok(Statement::new(self.delete_sql(), vec![key]))
    }

    fn inserted_fields(&self) -> impl Iterator<Item = &FieldMapping> + '_ {
        self.renames().iter().filter(|f| f.role.is_inserted())
    }

    fn updated_fields(&self) -> impl Iterator<Item = &FieldMapping> + '_ {
        self.renames().iter().filter(|f| f.role.is_updated())
    }

    fn validated_row(&self, body: &ExternalRow, required: &[&str]) -> ValidationResult<InternalRow> {
        check_required(body, required, self.required_message)?;
        let mut row = self.renames().to_internal(body)?;
        for (name, value) in self.defaults {
            if let Some(column) = self.renames().column_for(name) {
                if row.get(column).map_or(true, SqlValue::is_null) {
                    row.set(column, SqlValue::from(*value));
                }
            }
        }
        Ok(row)
    }

    fn bind<'a>(
        &self,
        fields: impl Iterator<Item = &'a FieldMapping>,
        row: &InternalRow,
        now: DateTime<Utc>,
    ) -> Vec<SqlValue> {
        fields
            .map(|f| match f.role {
                FieldRole::Timestamp => SqlValue::Text(now.format(TIMESTAMP_FORMAT).to_string()),
                _ => row.get(f.column).cloned().unwrap_or(SqlValue::Null),
            })
            .collect()
    }
}

/// Projects one column to a type both backends decode.
fn project(table: &str, column: &str, kind: FieldKind, alias: &str) -> String {
    match kind {
        FieldKind::Integer => format!("CAST({table}.{column} AS SIGNED) AS {alias}"),
        FieldKind::Real => format!("{table}.{column} + 0E0 AS {alias}"),
        FieldKind::Text => format!("CAST({table}.{column} AS CHAR) AS {alias}"),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
