//! # SQL Values and Rows
//!
//! Backend-neutral representation of bound parameters and fetched rows.
//!
//! ```text
//!   request JSON ──coerce──► SqlValue ──bind──► statement
//!   result row ──decode──► InternalRow ──rename──► ExternalRow (JSON)
//! ```

use serde_json::{Map, Number, Value};

/// A row keyed by external field names, in renaming-table order.
pub type ExternalRow = Map<String, Value>;

/// A single positional parameter or fetched column value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    /// Returns true for SQL `NULL`.
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Numeric view of the value, used for aggregate results.
    ///
    /// Reals are truncated; text is parsed if it holds an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(v) => Some(*v),
            SqlValue::Real(v) => Some(*v as i64),
            SqlValue::Text(s) => s.trim().parse().ok(),
            SqlValue::Null => None,
        }
    }

    /// Floating point view of the value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Integer(v) => Some(*v as f64),
            SqlValue::Real(v) => Some(*v),
            SqlValue::Text(s) => s.trim().parse().ok(),
            SqlValue::Null => None,
        }
    }

    /// Borrowed text, only for `Text` values.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Converts the value to its JSON form for the client.
    ///
    /// Non-finite reals have no JSON representation and become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            SqlValue::Null => Value::Null,
            SqlValue::Integer(v) => Value::Number((*v).into()),
            SqlValue::Real(v) => Number::from_f64(*v).map_or(Value::Null, Value::Number),
            SqlValue::Text(s) => Value::String(s.clone()),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Real(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

/// A fetched row keyed by internal (storage) column names.
///
/// Columns keep the order the driver returned them in. Lookups return the
/// first column with a matching name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InternalRow {
    columns: Vec<(String, SqlValue)>,
}

impl InternalRow {
    pub fn new() -> Self {
        InternalRow::default()
    }

    /// Appends a column.
    pub fn push(&mut self, column: impl Into<String>, value: SqlValue) {
        self.columns.push((column.into(), value));
    }

    /// Replaces the first column with this name, or appends it.
    pub fn set(&mut self, column: &str, value: SqlValue) {
        match self.columns.iter_mut().find(|(name, _)| name == column) {
            Some((_, slot)) => *slot = value,
            None => self.columns.push((column.to_string(), value)),
        }
    }

    /// Looks up a column by its storage name.
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// The first column's value; aggregate queries return a single column.
    pub fn first(&self) -> Option<&SqlValue> {
        self.columns.first().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>> FromIterator<(K, SqlValue)> for InternalRow {
    fn from_iter<I: IntoIterator<Item = (K, SqlValue)>>(iter: I) -> Self {
        InternalRow {
            columns: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
