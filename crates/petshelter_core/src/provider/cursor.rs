//! Materialized query results.

use super::uri::ContentUri;
use rusqlite::types::Value;

/// Rows returned by a provider query, in query order.
///
/// The cursor remembers the address it was queried for so callers can
/// register for changes on it and re-query when notified.
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    notification_uri: ContentUri,
}

/// Borrowed view of one cursor row.
#[derive(Debug, Clone, Copy)]
pub struct CursorRow<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl Cursor {
    pub(crate) fn new(
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
        notification_uri: ContentUri,
    ) -> Self {
        Self {
            columns,
            rows,
            notification_uri,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<CursorRow<'_>> {
        self.rows.get(index).map(|values| CursorRow {
            columns: &self.columns,
            values,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = CursorRow<'_>> {
        self.rows.iter().map(|values| CursorRow {
            columns: &self.columns,
            values,
        })
    }

    pub fn notification_uri(&self) -> &ContentUri {
        &self.notification_uri
    }
}

impl<'a> CursorRow<'a> {
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        let index = self.columns.iter().position(|name| name == column)?;
        self.values.get(index)
    }

    pub fn get_i64(&self, column: &str) -> Option<i64> {
        match self.get(column)? {
            Value::Integer(number) => Some(*number),
            _ => None,
        }
    }

    pub fn get_str(&self, column: &str) -> Option<&'a str> {
        match self.get(column)? {
            Value::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }
}
