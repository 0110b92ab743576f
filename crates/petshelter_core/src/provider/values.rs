//! Column-keyed value maps used for inserts and updates.

use rusqlite::types::Value;
use std::collections::BTreeMap;

/// Ordered map of column name to SQLite value.
///
/// Only keys that are present take part in a write; a key mapped to
/// `Value::Null` is present and writes NULL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentValues {
    values: BTreeMap<String, Value>,
}

impl ContentValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn put_str(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.put(key, Value::Text(value.into()))
    }

    pub fn put_i64(&mut self, key: impl Into<String>, value: i64) -> &mut Self {
        self.put(key, Value::Integer(value))
    }

    pub fn put_null(&mut self, key: impl Into<String>) -> &mut Self {
        self.put(key, Value::Null)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Reads a value as text; numbers are rendered, NULL and blobs are `None`.
    pub fn get_as_string(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            Value::Text(text) => Some(text.clone()),
            Value::Integer(number) => Some(number.to_string()),
            Value::Real(number) => Some(number.to_string()),
            Value::Null | Value::Blob(_) => None,
        }
    }

    /// Reads a value as an integer; numeric text is parsed.
    pub fn get_as_integer(&self, key: &str) -> Option<i64> {
        match self.values.get(key)? {
            Value::Integer(number) => Some(*number),
            Value::Text(text) => text.trim().parse().ok(),
            Value::Null | Value::Real(_) | Value::Blob(_) => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
