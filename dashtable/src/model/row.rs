//! Row access and row identity

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use super::Value;
use crate::error::RowIdError;

/// Key-based field access for rows.
///
/// Columns configured with an accessor key read their value through
/// [`field`](TableRow::field). Row types that are only read through accessor
/// functions can rely on the default implementation.
///
/// # Example
///
/// ```
/// use dashtable::{TableRow, Value};
///
/// struct User {
///     name: String,
///     age: u32,
/// }
///
/// impl TableRow for User {
///     fn field(&self, key: &str) -> Value {
///         match key {
///             "name" => Value::from(self.name.as_str()),
///             "age" => Value::from(self.age),
///             _ => Value::Null,
///         }
///     }
/// }
/// ```
pub trait TableRow {
    /// Returns the value stored under `key`, or `Null` if there is none.
    fn field(&self, key: &str) -> Value {
        let _ = key;
        Value::Null
    }
}

impl TableRow for serde_json::Map<String, serde_json::Value> {
    fn field(&self, key: &str) -> Value {
        self.get(key).map(Value::from_json).unwrap_or_default()
    }
}

impl TableRow for serde_json::Value {
    fn field(&self, key: &str) -> Value {
        self.get(key).map(Value::from_json).unwrap_or_default()
    }
}

impl TableRow for HashMap<String, Value> {
    fn field(&self, key: &str) -> Value {
        self.get(key).cloned().unwrap_or_default()
    }
}

impl TableRow for BTreeMap<String, Value> {
    fn field(&self, key: &str) -> Value {
        self.get(key).cloned().unwrap_or_default()
    }
}

impl<R: TableRow + ?Sized> TableRow for &R {
    fn field(&self, key: &str) -> Value {
        (**self).field(key)
    }
}

/// Identifier of a selectable row.
///
/// Two rows resolving to the same id are the same selectable entity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    /// Creates a row id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RowId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for RowId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<u32> for RowId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

type RowIdFn<T> = Arc<dyn Fn(&T) -> Option<RowId> + Send + Sync>;

/// Derives a [`RowId`] from a row.
pub enum RowIdResolver<T> {
    /// Read the id from a field; null or empty values fail resolution.
    Key(String),
    /// Compute the id; `None` fails resolution.
    Fn(RowIdFn<T>),
}

impl<T> RowIdResolver<T> {
    /// Resolver reading the id from a field.
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    /// Resolver computing the id with a function.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&T) -> Option<RowId> + Send + Sync + 'static,
    {
        Self::Fn(Arc::new(f))
    }
}

impl<T: TableRow> RowIdResolver<T> {
    /// Resolves the id of the row at `row_index`.
    pub fn resolve(&self, row_index: usize, row: &T) -> Result<RowId, RowIdError> {
        self.try_resolve(row)
            .map_err(|reason| RowIdError::new(row_index, reason))
    }

    pub(crate) fn try_resolve(&self, row: &T) -> Result<RowId, String> {
        match self {
            Self::Key(key) => match row.field(key) {
                Value::Null => Err(format!("field '{}' is missing or null", key)),
                value => {
                    let id = value.to_string();
                    if id.is_empty() {
                        Err(format!("field '{}' is empty", key))
                    } else {
                        Ok(RowId(id))
                    }
                }
            },
            Self::Fn(f) => f(row).ok_or_else(|| "resolver returned no id".to_string()),
        }
    }
}

impl<T> Clone for RowIdResolver<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Key(key) => Self::Key(key.clone()),
            Self::Fn(f) => Self::Fn(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for RowIdResolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.debug_tuple("Key").field(key).finish(),
            Self::Fn(_) => f.write_str("Fn(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_resolver_reads_json_field() {
        let row = serde_json::json!({ "id": 17, "name": "alpha" });
        let resolver = RowIdResolver::key("id");
        assert_eq!(resolver.resolve(0, &row), Ok(RowId::from("17")));
    }

    #[test]
    fn test_key_resolver_rejects_missing_field() {
        let row = serde_json::json!({ "name": "alpha" });
        let resolver: RowIdResolver<serde_json::Value> = RowIdResolver::key("id");
        let err = resolver.resolve(4, &row).unwrap_err();
        assert_eq!(err.row_index, Some(4));
    }

    struct Tag {
        id: u32,
        label: &'static str,
    }

    impl TableRow for Tag {}

    #[test]
    fn test_fn_resolver() {
        let resolver =
            RowIdResolver::func(|row: &Tag| (!row.label.is_empty()).then(|| RowId::from(row.id)));
        let named = Tag { id: 3, label: "x" };
        let unnamed = Tag { id: 4, label: "" };
        assert_eq!(resolver.resolve(0, &named), Ok(RowId::from("3")));
        assert!(resolver.resolve(1, &unnamed).is_err());
    }
}
