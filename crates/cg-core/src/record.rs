//! Record access: field lookup and row identity

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::column::ColumnSpec;
use crate::value::FieldValue;

/// A read-only structured row the engine operates over.
///
/// Implementations return [`FieldValue::Null`] for any field they do not
/// carry; the engine never raises on partial records.
pub trait Record {
    fn field(&self, name: &str) -> FieldValue;
}

impl Record for serde_json::Map<String, serde_json::Value> {
    fn field(&self, name: &str) -> FieldValue {
        self.get(name).map(FieldValue::from_json).unwrap_or_default()
    }
}

impl Record for serde_json::Value {
    fn field(&self, name: &str) -> FieldValue {
        match self {
            serde_json::Value::Object(map) => map.field(name),
            _ => FieldValue::Null,
        }
    }
}

impl Record for IndexMap<String, FieldValue> {
    fn field(&self, name: &str) -> FieldValue {
        self.get(name).cloned().unwrap_or_default()
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> FieldValue {
        (**self).field(name)
    }
}

/// How a record's stable identity is obtained
pub enum RowKey<R> {
    /// Read the identity from a named field
    Field(String),
    /// Compute the identity from the whole record
    Resolver(Arc<dyn Fn(&R) -> String + Send + Sync>),
}

impl<R> Clone for RowKey<R> {
    fn clone(&self) -> Self {
        match self {
            RowKey::Field(name) => RowKey::Field(name.clone()),
            RowKey::Resolver(f) => RowKey::Resolver(Arc::clone(f)),
        }
    }
}

impl<R> fmt::Debug for RowKey<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Field(name) => f.debug_tuple("Field").field(name).finish(),
            RowKey::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

impl<R> Default for RowKey<R> {
    fn default() -> Self {
        RowKey::Field("id".to_string())
    }
}

/// Resolves field values and identity keys off records
pub struct RecordAccessor<R> {
    row_key: RowKey<R>,
}

impl<R> Clone for RecordAccessor<R> {
    fn clone(&self) -> Self {
        Self {
            row_key: self.row_key.clone(),
        }
    }
}

impl<R> fmt::Debug for RecordAccessor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordAccessor")
            .field("row_key", &self.row_key)
            .finish()
    }
}

impl<R> Default for RecordAccessor<R> {
    fn default() -> Self {
        Self {
            row_key: RowKey::default(),
        }
    }
}

impl<R: Record> RecordAccessor<R> {
    pub fn new(row_key: RowKey<R>) -> Self {
        Self { row_key }
    }

    /// Identity keyed by a named field
    pub fn keyed_by(field: impl Into<String>) -> Self {
        Self::new(RowKey::Field(field.into()))
    }

    /// Identity computed by a resolver function
    pub fn resolved_by<F>(resolver: F) -> Self
    where
        F: Fn(&R) -> String + Send + Sync + 'static,
    {
        Self::new(RowKey::Resolver(Arc::new(resolver)))
    }

    /// Stable identity of `record` at position `index`.
    ///
    /// A missing or empty key field falls back to the position. Uniqueness is
    /// the record source's responsibility and is not checked here.
    pub fn identity(&self, record: &R, index: usize) -> String {
        match &self.row_key {
            RowKey::Resolver(resolve) => resolve(record),
            RowKey::Field(name) => {
                let value = record.field(name);
                if value.is_truthy() {
                    value.to_string()
                } else {
                    index.to_string()
                }
            }
        }
    }

    /// Value a column reads, honoring its `data_index` indirection
    pub fn value(&self, record: &R, column: &ColumnSpec<R>) -> FieldValue {
        record.field(column.field_name())
    }
}
