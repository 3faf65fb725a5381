//! External record store capability
//!
//! The tracker only ever needs two calls against persistence: select named
//! fields from one record, and update named fields on it. `RecordStore`
//! captures exactly that so the backing database can be swapped for a fake.

mod file;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Column name to value map for one record
pub type Fields = serde_json::Map<String, Value>;

/// Equality filter on a single column
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    /// `field == value`
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// `id == id`
    pub fn id(id: &str) -> Self {
        Self::equals("id", id)
    }

    /// Check if a record satisfies the filter
    pub fn matches(&self, record: &Fields) -> bool {
        record.get(&self.field) == Some(&self.value)
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.field, self.value)
    }
}

/// Errors reported by a record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No record in {table} where {filter}")]
    NotFound { table: String, filter: String },

    #[error("Expected one record in {table}, found {count}")]
    MultipleRows { table: String, count: usize },

    #[error("Write rejected: {0}")]
    Rejected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Check if this is a missing-record error
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Minimal persistence contract used by the tracker
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Select `columns` from the single record matching `filter`
    ///
    /// An empty `columns` slice selects every column. Columns the record does
    /// not carry are left out of the result.
    async fn fetch(&self, table: &str, filter: &Filter, columns: &[&str]) -> Result<Fields, StoreError>;

    /// Merge `fields` into every record matching `filter`
    async fn write(&self, table: &str, filter: &Filter, fields: Fields) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    async fn fetch(&self, table: &str, filter: &Filter, columns: &[&str]) -> Result<Fields, StoreError> {
        (**self).fetch(table, filter, columns).await
    }

    async fn write(&self, table: &str, filter: &Filter, fields: Fields) -> Result<(), StoreError> {
        (**self).write(table, filter, fields).await
    }
}

/// Keep only the requested columns of a record
pub(crate) fn project(record: &Fields, columns: &[&str]) -> Fields {
    if columns.is_empty() {
        return record.clone();
    }
    columns
        .iter()
        .filter_map(|c| record.get(*c).map(|v| (c.to_string(), v.clone())))
        .collect()
}

/// Resolve a match list to exactly one record
pub(crate) fn single<'a>(
    table: &str,
    filter: &Filter,
    mut matches: Vec<&'a Fields>,
) -> Result<&'a Fields, StoreError> {
    match matches.len() {
        0 => Err(StoreError::NotFound {
            table: table.to_string(),
            filter: filter.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        count => Err(StoreError::MultipleRows {
            table: table.to_string(),
            count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> Fields {
        json!({"id": "a1", "name": "concept.md", "sections_total": 6})
            .as_object()
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_filter_matches() {
        assert!(Filter::id("a1").matches(&record()));
        assert!(!Filter::id("a2").matches(&record()));
        assert!(Filter::equals("sections_total", 6).matches(&record()));
        assert!(!Filter::equals("missing", 1).matches(&record()));
    }

    #[test]
    fn test_filter_display() {
        assert_eq!(Filter::id("a1").to_string(), "id = \"a1\"");
    }

    #[test]
    fn test_project_columns() {
        let r = record();
        assert_eq!(project(&r, &[]), r);

        let p = project(&r, &["name", "nope"]);
        assert_eq!(p.len(), 1);
        assert_eq!(p["name"], "concept.md");
    }

    #[test]
    fn test_single() {
        let a = record();
        let b = record();
        let filter = Filter::id("a1");

        assert!(single("t", &filter, vec![&a]).is_ok());
        assert!(single("t", &filter, vec![]).unwrap_err().is_not_found());
        assert!(matches!(
            single("t", &filter, vec![&a, &b]),
            Err(StoreError::MultipleRows { count: 2, .. })
        ));
    }
}
