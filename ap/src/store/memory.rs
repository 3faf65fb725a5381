//! In-memory record store

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use super::{Fields, Filter, RecordStore, StoreError, project, single};

/// Record store kept entirely in memory
///
/// Tables are created on first insert. Suitable for tests and for embedding
/// the tracker where persistence is handled elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Fields>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to `table`
    pub fn insert(&self, table: &str, record: Fields) {
        debug!(%table, "MemoryStore::insert: called");
        self.lock().entry(table.to_string()).or_default().push(record);
    }

    /// Insert any serializable value as a record
    pub fn insert_value<T: serde::Serialize>(&self, table: &str, value: &T) -> Result<(), StoreError> {
        match serde_json::to_value(value)? {
            serde_json::Value::Object(record) => {
                self.insert(table, record);
                Ok(())
            }
            _ => Err(StoreError::Rejected("record must serialize to a JSON object".to_string())),
        }
    }

    /// All records in `table`, in insertion order
    pub fn list(&self, table: &str) -> Vec<Fields> {
        self.lock().get(table).cloned().unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Fields>>> {
        // a poisoned map is still structurally sound
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch(&self, table: &str, filter: &Filter, columns: &[&str]) -> Result<Fields, StoreError> {
        debug!(%table, %filter, ?columns, "MemoryStore::fetch: called");
        let tables = self.lock();
        let rows: Vec<&Fields> = tables
            .get(table)
            .map(|rows| rows.iter().filter(|r| filter.matches(r)).collect())
            .unwrap_or_default();
        let record = single(table, filter, rows)?;
        Ok(project(record, columns))
    }

    async fn write(&self, table: &str, filter: &Filter, fields: Fields) -> Result<(), StoreError> {
        debug!(%table, %filter, field_count = fields.len(), "MemoryStore::write: called");
        let mut tables = self.lock();
        let mut updated = 0;
        if let Some(rows) = tables.get_mut(table) {
            for row in rows.iter_mut().filter(|r| filter.matches(r)) {
                row.extend(fields.clone());
                updated += 1;
            }
        }
        if updated == 0 {
            return Err(StoreError::NotFound {
                table: table.to_string(),
                filter: filter.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_fetch_selects_columns() {
        let store = MemoryStore::new();
        store.insert("artifacts", fields(json!({"id": "a1", "name": "n", "sections_total": 3})));

        let got = store
            .fetch("artifacts", &Filter::id("a1"), &["sections_total"])
            .await
            .unwrap();
        assert_eq!(got, fields(json!({"sections_total": 3})));
    }

    #[tokio::test]
    async fn test_fetch_missing_table_or_record() {
        let store = MemoryStore::new();
        let err = store.fetch("artifacts", &Filter::id("a1"), &[]).await.unwrap_err();
        assert!(err.is_not_found());

        store.insert("artifacts", fields(json!({"id": "a2"})));
        let err = store.fetch("artifacts", &Filter::id("a1"), &[]).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_write_merges_fields() {
        let store = MemoryStore::new();
        store.insert("artifacts", fields(json!({"id": "a1", "name": "old", "slug": "s"})));

        store
            .write("artifacts", &Filter::id("a1"), fields(json!({"name": "new"})))
            .await
            .unwrap();

        let rows = store.list("artifacts");
        assert_eq!(rows[0]["name"], "new");
        assert_eq!(rows[0]["slug"], "s");
    }

    #[tokio::test]
    async fn test_write_without_match_fails() {
        let store = MemoryStore::new();
        let err = store
            .write("artifacts", &Filter::id("ghost"), Fields::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_insert_value_rejects_non_objects() {
        let store = MemoryStore::new();
        assert!(store.insert_value("t", &json!([1, 2])).is_err());
        assert!(store.insert_value("t", &json!({"id": "x"})).is_ok());
        assert_eq!(store.list("t").len(), 1);
    }
}
