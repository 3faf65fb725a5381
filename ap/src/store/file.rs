//! JSON file record store
//!
//! ```text
//! {root}/
//! └── {table}/
//!     ├── {id}.json
//!     └── ...
//! ```
//!
//! One pretty-printed JSON object per record, named after its `id` column.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use super::{Fields, Filter, RecordStore, StoreError, project, single};

/// Record store backed by a directory of JSON documents
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    /// Base path for storage
    root: PathBuf,
}

impl JsonFileStore {
    /// Open or create a store at the given path
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = path.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        debug!(root = %root.display(), "JsonFileStore::open: opened");
        Ok(Self { root })
    }

    /// Base path of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Insert or replace a record; it must carry a string `id`
    pub async fn insert(&self, table: &str, record: Fields) -> Result<(), StoreError> {
        let id = record
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| StoreError::Rejected("record has no string id".to_string()))?
            .to_string();
        let path = self.record_path(table, &id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        self.save(&path, &record).await?;
        info!(%table, %id, "Inserted record");
        Ok(())
    }

    /// All records in `table`, sorted by id
    pub async fn list(&self, table: &str) -> Result<Vec<Fields>, StoreError> {
        let dir = self.root.join(table);
        if !fs::try_exists(&dir).await? {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            records.push(Self::load(&path).await?);
        }
        Ok(records)
    }

    /// Records matching `filter`, with their file paths
    async fn matching(&self, table: &str, filter: &Filter) -> Result<Vec<(PathBuf, Fields)>, StoreError> {
        // id lookups go straight to the file
        if filter.field == "id"
            && let Some(id) = filter.value.as_str()
        {
            // insert never accepts such a key, so no record can match it
            if !is_safe_key(table) || !is_safe_key(id) {
                debug!(%table, %id, "JsonFileStore::matching: key cannot name a record");
                return Ok(Vec::new());
            }
            let path = self.record_path(table, id)?;
            if !fs::try_exists(&path).await? {
                return Ok(Vec::new());
            }
            let record = Self::load(&path).await?;
            return Ok(if filter.matches(&record) { vec![(path, record)] } else { Vec::new() });
        }

        let mut found = Vec::new();
        for record in self.list(table).await? {
            if filter.matches(&record)
                && let Some(id) = record.get("id").and_then(Value::as_str)
            {
                found.push((self.record_path(table, id)?, record));
            }
        }
        Ok(found)
    }

    fn record_path(&self, table: &str, id: &str) -> Result<PathBuf, StoreError> {
        if !is_safe_key(table) || !is_safe_key(id) {
            return Err(StoreError::Rejected(format!("unsafe table or id: {}/{}", table, id)));
        }
        Ok(self.root.join(table).join(format!("{}.json", id)))
    }

    async fn load(path: &Path) -> Result<Fields, StoreError> {
        let content = fs::read_to_string(path).await?;
        match serde_json::from_str(&content)? {
            Value::Object(record) => Ok(record),
            _ => Err(StoreError::Rejected(format!("{} is not a JSON object", path.display()))),
        }
    }

    async fn save(&self, path: &Path, record: &Fields) -> Result<(), StoreError> {
        // one staging file per write; concurrent writers must not share it
        let tmp = path.with_extension(format!("json.{}.tmp", Uuid::now_v7()));
        fs::write(&tmp, serde_json::to_vec_pretty(record)?).await?;
        if let Err(e) = fs::rename(&tmp, path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

/// Table names and ids double as path components
fn is_safe_key(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn fetch(&self, table: &str, filter: &Filter, columns: &[&str]) -> Result<Fields, StoreError> {
        debug!(%table, %filter, ?columns, "JsonFileStore::fetch: called");
        let matches = self.matching(table, filter).await?;
        let record = single(table, filter, matches.iter().map(|(_, r)| r).collect())?;
        Ok(project(record, columns))
    }

    async fn write(&self, table: &str, filter: &Filter, fields: Fields) -> Result<(), StoreError> {
        debug!(%table, %filter, field_count = fields.len(), "JsonFileStore::write: called");
        let matches = self.matching(table, filter).await?;
        if matches.is_empty() {
            return Err(StoreError::NotFound {
                table: table.to_string(),
                filter: filter.to_string(),
            });
        }

        for (path, mut record) in matches {
            record.extend(fields.clone());
            // maintained by the store, like a database trigger
            if record.contains_key("updated_at") && !fields.contains_key("updated_at") {
                record.insert("updated_at".to_string(), Value::String(chrono::Utc::now().to_rfc3339()));
            }
            self.save(&path, &record).await?;
        }
        Ok(())
    }
}
