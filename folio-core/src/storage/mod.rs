//! Record store abstraction
//!
//! The core never owns a database handle. Everything that persists book
//! records (and the reading position inside them) goes through an injected
//! [`RecordStore`], keyed by book identifier.

use crate::error::StorageError;
use crate::types::{BookId, BookRecord, ReadingPosition};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Key-indexed store of book records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch a record, `None` if it does not exist
    async fn get(&self, id: BookId) -> StorageResult<Option<BookRecord>>;

    /// Insert or replace a record
    async fn put(&self, record: BookRecord) -> StorageResult<()>;

    /// Remove a record
    async fn delete(&self, id: BookId) -> StorageResult<()>;

    /// All records, ordered by title
    async fn list(&self) -> StorageResult<Vec<BookRecord>>;

    /// Replace only the reading position of a stored record
    async fn save_position(&self, id: BookId, position: ReadingPosition) -> StorageResult<()> {
        let mut record = self
            .get(id)
            .await?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        record.position = position;
        self.put(record).await
    }
}

fn sorted_by_title(mut records: Vec<BookRecord>) -> Vec<BookRecord> {
    records.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
    records
}

fn poisoned<T>(_: PoisonError<T>) -> StorageError {
    StorageError::BackendError("record store lock poisoned".to_string())
}

/// In-memory record store (for testing and short-lived sessions)
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<BookId, BookRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, id: BookId) -> StorageResult<Option<BookRecord>> {
        Ok(self.records.read().map_err(poisoned)?.get(&id).cloned())
    }

    async fn put(&self, record: BookRecord) -> StorageResult<()> {
        self.records
            .write()
            .map_err(poisoned)?
            .insert(record.id, record);
        Ok(())
    }

    async fn delete(&self, id: BookId) -> StorageResult<()> {
        self.records
            .write()
            .map_err(poisoned)?
            .remove(&id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<BookRecord>> {
        let records = self
            .records
            .read()
            .map_err(poisoned)?
            .values()
            .cloned()
            .collect();
        Ok(sorted_by_title(records))
    }
}

/// Serialized form of the library file
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Library {
    pub books: BTreeMap<BookId, BookRecord>,
}

impl Library {
    /// Load a library from a JSON file; a missing file is an empty library
    pub async fn load(path: &Path) -> StorageResult<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    /// Save the library atomically
    /// Writes to a temp file then renames to avoid partial writes
    pub async fn save(&self, path: &Path) -> StorageResult<()> {
        let data = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StorageError::BackendError(e.to_string()))?;
            }
        }

        // Same directory keeps the rename on one filesystem
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &data)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;
        tokio::fs::rename(&temp_path, path)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))
    }
}

/// Record store backed by a single JSON file
///
/// The whole library is held in memory and rewritten on every change.
pub struct JsonFileStore {
    path: PathBuf,
    library: tokio::sync::RwLock<Library>,
}

impl JsonFileStore {
    /// Open (or start) the library file at `path`
    pub async fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let library = Library::load(&path).await?;
        tracing::debug!("Opened library {:?} with {} books", path, library.books.len());
        Ok(Self {
            path,
            library: tokio::sync::RwLock::new(library),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn get(&self, id: BookId) -> StorageResult<Option<BookRecord>> {
        Ok(self.library.read().await.books.get(&id).cloned())
    }

    async fn put(&self, record: BookRecord) -> StorageResult<()> {
        let mut library = self.library.write().await;
        let previous = library.books.insert(record.id, record.clone());
        if let Err(e) = library.save(&self.path).await {
            // Keep memory in line with what is on disk
            match previous {
                Some(previous) => library.books.insert(record.id, previous),
                None => library.books.remove(&record.id),
            };
            return Err(e);
        }
        Ok(())
    }

    async fn delete(&self, id: BookId) -> StorageResult<()> {
        let mut library = self.library.write().await;
        let removed = library
            .books
            .remove(&id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        if let Err(e) = library.save(&self.path).await {
            library.books.insert(id, removed);
            return Err(e);
        }
        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<BookRecord>> {
        let records = self.library.read().await.books.values().cloned().collect();
        Ok(sorted_by_title(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new();
        let record = BookRecord::new("Dune");
        let id = record.id;

        // Put / get
        store.put(record.clone()).await.unwrap();
        assert_eq!(store.get(id).await.unwrap(), Some(record));

        // Save position
        let position = ReadingPosition::new(7, 120, 44);
        store.save_position(id, position).await.unwrap();
        assert_eq!(store.get(id).await.unwrap().unwrap().position, position);

        // Delete
        store.delete(id).await.unwrap();
        assert!(store.get(id).await.unwrap().is_none());
        assert!(matches!(
            store.delete(id).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_save_position_missing_record() {
        let store = MemoryStore::new();
        let result = store
            .save_position(uuid::Uuid::new_v4(), ReadingPosition::START)
            .await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_sorted_by_title() {
        let store = MemoryStore::new();
        for title in ["Ulysses", "Beloved", "Middlemarch"] {
            store.put(BookRecord::new(title)).await.unwrap();
        }

        let titles: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["Beloved", "Middlemarch", "Ulysses"]);
    }

    #[tokio::test]
    async fn test_json_store_persists_across_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");

        let record = BookRecord::new("Solaris");
        let id = record.id;
        {
            let store = JsonFileStore::open(&path).await.unwrap();
            assert!(store.list().await.unwrap().is_empty());
            store.put(record).await.unwrap();
            store
                .save_position(id, ReadingPosition::new(2, 15, 50))
                .await
                .unwrap();
        }

        let reopened = JsonFileStore::open(&path).await.unwrap();
        let loaded = reopened.get(id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "Solaris");
        assert_eq!(loaded.position, ReadingPosition::new(2, 15, 50));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_json_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        std::fs::write(&path, "{ broken").unwrap();

        assert!(matches!(
            JsonFileStore::open(&path).await,
            Err(StorageError::Serialization(_))
        ));
    }
}
