//! File-based store: one JSON file per document.

use super::{
    BoxFuture, ContentStore, PatchSet, StoreError, StoreResult, doc_id, doc_type,
    latest_entries, layout_from_documents,
};
use crate::documents::{CategoryLayout, GUEST_ENTRY_TYPE, GuestEntry};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// File-based store for self-hosted installs.
///
/// Stores each document as `<id>.json` in a directory.
pub struct FileStore {
    /// Base directory for document storage.
    base_path: PathBuf,
}

impl FileStore {
    /// Create a new file store with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> StoreResult<Self> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StoreError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Get the file path for a document ID.
    fn document_path(&self, id: &str) -> PathBuf {
        // Sanitize ID to be safe for filenames
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn read_document(path: &Path) -> StoreResult<Value> {
        let json = fs::read_to_string(path).map_err(|e| {
            StoreError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&json).map_err(|e| {
            StoreError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    fn write_document(path: &Path, document: &Value) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(document)?;
        fs::write(path, json).map_err(|e| {
            StoreError::Io(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    /// Load every document in the directory.
    fn read_all(&self) -> StoreResult<Vec<Value>> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }
        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StoreError::Io(format!("Failed to read directory: {}", e)))?;

        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();
        paths.iter().map(|path| Self::read_document(path)).collect()
    }
}

impl ContentStore for FileStore {
    fn create(&self, document: Value) -> BoxFuture<'_, StoreResult<Value>> {
        Box::pin(async move {
            let mut document = document;
            let id = match doc_id(&document) {
                Some(id) => id.to_string(),
                None => {
                    let id = uuid::Uuid::new_v4().to_string();
                    let map = document.as_object_mut().ok_or_else(|| {
                        StoreError::Serialization("document must be an object".to_string())
                    })?;
                    map.insert("_id".into(), Value::String(id.clone()));
                    id
                }
            };

            let path = self.document_path(&id);
            if path.exists() {
                return Err(StoreError::Other(format!("Document by ID \"{}\" already exists", id)));
            }
            Self::write_document(&path, &document)?;
            Ok(document)
        })
    }

    fn patch(&self, id: &str, set: PatchSet) -> BoxFuture<'_, StoreResult<Value>> {
        let path = self.document_path(id);
        let id = id.to_string();
        Box::pin(async move {
            if !path.exists() {
                return Err(StoreError::NotFound(id));
            }
            let mut document = Self::read_document(&path)?;
            // Distinct ids can share a sanitized file name.
            if doc_id(&document) != Some(id.as_str()) {
                return Err(StoreError::NotFound(id));
            }
            let map = document
                .as_object_mut()
                .ok_or_else(|| StoreError::Serialization(format!("{} is not an object", id)))?;
            for (key, value) in set {
                map.insert(key, value);
            }
            Self::write_document(&path, &document)?;
            Ok(document)
        })
    }

    fn guest_entries(&self, limit: usize) -> BoxFuture<'_, StoreResult<Vec<GuestEntry>>> {
        Box::pin(async move {
            let entries = self
                .read_all()?
                .into_iter()
                .filter(|doc| doc_type(doc) == Some(GUEST_ENTRY_TYPE))
                .map(serde_json::from_value)
                .collect::<Result<Vec<GuestEntry>, _>>()?;
            Ok(latest_entries(entries, limit))
        })
    }

    fn category_layout(&self, slug: &str) -> BoxFuture<'_, StoreResult<Option<CategoryLayout>>> {
        let slug = slug.to_string();
        Box::pin(async move {
            let documents = self.read_all()?;
            layout_from_documents(documents.iter(), &slug)
        })
    }
}
