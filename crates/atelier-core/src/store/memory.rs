//! In-memory store implementation.

use super::{
    BoxFuture, ContentStore, PatchSet, StoreError, StoreResult, doc_id, doc_type,
    latest_entries, layout_from_documents,
};
use crate::documents::{CategoryLayout, GUEST_ENTRY_TYPE, GuestEntry};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-memory store for tests and ephemeral use.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with documents. Documents without an `_id` are skipped.
    pub fn with_documents(documents: impl IntoIterator<Item = Value>) -> Self {
        let documents = documents
            .into_iter()
            .filter_map(|doc| Some((doc_id(&doc)?.to_string(), doc)))
            .collect();
        Self {
            documents: RwLock::new(documents),
        }
    }

    /// Snapshot of a single document.
    pub fn get(&self, id: &str) -> Option<Value> {
        self.documents.read().ok()?.get(id).cloned()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.read().map(|docs| docs.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All documents of one type.
    pub fn documents_of_type(&self, kind: &str) -> Vec<Value> {
        self.documents
            .read()
            .map(|docs| {
                docs.values()
                    .filter(|doc| doc_type(doc) == Some(kind))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::Other(format!("Lock error: {}", e))
}

impl ContentStore for MemoryStore {
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

            let mut docs = self.documents.write().map_err(lock_error)?;
            if docs.contains_key(&id) {
                return Err(StoreError::Other(format!("Document by ID \"{}\" already exists", id)));
            }
            docs.insert(id, document.clone());
            Ok(document)
        })
    }

    fn patch(&self, id: &str, set: PatchSet) -> BoxFuture<'_, StoreResult<Value>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut docs = self.documents.write().map_err(lock_error)?;
            let document = docs
                .get_mut(&id)
                .and_then(Value::as_object_mut)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            for (key, value) in set {
                document.insert(key, value);
            }
            Ok(Value::Object(document.clone()))
        })
    }

    fn guest_entries(&self, limit: usize) -> BoxFuture<'_, StoreResult<Vec<GuestEntry>>> {
        Box::pin(async move {
            let docs = self.documents.read().map_err(lock_error)?;
            let entries = docs
                .values()
                .filter(|doc| doc_type(doc) == Some(GUEST_ENTRY_TYPE))
                .map(|doc| serde_json::from_value(doc.clone()))
                .collect::<Result<Vec<GuestEntry>, _>>()?;
            Ok(latest_entries(entries, limit))
        })
    }

    fn category_layout(&self, slug: &str) -> BoxFuture<'_, StoreResult<Option<CategoryLayout>>> {
        let slug = slug.to_string();
        Box::pin(async move {
            let docs = self.documents.read().map_err(lock_error)?;
            layout_from_documents(docs.values(), &slug)
        })
    }
}
