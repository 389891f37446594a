//! Content store abstraction.

mod file;
mod memory;
mod sanity;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sanity::{DEFAULT_API_VERSION, SanityConfig, SanityStore};

use crate::documents::{CategoryLayout, GuestEntry};
use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Number of guestbook entries returned by default.
pub const GUESTBOOK_LIMIT: usize = 50;

/// Content store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("{0}")]
    Upstream(String),
    #[error("Store error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Fields to merge into a stored document.
pub type PatchSet = Map<String, Value>;

/// A document store holding sculptures, categories, guestbook entries and
/// contact messages.
///
/// Writes are last-writer-wins; no backend offers versioning.
pub trait ContentStore: Send + Sync {
    /// Store a new document. An `_id` is assigned when the document has none.
    /// Returns the stored document.
    fn create(&self, document: Value) -> BoxFuture<'_, StoreResult<Value>>;

    /// Merge `set` into the top level of document `id`. Returns the updated document.
    fn patch(&self, id: &str, set: PatchSet) -> BoxFuture<'_, StoreResult<Value>>;

    /// Most recent guestbook entries, newest first.
    fn guest_entries(&self, limit: usize) -> BoxFuture<'_, StoreResult<Vec<GuestEntry>>>;

    /// Category and its sculptures, or `None` for an unknown slug.
    fn category_layout(&self, slug: &str) -> BoxFuture<'_, StoreResult<Option<CategoryLayout>>>;
}

/// Document type of a raw document.
pub(crate) fn doc_type(document: &Value) -> Option<&str> {
    document.get("_type").and_then(Value::as_str)
}

/// Document id of a raw document.
pub(crate) fn doc_id(document: &Value) -> Option<&str> {
    document.get("_id").and_then(Value::as_str)
}

/// Assemble a category layout from raw documents the way the category page
/// query does: sculptures reference their category by `_ref`.
pub(crate) fn layout_from_documents<'a>(
    documents: impl Iterator<Item = &'a Value> + Clone,
    slug: &str,
) -> StoreResult<Option<CategoryLayout>> {
    let category_doc = documents.clone().find(|doc| {
        doc_type(doc) == Some(crate::documents::CATEGORY_TYPE) && category_slug(doc) == Some(slug)
    });
    let Some(category_doc) = category_doc else {
        return Ok(None);
    };
    let category_id = doc_id(category_doc).unwrap_or_default().to_string();

    let mut category: crate::documents::Category =
        serde_json::from_value(without_fields(category_doc, &["slug"]))?;
    category.slug = Some(slug.to_string());

    let mut sculptures = Vec::new();
    for doc in documents {
        if doc_type(doc) != Some(crate::documents::SCULPTURE_TYPE) {
            continue;
        }
        let reference = doc
            .get("category")
            .and_then(|c| c.get("_ref"))
            .and_then(Value::as_str);
        if reference == Some(category_id.as_str()) {
            let mut raw = without_fields(doc, &["category"]);
            // Only resolved URLs are passed on; image assets need the CDN.
            if raw.get("coverImage").is_some_and(|image| !image.is_string()) {
                raw = without_fields(&raw, &["coverImage"]);
            }
            sculptures.push(serde_json::from_value(raw)?);
        }
    }

    Ok(Some(CategoryLayout {
        category,
        sculptures,
    }))
}

fn without_fields(document: &Value, fields: &[&str]) -> Value {
    let mut document = document.clone();
    if let Some(map) = document.as_object_mut() {
        for field in fields {
            map.remove(*field);
        }
    }
    document
}

/// Category slug, stored either as `{ current }` or a plain string.
fn category_slug(document: &Value) -> Option<&str> {
    match document.get("slug")? {
        Value::String(slug) => Some(slug.as_str()),
        other => other.get("current").and_then(Value::as_str),
    }
}

/// Sort entries newest first and keep at most `limit`.
pub(crate) fn latest_entries(mut entries: Vec<GuestEntry>, limit: usize) -> Vec<GuestEntry> {
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    entries.truncate(limit);
    entries
}
