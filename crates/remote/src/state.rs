// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server state management.
//!
//! Documents are kept per collection, one JSON object per collection file
//! mapping document id to fields. Every change is written through to disk
//! before it is acknowledged.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use tareas_core::id::node_id_from_seed;
use tareas_core::{Document, FileStore, IdGenerator, KeyValueStore};

/// Documents of one collection, keyed by id.
pub type Collection = BTreeMap<String, Document>;

/// Errors returned to clients as rejections.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error(transparent)]
    Core(#[from] tareas_core::Error),
}

/// Shared server state containing the canonical documents.
#[derive(Clone)]
pub struct ServerState {
    inner: Arc<ServerStateInner>,
}

struct ServerStateInner {
    /// Backing files; the lock serializes read-modify-write cycles.
    store: Mutex<FileStore>,
    /// Generates ids for documents created without one.
    ids: IdGenerator,
}

impl ServerState {
    /// Creates server state storing documents under `data_dir`.
    pub fn new(data_dir: &Path) -> tareas_core::Result<Self> {
        let store = FileStore::open(data_dir.join("documents"))?;
        let ids = IdGenerator::new(node_id_from_seed(data_dir));

        Ok(ServerState {
            inner: Arc::new(ServerStateInner {
                store: Mutex::new(store),
                ids,
            }),
        })
    }

    /// Inserts a document, assigning an id when none is given.
    ///
    /// An existing document at the given id is replaced. Returns the id.
    pub async fn create(
        &self,
        collection: &str,
        id: Option<String>,
        data: Document,
    ) -> Result<String, StoreError> {
        let store = self.inner.store.lock().await;
        let mut docs = load_collection(&store, collection)?;

        let id = id.unwrap_or_else(|| self.inner.ids.next_id().to_string());
        docs.insert(id.clone(), data);
        save_collection(&store, collection, &docs)?;
        Ok(id)
    }

    /// Merges fields into an existing document.
    pub async fn update(
        &self,
        collection: &str,
        id: &str,
        data: Document,
    ) -> Result<(), StoreError> {
        let store = self.inner.store.lock().await;
        let mut docs = load_collection(&store, collection)?;

        let doc = docs.get_mut(id).ok_or_else(|| StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        })?;
        doc.extend(data);

        save_collection(&store, collection, &docs)?;
        Ok(())
    }

    /// Removes a document. Removing a missing document succeeds.
    pub async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let store = self.inner.store.lock().await;
        let mut docs = load_collection(&store, collection)?;

        if docs.remove(id).is_some() {
            save_collection(&store, collection, &docs)?;
        }
        Ok(())
    }

    /// Returns a document, if present.
    #[cfg(test)]
    pub async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let store = self.inner.store.lock().await;
        let mut docs = load_collection(&store, collection)?;
        Ok(docs.remove(id))
    }
}

fn load_collection(store: &FileStore, collection: &str) -> tareas_core::Result<Collection> {
    match store.get(collection)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Collection::new()),
    }
}

fn save_collection(
    store: &FileStore,
    collection: &str,
    docs: &Collection,
) -> tareas_core::Result<()> {
    let json = serde_json::to_string(docs)?;
    store.set(collection, &json)
}
