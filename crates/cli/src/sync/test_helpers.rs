// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use serde_json::json;
use tokio::sync::Semaphore;

use tareas_core::{Document, Mutation, MutationRecord, OperationId};

use super::remote::{RemoteError, RemoteFuture, RemoteStore};

/// Builds a document from a JSON object literal.
pub fn doc(value: serde_json::Value) -> Document {
    value.as_object().cloned().unwrap()
}

/// Builds a task document with the given name.
pub fn task(nombre: &str) -> Document {
    doc(json!({"nombre": nombre, "fecha": "2026-03-05", "descripcion": "", "urlImagenes": []}))
}

/// Creates a Create record with the given wall clock timestamp.
pub fn make_record(wall_ms: u64) -> MutationRecord {
    Mutation::create("tasks", task(&format!("Tarea {wall_ms}")))
        .into_record(OperationId::new(wall_ms, 0, 1))
}

/// A call observed by [`MockRemote`].
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    Create {
        collection: String,
        id: Option<String>,
        data: Document,
    },
    Update {
        collection: String,
        id: String,
        data: Document,
    },
    Delete {
        collection: String,
        id: String,
    },
}

#[derive(Default)]
struct MockState {
    calls: Vec<RemoteCall>,
    /// Call indexes (0-based, over all calls) that fail.
    failing_calls: HashSet<usize>,
    /// Every call fails while set.
    offline: bool,
    /// Number of upcoming calls that fail.
    fail_next: usize,
    documents: BTreeMap<(String, String), Document>,
    next_id: u64,
    gate: Option<Arc<Semaphore>>,
}

/// In-memory [`RemoteStore`] that records calls and injects failures.
#[derive(Clone, Default)]
pub struct MockRemote {
    state: Arc<Mutex<MockState>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the `index`-th call (0-based) fail.
    pub fn fail_call(&self, index: usize) {
        self.state.lock().unwrap().failing_calls.insert(index);
    }

    /// Makes the next `count` calls fail.
    pub fn fail_next(&self, count: usize) {
        self.state.lock().unwrap().fail_next = count;
    }

    /// Makes every call fail until cleared.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().unwrap().offline = unreachable;
    }

    /// Blocks every call until [`MockRemote::release`] is called.
    pub fn hold(&self) {
        self.state.lock().unwrap().gate = Some(Arc::new(Semaphore::new(0)));
    }

    /// Lets held calls proceed.
    pub fn release(&self) {
        if let Some(gate) = self.state.lock().unwrap().gate.take() {
            gate.add_permits(Semaphore::MAX_PERMITS / 2);
        }
    }

    /// Returns every call made so far.
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Returns a stored document.
    pub fn document(&self, collection: &str, id: &str) -> Option<Document> {
        self.state
            .lock()
            .unwrap()
            .documents
            .get(&(collection.to_string(), id.to_string()))
            .cloned()
    }

    /// Returns every stored document of a collection.
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.state
            .lock()
            .unwrap()
            .documents
            .iter()
            .filter(|((c, _), _)| c == collection)
            .map(|(_, d)| d.clone())
            .collect()
    }

    async fn wait_gate(&self) {
        let gate = self.state.lock().unwrap().gate.clone();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await;
        }
    }

    /// Records a call and decides whether it fails.
    fn record(&self, call: RemoteCall) -> Result<(), RemoteError> {
        let mut state = self.state.lock().unwrap();
        let index = state.calls.len();
        state.calls.push(call);

        if state.offline {
            return Err(RemoteError::Transport("network unreachable".into()));
        }
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(RemoteError::Transport("connection reset".into()));
        }
        if state.failing_calls.contains(&index) {
            return Err(RemoteError::Timeout(std::time::Duration::from_secs(1)));
        }
        Ok(())
    }
}

impl RemoteStore for MockRemote {
    fn create<'a>(
        &'a self,
        collection: &'a str,
        id: Option<&'a str>,
        data: &'a Document,
    ) -> RemoteFuture<'a, String> {
        Box::pin(async move {
            self.wait_gate().await;
            self.record(RemoteCall::Create {
                collection: collection.to_string(),
                id: id.map(String::from),
                data: data.clone(),
            })?;

            let mut state = self.state.lock().unwrap();
            let id = match id {
                Some(id) => id.to_string(),
                None => {
                    state.next_id += 1;
                    format!("auto-{}", state.next_id)
                }
            };
            state
                .documents
                .insert((collection.to_string(), id.clone()), data.clone());
            Ok(id)
        })
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        data: &'a Document,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.wait_gate().await;
            self.record(RemoteCall::Update {
                collection: collection.to_string(),
                id: id.to_string(),
                data: data.clone(),
            })?;

            let mut state = self.state.lock().unwrap();
            let key = (collection.to_string(), id.to_string());
            match state.documents.get_mut(&key) {
                Some(existing) => {
                    existing.extend(data.clone());
                    Ok(())
                }
                None => Err(RemoteError::Rejected(format!(
                    "document not found: {collection}/{id}"
                ))),
            }
        })
    }

    fn delete<'a>(&'a self, collection: &'a str, id: &'a str) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.wait_gate().await;
            self.record(RemoteCall::Delete {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

            self.state
                .lock()
                .unwrap()
                .documents
                .remove(&(collection.to_string(), id.to_string()));
            Ok(())
        })
    }
}
