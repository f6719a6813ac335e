// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Persistent storage for the offline mutation queue.
//!
//! The queue is stored as a JSON array under a fixed key. Two sibling slots
//! hold drain bookkeeping:
//!
//! - `<key>.in_flight`: the part of a drain snapshot not yet resolved. It is
//!   folded back into the queue on the next [`QueueStore::recover`], so a
//!   crash mid-drain re-delivers instead of losing records.
//! - `<key>.dead_letter`: records abandoned after exhausting their retries.
//!
//! Loading never fails: missing data is an empty queue and unreadable data is
//! logged and treated as empty. Saving never fails either; errors are logged
//! and the caller's in-memory queue is left untouched.

use crate::error::{Error, Result};
use crate::kv::KeyValueStore;
use crate::mutation::MutationRecord;

/// Default key of the pending queue.
pub const PENDING_OPERATIONS_KEY: &str = "pending_operations";

const IN_FLIGHT_SUFFIX: &str = ".in_flight";
const DEAD_LETTER_SUFFIX: &str = ".dead_letter";

/// Queue persistence on top of any [`KeyValueStore`].
pub struct QueueStore<S: KeyValueStore> {
    store: S,
    key: String,
    in_flight_key: String,
    dead_letter_key: String,
}

impl<S: KeyValueStore> QueueStore<S> {
    /// Creates a queue store using [`PENDING_OPERATIONS_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, PENDING_OPERATIONS_KEY)
    }

    /// Creates a queue store under a custom key.
    pub fn with_key(store: S, key: &str) -> Self {
        QueueStore {
            store,
            key: key.to_string(),
            in_flight_key: format!("{key}{IN_FLIGHT_SUFFIX}"),
            dead_letter_key: format!("{key}{DEAD_LETTER_SUFFIX}"),
        }
    }

    /// Returns the key of the pending queue.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the pending queue; absent or corrupt data yields an empty queue.
    pub fn load(&self) -> Vec<MutationRecord> {
        self.load_slot(&self.key)
    }

    /// Loads the pending queue, surfacing storage and parse errors.
    pub fn try_load(&self) -> Result<Vec<MutationRecord>> {
        self.try_load_slot(&self.key)
    }

    /// Overwrites the pending queue; failures are logged, not returned.
    pub fn save(&self, queue: &[MutationRecord]) {
        if let Err(e) = self.try_save(queue) {
            tracing::error!(key = %self.key, len = queue.len(), "failed to persist queue: {}", e);
        }
    }

    /// Overwrites the pending queue, surfacing failures.
    pub fn try_save(&self, queue: &[MutationRecord]) -> Result<()> {
        self.try_save_slot(&self.key, queue)
    }

    /// Loads the unresolved remainder of an interrupted drain.
    pub fn load_in_flight(&self) -> Vec<MutationRecord> {
        self.load_slot(&self.in_flight_key)
    }

    /// Records the unresolved remainder of the current drain.
    ///
    /// An empty remainder clears the slot.
    pub fn save_in_flight(&self, remaining: &[MutationRecord]) {
        if let Err(e) = self.try_save_in_flight(remaining) {
            tracing::error!(key = %self.in_flight_key, "failed to persist in-flight records: {}", e);
        }
    }

    /// Records the unresolved remainder of the current drain, surfacing
    /// failures.
    pub fn try_save_in_flight(&self, remaining: &[MutationRecord]) -> Result<()> {
        if remaining.is_empty() {
            self.store.remove(&self.in_flight_key)
        } else {
            self.try_save_slot(&self.in_flight_key, remaining)
        }
    }

    /// Restores the queue after a restart.
    ///
    /// In-flight records from an interrupted drain are placed ahead of the
    /// pending ones (they were submitted earlier), the merged queue is saved
    /// and the in-flight slot cleared.
    pub fn recover(&self) -> Vec<MutationRecord> {
        let in_flight = self.load_in_flight();
        let pending = self.load();
        if in_flight.is_empty() {
            return pending;
        }

        tracing::warn!(
            count = in_flight.len(),
            "restoring operations from an interrupted sync"
        );

        let queue = merge_in_flight(in_flight, pending);
        self.save(&queue);
        self.save_in_flight(&[]);
        queue
    }

    /// Returns the queue as [`QueueStore::recover`] would restore it, without
    /// writing anything.
    pub fn snapshot(&self) -> Vec<MutationRecord> {
        merge_in_flight(self.load_in_flight(), self.load())
    }

    /// Loads abandoned records.
    pub fn load_dead_letters(&self) -> Vec<MutationRecord> {
        self.load_slot(&self.dead_letter_key)
    }

    /// Appends an abandoned record to the dead-letter slot.
    pub fn push_dead_letter(&self, record: &MutationRecord) {
        let mut dead = self.load_dead_letters();
        dead.push(record.clone());
        if let Err(e) = self.try_save_slot(&self.dead_letter_key, &dead) {
            tracing::error!(id = %record.id, "failed to persist dead letter: {}", e);
        }
    }

    /// Empties the dead-letter slot.
    pub fn clear_dead_letters(&self) -> Result<()> {
        self.store.remove(&self.dead_letter_key)
    }

    fn load_slot(&self, key: &str) -> Vec<MutationRecord> {
        match self.try_load_slot(key) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(key, "discarding unreadable queue data: {}", e);
                Vec::new()
            }
        }
    }

    fn try_load_slot(&self, key: &str) -> Result<Vec<MutationRecord>> {
        let Some(json) = self.store.get(key)? else {
            return Ok(Vec::new());
        };
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<MutationRecord> = serde_json::from_str(&json)
            .map_err(|e| Error::CorruptedData(format!("{key}: {e}")))?;
        Ok(records)
    }

    fn try_save_slot(&self, key: &str, records: &[MutationRecord]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.store.set(key, &json)
    }
}

fn merge_in_flight(
    in_flight: Vec<MutationRecord>,
    pending: Vec<MutationRecord>,
) -> Vec<MutationRecord> {
    let mut queue = in_flight;
    for record in pending {
        if !queue.iter().any(|r| r.id == record.id) {
            queue.push(record);
        }
    }
    queue
}

#[cfg(test)]
#[path = "queue_store_tests.rs"]
mod tests;
