// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The offline write queue and its reconciliation engine.
//!
//! [`OfflineManager`] accepts mutations at any time, persists them in
//! submission order and replays them against the remote store whenever the
//! device is online. A pass ("drain") works on a snapshot of the queue:
//!
//! 1. The live queue is moved into the snapshot, which is recorded in the
//!    in-flight slot. Only once that write succeeds is the empty live queue
//!    persisted; otherwise the snapshot stays under the pending key.
//! 2. Records run one at a time. Successes are counted; transient failures
//!    are appended back to the live queue; permanent failures are dropped.
//! 3. The unresolved rest of the snapshot is persisted after every record,
//!    so a crash mid-pass re-delivers it on the next start.
//!
//! Dropping the [`OfflineManager::sync_now`] future mid-pass puts the
//! unresolved records back at the head of the live queue.
//!
//! Records submitted while a pass runs land in the live queue and are picked
//! up by the next pass. A re-queued failure therefore ends up behind them.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{broadcast, Notify};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use tareas_core::{
    Document, IdGenerator, KeyValueStore, Mutation, MutationKind, MutationRecord, OperationId,
    QueueStore, PENDING_OPERATIONS_KEY,
};

use super::connectivity::ConnectivityMonitor;
use super::events::{DrainOutcome, DrainReport, DrainState, SyncEvent};
use super::executor::OperationExecutor;
use super::remote::{RemoteStore, WebSocketRemote};
use super::retry::{Backoff, RetryPolicy};

/// Engine settings.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Storage key of the pending queue.
    pub queue_key: String,
    /// Node id stamped into operation ids.
    pub node_id: u32,
    pub retry: RetryPolicy,
    /// Capacity of the event channel; slow subscribers lag beyond it.
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            queue_key: PENDING_OPERATIONS_KEY.to_string(),
            node_id: 0,
            retry: RetryPolicy::default(),
            event_capacity: 256,
        }
    }
}

/// Queue contents plus the pass flag, guarded together.
struct QueueState {
    queue: Vec<MutationRecord>,
    /// Unresolved part of the running pass's snapshot, oldest first.
    in_flight: Vec<MutationRecord>,
    /// Whether `in_flight` is held by the store's in-flight slot. When it is
    /// not, it is persisted ahead of `queue` under the pending key.
    in_flight_saved: bool,
    draining: bool,
}

impl QueueState {
    /// Everything that must survive a restart, in delivery order.
    fn unsaved_records(&self) -> Vec<MutationRecord> {
        if self.in_flight_saved {
            self.queue.clone()
        } else {
            self.in_flight.iter().chain(&self.queue).cloned().collect()
        }
    }
}

struct Inner<R: RemoteStore> {
    store: QueueStore<Arc<dyn KeyValueStore>>,
    executor: OperationExecutor<R>,
    ids: IdGenerator,
    connectivity: ConnectivityMonitor,
    state: Mutex<QueueState>,
    trigger: Notify,
    events: broadcast::Sender<SyncEvent>,
    retry: RetryPolicy,
}

/// Offline-first mutation queue.
///
/// Cheap to clone; clones share the same queue.
pub struct OfflineManager<R: RemoteStore = WebSocketRemote> {
    inner: Arc<Inner<R>>,
}

impl<R: RemoteStore> Clone for OfflineManager<R> {
    fn clone(&self) -> Self {
        OfflineManager {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Ends a pass. When the pass future is dropped part way, the unresolved
/// records go back to the head of the live queue.
struct DrainGuard<'a, R: RemoteStore> {
    inner: &'a Inner<R>,
}

impl<R: RemoteStore> Drop for DrainGuard<'_, R> {
    fn drop(&mut self) {
        let mut state = lock(&self.inner.state);
        state.draining = false;
        if state.in_flight.is_empty() {
            return;
        }

        tracing::warn!(
            count = state.in_flight.len(),
            "sync interrupted, restoring unresolved operations"
        );
        let mut restored = std::mem::take(&mut state.in_flight);
        restored.append(&mut state.queue);
        state.queue = restored;
        state.in_flight_saved = false;

        match self.inner.store.try_save(&state.queue) {
            Ok(()) => self.inner.store.save_in_flight(&[]),
            Err(e) => tracing::error!("failed to persist restored queue: {}", e),
        }
    }
}

fn lock(state: &Mutex<QueueState>) -> MutexGuard<'_, QueueState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

impl<R: RemoteStore + 'static> OfflineManager<R> {
    /// Opens the queue persisted in `store`.
    ///
    /// Records left in flight by an interrupted pass are restored ahead of
    /// the pending ones. `initially_online` seeds the connectivity state.
    pub fn open(
        store: impl KeyValueStore + 'static,
        remote: R,
        config: EngineConfig,
        initially_online: bool,
    ) -> Self {
        let store: Arc<dyn KeyValueStore> = Arc::new(store);
        let store = QueueStore::with_key(store, &config.queue_key);
        let queue = store.recover();

        let ids = IdGenerator::new(config.node_id);
        let dead = store.load_dead_letters();
        if let Some(last) = queue.iter().chain(dead.iter()).map(|r| r.id).max() {
            ids.observe(&last);
        }

        tracing::debug!(
            pending = queue.len(),
            online = initially_online,
            "opened offline queue"
        );

        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        OfflineManager {
            inner: Arc::new(Inner {
                store,
                executor: OperationExecutor::new(remote),
                ids,
                connectivity: ConnectivityMonitor::new(initially_online),
                state: Mutex::new(QueueState {
                    queue,
                    in_flight: Vec::new(),
                    in_flight_saved: false,
                    draining: false,
                }),
                trigger: Notify::new(),
                events,
                retry: config.retry,
            }),
        }
    }

    /// Queues a mutation and returns its id.
    ///
    /// The record is persisted before this returns. When online, a drain is
    /// requested; the mutation itself is applied asynchronously.
    pub fn submit(&self, mutation: Mutation) -> OperationId {
        let id = self.inner.ids.next_id();
        let record = mutation.into_record(id);
        tracing::debug!(op = %id, kind = %record.kind, "queued mutation");

        {
            let mut state = lock(&self.inner.state);
            state.queue.push(record);
            self.inner.store.save(&state.unsaved_records());
        }

        if self.is_online() {
            self.request_drain();
        }
        id
    }

    /// Queues a mutation given as untyped parts.
    ///
    /// Fails with [`tareas_core::Error::InvalidMutation`] when the parts do
    /// not form a valid record for `kind`.
    pub fn submit_record_parts(
        &self,
        kind: MutationKind,
        collection: impl Into<String>,
        document_id: Option<String>,
        payload: Option<Document>,
    ) -> tareas_core::Result<OperationId> {
        let mutation = Mutation::from_parts(kind, collection.into(), document_id, payload)?;
        Ok(self.submit(mutation))
    }

    /// Returns the number of queued records.
    pub fn pending_count(&self) -> usize {
        lock(&self.inner.state).queue.len()
    }

    /// Returns a copy of the queued records, oldest first.
    pub fn pending(&self) -> Vec<MutationRecord> {
        lock(&self.inner.state).queue.clone()
    }

    /// Returns true if a queued record targets `document_id`.
    pub fn has_pending_for(&self, document_id: &str) -> bool {
        lock(&self.inner.state)
            .queue
            .iter()
            .any(|r| r.targets(document_id))
    }

    /// Returns records abandoned after exhausting their retries.
    pub fn dead_letters(&self) -> Vec<MutationRecord> {
        self.inner.store.load_dead_letters()
    }

    /// Returns whether a pass is running.
    pub fn state(&self) -> DrainState {
        if lock(&self.inner.state).draining {
            DrainState::Draining
        } else {
            DrainState::Idle
        }
    }

    pub fn is_online(&self) -> bool {
        self.inner.connectivity.is_online()
    }

    /// Feeds a connectivity signal.
    ///
    /// Repeated signals are ignored. Going online requests a drain.
    pub fn set_online(&self, online: bool) {
        let Some(change) = self.inner.connectivity.observe(online) else {
            return;
        };

        tracing::info!(online = change.is_online, "connectivity changed");
        self.publish(SyncEvent::ConnectivityChanged {
            is_online: change.is_online,
        });
        if change.is_online {
            self.request_drain();
        }
    }

    /// Asks the driver loop for a pass. Requests made while one is pending
    /// are merged.
    pub fn request_drain(&self) {
        self.inner.trigger.notify_one();
    }

    /// Subscribes to engine events.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.inner.events.subscribe()
    }

    /// Runs a drain pass now.
    pub async fn sync_now(&self) -> DrainOutcome {
        let count = {
            let mut state = lock(&self.inner.state);
            if state.draining {
                return DrainOutcome::Coalesced;
            }
            if !self.is_online() {
                return DrainOutcome::Offline;
            }
            if state.queue.is_empty() {
                return DrainOutcome::Empty;
            }

            state.draining = true;
            state.in_flight = std::mem::take(&mut state.queue);
            state.in_flight_saved = match self.inner.store.try_save_in_flight(&state.in_flight) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("keeping sync snapshot in the pending queue: {}", e);
                    false
                }
            };
            self.inner.store.save(&state.unsaved_records());
            state.in_flight.len()
        };
        let guard = DrainGuard { inner: &self.inner };

        tracing::info!(count, "syncing queued operations");
        let mut report = DrainReport::default();

        loop {
            let next = lock(&self.inner.state).in_flight.first().cloned();
            let Some(record) = next else {
                break;
            };

            let result = self.inner.executor.execute(&record).await;
            let requeue = match result {
                Ok(()) => {
                    report.succeeded += 1;
                    None
                }
                Err(e) if e.is_retryable() => {
                    report.failed += 1;
                    let mut record = record;
                    record.attempts = record.attempts.saturating_add(1);

                    if self.inner.retry.is_exhausted(record.attempts) {
                        tracing::error!(
                            op = %record.id,
                            attempts = record.attempts,
                            "giving up on operation: {}",
                            e
                        );
                        self.inner.store.push_dead_letter(&record);
                        self.publish(SyncEvent::OperationDropped {
                            id: record.id,
                            reason: format!("gave up after {} attempts: {e}", record.attempts),
                        });
                        None
                    } else {
                        tracing::warn!(op = %record.id, "operation failed, will retry: {}", e);
                        report.requeued += 1;
                        Some(record)
                    }
                }
                Err(e) => {
                    tracing::error!(op = %record.id, "dropping operation: {}", e);
                    report.failed += 1;
                    self.publish(SyncEvent::OperationDropped {
                        id: record.id,
                        reason: e.to_string(),
                    });
                    None
                }
            };

            let mut state = lock(&self.inner.state);
            state.in_flight.remove(0);
            self.resolve(&mut state, requeue);
        }

        drop(guard);

        tracing::info!(
            succeeded = report.succeeded,
            failed = report.failed,
            "sync finished"
        );
        self.publish(SyncEvent::DrainCompleted {
            succeeded: report.succeeded,
            failed: report.failed,
        });
        DrainOutcome::Completed(report)
    }

    /// Persists the queue after the head of the snapshot resolved.
    ///
    /// A re-queued record is written to the pending key before it leaves the
    /// in-flight slot; a crash in between delivers it twice, never zero times.
    fn resolve(&self, state: &mut QueueState, requeue: Option<MutationRecord>) {
        if let Some(record) = requeue {
            state.queue.push(record);
            self.inner.store.save(&state.unsaved_records());
        }

        if state.in_flight_saved {
            if let Err(e) = self.inner.store.try_save_in_flight(&state.in_flight) {
                tracing::warn!("keeping sync snapshot in the pending queue: {}", e);
                state.in_flight_saved = false;
            }
        }
        if !state.in_flight_saved {
            self.inner.store.save(&state.unsaved_records());
            if state.in_flight.is_empty() {
                self.inner.store.save_in_flight(&[]);
            }
        }
    }

    /// Drives passes until `cancel` fires.
    ///
    /// A pass runs whenever one is requested. After a pass that re-queued
    /// records, another is scheduled with exponential backoff if the retry
    /// policy allows it. Cancellation is observed between passes.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut backoff = Backoff::new(&self.inner.retry);
        let mut retry_at: Option<Instant> = None;

        if self.is_online() && self.pending_count() > 0 {
            self.request_drain();
        }

        loop {
            let deadline = retry_at;
            let retry_timer = async move {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = self.inner.trigger.notified() => {}
                _ = retry_timer => {}
            }
            retry_at = None;

            match self.sync_now().await {
                DrainOutcome::Completed(report) if report.requeued > 0 => {
                    if self.inner.retry.auto_retry {
                        let delay = backoff.next_delay();
                        tracing::debug!(?delay, "scheduling retry");
                        retry_at = Some(Instant::now() + delay);
                    }
                }
                DrainOutcome::Completed(_) | DrainOutcome::Empty => backoff.reset(),
                DrainOutcome::Offline | DrainOutcome::Coalesced => {}
            }
        }

        tracing::debug!("sync driver stopped");
    }

    fn publish(&self, event: SyncEvent) {
        // No subscribers is fine.
        let _ = self.inner.events.send(event);
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
