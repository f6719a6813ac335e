// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Notifications published by the sync engine.

use std::fmt;

use serde::Serialize;

use tareas_core::OperationId;

/// An observable change in the sync engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SyncEvent {
    /// Connectivity flipped.
    ConnectivityChanged { is_online: bool },
    /// A drain pass finished.
    DrainCompleted { succeeded: usize, failed: usize },
    /// A record was removed from the queue without being applied.
    OperationDropped { id: OperationId, reason: String },
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncEvent::ConnectivityChanged { is_online: true } => write!(f, "online"),
            SyncEvent::ConnectivityChanged { is_online: false } => write!(f, "offline"),
            SyncEvent::DrainCompleted { succeeded, failed } => {
                write!(f, "sync finished: {succeeded} succeeded, {failed} failed")
            }
            SyncEvent::OperationDropped { id, reason } => {
                write!(f, "dropped operation {id}: {reason}")
            }
        }
    }
}

/// Whether a drain pass is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainState {
    Idle,
    Draining,
}

/// Tally of one drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    pub succeeded: usize,
    pub failed: usize,
    /// Failed records put back in the queue for a later pass.
    pub requeued: usize,
}

/// Result of asking for a drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Another pass was already running.
    Coalesced,
    /// Offline; nothing was attempted.
    Offline,
    /// The queue was empty.
    Empty,
    /// A pass ran over a non-empty snapshot.
    Completed(DrainReport),
}
