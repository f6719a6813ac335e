// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline write queue and remote synchronization.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ OfflineManager │────►│   Executor   │────►│ RemoteStore  │
//! │   (engine)     │◄────│              │◄────│   (trait)    │
//! └────────────────┘     └──────────────┘     └──────────────┘
//!        │     ▲
//!        ▼     │ set_online
//! ┌────────────────┐     ┌──────────────┐
//! │   QueueStore   │     │ Connectivity │
//! │ (key-value)    │     │   watcher    │
//! └────────────────┘     └──────────────┘
//! ```
//!
//! # Features
//!
//! - Mutations persisted before `submit` returns
//! - Ordered replay on reconnect, one record at a time
//! - At-least-once delivery across crashes via the in-flight slot
//! - Exponential backoff between failed passes, optional dead letters
//! - Injectable remote and reachability probe for testing

mod connectivity;
mod engine;
mod events;
mod executor;
mod remote;
mod retry;

pub use connectivity::{
    watch_connectivity, ConnectivityChanged, ConnectivityMonitor, ReachabilityProbe, RemoteProbe,
};
pub use engine::{EngineConfig, OfflineManager};
pub use events::{DrainOutcome, DrainReport, DrainState, SyncEvent};
pub use executor::{ExecutionError, OperationExecutor};
pub use remote::{RemoteError, RemoteFuture, RemoteResult, RemoteStore, WebSocketRemote};
pub use retry::{Backoff, RetryPolicy};

#[cfg(test)]
pub(crate) mod test_helpers;
