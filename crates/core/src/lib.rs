// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tareas-core: shared library for the tareas task list
//!
//! This crate provides the mutation model, operation ids, key-value
//! persistence, the offline queue store, form drafts and the wire protocol
//! used by both the tareas CLI and the tareas-remote document store.

pub mod draft;
pub mod error;
pub mod id;
pub mod kv;
pub mod mutation;
pub mod protocol;
pub mod queue_store;

pub use draft::{Draft, DraftStore};
pub use error::{Error, Result};
pub use id::{ClockSource, IdGenerator, OperationId, SystemClock};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use mutation::{Document, Mutation, MutationKind, MutationRecord};
pub use protocol::{ClientMessage, ServerMessage};
pub use queue_store::{QueueStore, PENDING_OPERATIONS_KEY};
