// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Maps queued records onto remote store calls.

use tareas_core::{MutationKind, MutationRecord};

use super::remote::{RemoteError, RemoteStore};

/// Why a record could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    /// The remote call failed; the record may succeed later.
    #[error(transparent)]
    Transient(#[from] RemoteError),

    /// The record's kind is not understood by this build.
    #[error("unsupported operation type '{0}'")]
    UnsupportedOperation(String),

    /// The record is missing a field its kind requires.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

impl ExecutionError {
    /// Returns true if retrying the record could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExecutionError::Transient(_))
    }
}

/// Executes one record against a [`RemoteStore`].
pub struct OperationExecutor<R: RemoteStore> {
    remote: R,
}

impl<R: RemoteStore> OperationExecutor<R> {
    pub fn new(remote: R) -> Self {
        OperationExecutor { remote }
    }

    /// Returns the remote store.
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Applies `record` with exactly one remote call.
    ///
    /// Unsupported or malformed records fail without contacting the remote.
    pub async fn execute(&self, record: &MutationRecord) -> Result<(), ExecutionError> {
        if let MutationKind::Unsupported(kind) = &record.kind {
            return Err(ExecutionError::UnsupportedOperation(kind.clone()));
        }
        record
            .validate()
            .map_err(|e| ExecutionError::InvalidRecord(e.to_string()))?;

        let collection = record.collection.as_str();
        let document_id = record.document_id.as_deref();

        match (&record.kind, document_id, record.payload.as_ref()) {
            (MutationKind::Create, id, Some(payload)) => {
                let assigned = self.remote.create(collection, id, payload).await?;
                tracing::debug!(op = %record.id, doc = %assigned, "created document");
            }
            (MutationKind::Update, Some(id), Some(payload)) => {
                self.remote.update(collection, id, payload).await?;
                tracing::debug!(op = %record.id, doc = %id, "updated document");
            }
            (MutationKind::Delete, Some(id), _) => {
                self.remote.delete(collection, id).await?;
                tracing::debug!(op = %record.id, doc = %id, "deleted document");
            }
            _ => {
                return Err(ExecutionError::InvalidRecord(format!(
                    "{} record {} is incomplete",
                    record.kind, record.id
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
