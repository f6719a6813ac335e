// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for tareas-core operations.

use thiserror::Error;

/// All possible errors that can occur in tareas-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid storage key: '{0}'\n  hint: keys may only contain letters, digits, '.', '_' and '-'")]
    InvalidKey(String),

    #[error("storage quota exceeded: writing {requested} bytes would exceed the {quota} byte limit")]
    QuotaExceeded { requested: usize, quota: usize },

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("invalid operation id: {0}")]
    InvalidOperationId(String),

    #[error("invalid mutation: {0}")]
    InvalidMutation(String),

    #[error("draft expired: saved {age_hours}h ago")]
    DraftExpired { age_hours: i64 },
}

/// A specialized Result type for tareas-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
