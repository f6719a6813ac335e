// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::assets::AssetError;

/// All possible errors that can occur in the tareas CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'tareas init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("{field} cannot be empty")]
    FieldEmpty { field: &'static str },

    #[error("{field} is required")]
    FieldRequired { field: &'static str },

    #[error("{field} too long ({actual} chars, max {max})")]
    FieldTooLong {
        field: &'static str,
        actual: usize,
        max: usize,
    },

    #[error("invalid date '{value}'\n  hint: use YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("due date {value} is in the past")]
    DateInPast { value: String },

    #[error("too many images ({actual}, max {max})")]
    TooManyImages { actual: usize, max: usize },

    #[error("nothing to change\n  hint: pass at least one field to edit")]
    NothingToEdit,

    #[error("no saved draft")]
    NoDraft,

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("queue is in use by another tareas process: {0}\n  hint: stop 'tareas watch' or wait for the other command to finish")]
    QueueLocked(String),

    #[error("asset error: {0}")]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Core(#[from] tareas_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for tareas operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
