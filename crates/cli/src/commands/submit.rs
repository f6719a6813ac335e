// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use tareas_core::{Document, MutationKind, OperationId};

use super::{with_queue, Workspace};
use crate::error::{Error, Result};
use crate::sync::{OfflineManager, RemoteStore};

pub fn run(
    kind: String,
    collection: Option<String>,
    id: Option<String>,
    data: Option<String>,
    no_sync: bool,
) -> Result<()> {
    let ws = Workspace::open()?;
    let collection = collection.unwrap_or_else(|| ws.config.collection.clone());
    with_queue(&ws, no_sync, |manager| {
        run_impl(manager, &kind, &collection, id, data.as_deref())
    })?;
    Ok(())
}

/// Queues a mutation given as raw parts.
pub(crate) fn run_impl<R: RemoteStore + 'static>(
    manager: &OfflineManager<R>,
    kind: &str,
    collection: &str,
    id: Option<String>,
    data: Option<&str>,
) -> Result<OperationId> {
    let kind = MutationKind::from(kind.trim().to_string());
    if let MutationKind::Unsupported(other) = &kind {
        return Err(Error::InvalidPayload(format!(
            "unknown operation type '{other}' (expected add, update or delete)"
        )));
    }
    let payload = data.map(parse_payload).transpose()?;

    let op = manager.submit_record_parts(kind.clone(), collection, id, payload)?;
    println!("Queued {} ({})", kind, op);
    Ok(op)
}

/// Parses a JSON object payload.
fn parse_payload(data: &str) -> Result<Document> {
    match serde_json::from_str(data)? {
        serde_json::Value::Object(doc) => Ok(doc),
        other => Err(Error::InvalidPayload(format!(
            "expected a JSON object, got {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "submit_tests.rs"]
mod tests;
