// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Task commands: `add`, `edit` and `rm`.
//!
//! Each one turns user input into a mutation and queues it; delivery is
//! left to the sync engine.

use chrono::{Local, NaiveDate};

use tareas_core::{DraftStore, KeyValueStore, Mutation, OperationId};

use super::{with_queue, Workspace};
use crate::cli::TaskArgs;
use crate::error::{Error, Result};
use crate::sync::{OfflineManager, RemoteStore};
use crate::validate::TaskFields;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn add(
    nombre: Option<String>,
    task: TaskArgs,
    id: Option<String>,
    from_draft: bool,
    no_sync: bool,
) -> Result<()> {
    let ws = Workspace::open()?;
    let drafts = ws.drafts()?;
    let fields = task.into_fields(nombre);
    with_queue(&ws, no_sync, |manager| {
        add_impl(
            manager,
            &ws.config.collection,
            fields,
            id,
            from_draft.then_some(&drafts),
            today(),
        )
    })?;
    Ok(())
}

/// Queues a new task. With `draft`, missing fields come from the saved draft,
/// which is cleared once the task is queued.
pub(crate) fn add_impl<R, S>(
    manager: &OfflineManager<R>,
    collection: &str,
    fields: TaskFields,
    id: Option<String>,
    draft: Option<&DraftStore<S>>,
    today: NaiveDate,
) -> Result<OperationId>
where
    R: RemoteStore + 'static,
    S: KeyValueStore,
{
    let fields = match draft {
        Some(drafts) => {
            let saved = drafts.load().ok_or(Error::NoDraft)?;
            fields.or(TaskFields::from_document(&saved.fields))
        }
        None => fields,
    };

    let doc = fields.into_new_task(today)?;
    let mutation = match id {
        Some(id) if id.trim().is_empty() => return Err(Error::FieldEmpty { field: "Task id" }),
        Some(id) => Mutation::create_at(collection, id, doc),
        None => Mutation::create(collection, doc),
    };

    let op = manager.submit(mutation);
    if let Some(drafts) = draft {
        drafts.clear()?;
    }
    println!("Queued new task ({})", op);
    Ok(op)
}

pub fn edit(id: String, nombre: Option<String>, task: TaskArgs, no_sync: bool) -> Result<()> {
    let ws = Workspace::open()?;
    let fields = task.into_fields(nombre);
    with_queue(&ws, no_sync, |manager| {
        edit_impl(manager, &ws.config.collection, &id, fields, today())
    })?;
    Ok(())
}

/// Queues an update carrying only the given fields.
pub(crate) fn edit_impl<R: RemoteStore + 'static>(
    manager: &OfflineManager<R>,
    collection: &str,
    id: &str,
    fields: TaskFields,
    today: NaiveDate,
) -> Result<OperationId> {
    let id = validate_id(id)?;
    let changes = fields.into_changes(today)?;
    let op = manager.submit(Mutation::update(collection, id, changes));
    println!("Queued update of {} ({})", id, op);
    Ok(op)
}

pub fn rm(id: String, no_sync: bool) -> Result<()> {
    let ws = Workspace::open()?;
    with_queue(&ws, no_sync, |manager| {
        rm_impl(manager, &ws.config.collection, &id)
    })?;
    Ok(())
}

pub(crate) fn rm_impl<R: RemoteStore + 'static>(
    manager: &OfflineManager<R>,
    collection: &str,
    id: &str,
) -> Result<OperationId> {
    let id = validate_id(id)?;
    let op = manager.submit(Mutation::delete(collection, id));
    println!("Queued delete of {} ({})", id, op);
    Ok(op)
}

fn validate_id(id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(Error::FieldEmpty { field: "Task id" });
    }
    Ok(id)
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
