// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queue inspection: `pending` and `status`.
//!
//! Both read the persisted queue without taking the lock, so they work while
//! `tareas watch` is running.

use std::fmt::Write;

use serde::Serialize;

use tareas_core::{MutationRecord, QueueStore};

use super::{runtime, Workspace};
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::sync::ReachabilityProbe;

pub fn pending(output: OutputFormat) -> Result<()> {
    let ws = Workspace::open()?;
    let queue = QueueStore::new(ws.state_store()?);
    print!("{}", format_pending(&queue.snapshot(), output)?);
    Ok(())
}

/// Renders queued records, oldest first.
pub(crate) fn format_pending(records: &[MutationRecord], output: OutputFormat) -> Result<String> {
    if output == OutputFormat::Json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(records)?));
    }

    if records.is_empty() {
        return Ok("No pending operations\n".to_string());
    }
    let mut out = String::new();
    for record in records {
        let _ = writeln!(out, "{}", record_line(record));
    }
    Ok(out)
}

fn record_line(record: &MutationRecord) -> String {
    let target = record.document_id.as_deref().unwrap_or("(new)");
    let mut line = format!(
        "{}  {:<6}  {}/{}",
        record.id, record.kind, record.collection, target
    );
    if let Some(nombre) = record
        .payload
        .as_ref()
        .and_then(|p| p.get("nombre"))
        .and_then(|v| v.as_str())
    {
        let _ = write!(line, "  \"{}\"", nombre);
    }
    if record.attempts > 0 {
        let _ = write!(line, "  [{} failed attempt(s)]", record.attempts);
    }
    line
}

/// Snapshot shown by `tareas status`.
#[derive(Debug, Serialize)]
pub(crate) struct StatusReport {
    pub remote: String,
    pub online: bool,
    pub pending: usize,
    pub dead_letters: Vec<MutationRecord>,
    pub draft: bool,
}

pub fn status(output: OutputFormat) -> Result<()> {
    let ws = Workspace::open()?;
    let queue = QueueStore::new(ws.state_store()?);
    let online = runtime()?.block_on(ws.probe().check());

    let report = StatusReport {
        remote: ws.config.remote.url.clone(),
        online,
        pending: queue.snapshot().len(),
        dead_letters: queue.load_dead_letters(),
        draft: ws.drafts()?.has_draft(),
    };
    print!("{}", format_status(&report, output)?);
    Ok(())
}

pub(crate) fn format_status(report: &StatusReport, output: OutputFormat) -> Result<String> {
    if output == OutputFormat::Json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(report)?));
    }

    let mut out = String::new();
    let state = if report.online { "online" } else { "offline" };
    let _ = writeln!(out, "Remote: {} ({})", report.remote, state);
    let _ = writeln!(out, "Pending: {}", report.pending);
    let _ = writeln!(out, "Dead letters: {}", report.dead_letters.len());
    for record in &report.dead_letters {
        let _ = writeln!(out, "  {}", record_line(record));
    }
    let draft = if report.draft { "saved" } else { "none" };
    let _ = writeln!(out, "Draft: {}", draft);
    Ok(out)
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
