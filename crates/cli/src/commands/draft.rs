// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The task form draft: a single unfinished task kept for 24 hours.

use chrono::{DateTime, Local, Utc};

use tareas_core::draft::has_content;
use tareas_core::{Draft, DraftStore, KeyValueStore};

use super::Workspace;
use crate::cli::{OutputFormat, TaskArgs};
use crate::error::{Error, Result};
use crate::validate::TaskFields;

pub fn save(nombre: Option<String>, task: TaskArgs) -> Result<()> {
    let ws = Workspace::open()?;
    let draft = save_impl(&ws.drafts()?, task.into_fields(nombre), Utc::now())?;
    println!(
        "Draft saved at {}",
        draft.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    );
    Ok(())
}

/// Saves `fields` as the draft. Drafts are not validated; an empty one is
/// refused.
pub(crate) fn save_impl<S: KeyValueStore>(
    drafts: &DraftStore<S>,
    fields: TaskFields,
    now: DateTime<Utc>,
) -> Result<Draft> {
    let doc = fields.to_document();
    if !has_content(&doc) {
        return Err(Error::FieldRequired {
            field: "At least one field",
        });
    }
    Ok(drafts.save_at(doc, now)?)
}

pub fn show(output: OutputFormat) -> Result<()> {
    let ws = Workspace::open()?;
    let draft = ws.drafts()?.load().ok_or(Error::NoDraft)?;
    print!("{}", format_draft(&draft, output)?);
    Ok(())
}

pub(crate) fn format_draft(draft: &Draft, output: OutputFormat) -> Result<String> {
    if output == OutputFormat::Json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(draft)?));
    }

    let fields = TaskFields::from_document(&draft.fields);
    let mut out = String::new();
    let show = |label: &str, value: Option<&str>| match value {
        Some(v) => format!("{label}: {v}\n"),
        None => format!("{label}: -\n"),
    };
    out.push_str(&show("Name", fields.nombre.as_deref()));
    out.push_str(&show("Due", fields.fecha.as_deref()));
    out.push_str(&show("Description", fields.descripcion.as_deref()));
    for url in fields.imagenes.unwrap_or_default() {
        out.push_str(&format!("Image: {url}\n"));
    }
    out.push_str(&format!(
        "Saved: {}\n",
        draft.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    ));
    Ok(out)
}

pub fn clear() -> Result<()> {
    let ws = Workspace::open()?;
    ws.drafts()?.clear()?;
    println!("Draft cleared");
    Ok(())
}

#[cfg(test)]
#[path = "draft_tests.rs"]
mod tests;
