// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tareas - an offline-first task list.
//!
//! This crate provides the `tareas` CLI and the client side of the sync
//! system: every change is written to an on-disk queue first and replayed,
//! in order, against a `tareas-remote` document store when it is reachable.
//!
//! # Main Components
//!
//! - [`sync::OfflineManager`] - the persistent write queue and its drain engine
//! - [`sync::WebSocketRemote`] - [`sync::RemoteStore`] over the JSON WebSocket protocol
//! - [`assets::AssetWorker`] - network-first cache for the app's static assets
//! - [`Config`] - project configuration in `.tareas/config.toml`
//! - [`Error`] - Error types for all operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use tareas::sync::{EngineConfig, OfflineManager, WebSocketRemote};
//! use tareas_core::{FileStore, Mutation};
//!
//! let remote = WebSocketRemote::new("ws://127.0.0.1:7890", Duration::from_secs(10));
//! let manager = OfflineManager::open(FileStore::open(dir)?, remote, EngineConfig::default(), true);
//! manager.submit(Mutation::create("tasks", task));
//! manager.sync_now().await;
//! ```

mod cli;
mod commands;
mod validate;

pub mod assets;
pub mod config;
pub mod error;
pub mod sync;

pub use cli::{AssetCommand, Cli, Command, DraftCommand, OutputFormat, TaskArgs};
pub use config::{find_work_dir, init_work_dir, Config};
pub use error::{Error, Result};
pub use validate::TaskFields;

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Init { remote, path } => commands::init::run(remote, path),
        Command::Add {
            nombre,
            task,
            id,
            from_draft,
            no_sync,
        } => commands::task::add(nombre, task, id, from_draft, no_sync),
        Command::Edit {
            id,
            nombre,
            task,
            no_sync,
        } => commands::task::edit(id, nombre, task, no_sync),
        Command::Rm { id, no_sync } => commands::task::rm(id, no_sync),
        Command::Submit {
            kind,
            collection,
            id,
            data,
            no_sync,
        } => commands::submit::run(kind, collection, id, data, no_sync),
        Command::Pending { output } => commands::queue::pending(output),
        Command::Status { output } => commands::queue::status(output),
        Command::Sync => commands::sync::once(),
        Command::Watch => commands::sync::watch(),
        Command::Draft(cmd) => match cmd {
            DraftCommand::Save { nombre, task } => commands::draft::save(nombre, task),
            DraftCommand::Show { output } => commands::draft::show(output),
            DraftCommand::Clear => commands::draft::clear(),
        },
        Command::Asset(cmd) => match cmd {
            AssetCommand::Install => commands::asset::install(),
            AssetCommand::Activate => commands::asset::activate(),
            AssetCommand::Get { path, navigate } => commands::asset::get(path, navigate),
        },
    }
}

/// Default log level for a command, before `RUST_LOG` and `--verbose`.
pub fn default_log_level(command: &Command, verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else if matches!(command, Command::Watch) {
        "info"
    } else {
        "warn"
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
