// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use clap::{Parser, Subcommand, ValueEnum};

pub use args::TaskArgs;

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "tareas")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "An offline-first task list that syncs when the network returns")]
#[command(
    long_about = "An offline-first task list.\n\n\
    Every change is queued on disk first and replayed against the remote \
    document store, in order, whenever it is reachable."
)]
pub struct Cli {
    /// Run as if tareas was started in <path>
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<String>,

    /// Log debug output to stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize tareas in the current directory
    Init {
        /// Remote document store URL (ws:// or wss://)
        #[arg(long)]
        remote: Option<String>,

        /// Directory to initialize (default: current directory)
        #[arg(long)]
        path: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Tasks
    // ─────────────────────────────────────────────────────────────────────────
    /// Add a task
    #[command(after_help = "\
Examples:
  tareas add \"Pagar renta\" -f 2026-03-05           Add a task due on March 5
  tareas add \"Comprar pan\" -f 2026-03-02 -d \"Integral\"
  tareas add --from-draft                          Add the saved draft")]
    Add {
        /// Task name
        #[arg(value_parser = non_empty_string)]
        nombre: Option<String>,

        #[command(flatten)]
        task: TaskArgs,

        /// Document id to create the task at (default: assigned by the remote)
        #[arg(long)]
        id: Option<String>,

        /// Fill missing fields from the saved draft and clear it afterwards
        #[arg(long)]
        from_draft: bool,

        /// Queue only; do not try to sync
        #[arg(long)]
        no_sync: bool,
    },

    /// Change fields of a task
    Edit {
        /// Task document id
        id: String,

        /// New task name
        #[arg(long, short = 'n', value_parser = non_empty_string)]
        nombre: Option<String>,

        #[command(flatten)]
        task: TaskArgs,

        /// Queue only; do not try to sync
        #[arg(long)]
        no_sync: bool,
    },

    /// Delete a task
    Rm {
        /// Task document id
        id: String,

        /// Queue only; do not try to sync
        #[arg(long)]
        no_sync: bool,
    },

    /// Queue a raw mutation
    Submit {
        /// Operation type (add, update, delete)
        kind: String,

        /// Target collection (default: configured collection)
        #[arg(long, short = 'c')]
        collection: Option<String>,

        /// Document id
        #[arg(long)]
        id: Option<String>,

        /// JSON object payload
        #[arg(long)]
        data: Option<String>,

        /// Queue only; do not try to sync
        #[arg(long)]
        no_sync: bool,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Queue and sync
    // ─────────────────────────────────────────────────────────────────────────
    /// List queued operations
    Pending {
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show connectivity, queue size and abandoned operations
    Status {
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Replay queued operations now
    Sync,

    /// Keep syncing in the foreground until interrupted
    Watch,

    // ─────────────────────────────────────────────────────────────────────────
    // Drafts and assets
    // ─────────────────────────────────────────────────────────────────────────
    /// Manage the task form draft
    #[command(subcommand)]
    Draft(DraftCommand),

    /// Manage the static asset cache
    #[command(subcommand)]
    Asset(AssetCommand),
}

#[derive(Subcommand)]
pub enum DraftCommand {
    /// Save the given fields as the draft, replacing any previous one
    Save {
        /// Task name
        nombre: Option<String>,

        #[command(flatten)]
        task: TaskArgs,
    },

    /// Show the saved draft
    Show {
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Delete the saved draft
    Clear,
}

#[derive(Subcommand)]
pub enum AssetCommand {
    /// Fetch the app shell into the current cache
    Install,

    /// Delete caches from older versions
    Activate,

    /// Request an asset through the cache
    Get {
        /// Path or URL of the asset
        path: String,

        /// Treat the request as a page navigation
        #[arg(long)]
        navigate: bool,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
