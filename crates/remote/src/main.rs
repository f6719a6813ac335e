// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tareas-remote: WebSocket document store for the tareas task list.
//!
//! Holds the canonical documents and applies create, update and delete
//! requests sent by clients draining their offline queues.

mod server;
mod state;

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// tareas-remote: document store server
#[derive(Parser, Debug)]
#[command(name = "tareas-remote")]
#[command(about = "WebSocket document store for tareas clients")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "0.0.0.0:7890")]
    bind: SocketAddr,

    /// Directory for document storage
    #[arg(short, long, default_value = ".")]
    data: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting tareas-remote server");
    info!("  Bind address: {}", args.bind);
    info!("  Data directory: {}", args.data.display());

    let state = state::ServerState::new(&args.data)?;

    server::run(args.bind, state).await?;

    Ok(())
}
