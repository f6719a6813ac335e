// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `sync` and `watch`.

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use super::{runtime, with_queue, Workspace};
use crate::error::Result;
use crate::sync::watch_connectivity;

/// Runs one pass if the remote is reachable.
pub fn once() -> Result<()> {
    let ws = Workspace::open()?;
    with_queue(&ws, false, |_| Ok(()))
}

/// Runs the sync driver and the connectivity watcher until Ctrl-C.
pub fn watch() -> Result<()> {
    let ws = Workspace::open()?;
    let _lock = ws.lock()?;
    runtime()?.block_on(watch_impl(&ws))
}

async fn watch_impl(ws: &Workspace) -> Result<()> {
    let manager = ws.open_manager(ws.remote(), false)?;
    let mut events = manager.subscribe();
    let cancel = CancellationToken::new();

    let driver = tokio::spawn({
        let manager = manager.clone();
        let cancel = cancel.clone();
        async move { manager.run(cancel).await }
    });
    let watcher = tokio::spawn(watch_connectivity(
        manager.clone(),
        ws.probe(),
        ws.config.remote.probe_interval(),
        cancel.clone(),
    ));

    println!(
        "Watching {} with {} pending operation(s). Press Ctrl-C to stop.",
        ws.config.remote.url,
        manager.pending_count()
    );

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    tracing::error!("failed to listen for Ctrl-C: {}", e);
                }
                break;
            }
            event = events.recv() => match event {
                Ok(event) => println!("{}", event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event stream lagged");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    cancel.cancel();
    for (name, task) in [("sync driver", driver), ("connectivity watcher", watcher)] {
        if let Err(e) = task.await {
            tracing::error!("{} failed: {}", name, e);
        }
    }

    println!("Stopped with {} pending operation(s)", manager.pending_count());
    Ok(())
}
