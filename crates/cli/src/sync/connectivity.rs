// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity tracking.
//!
//! [`ConnectivityMonitor`] turns a stream of possibly repeated online/offline
//! signals into genuine transitions. On hosts without a platform signal,
//! [`watch_connectivity`] produces one by polling a [`ReachabilityProbe`].

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use tareas_core::protocol::{ClientMessage, ServerMessage};

use super::engine::OfflineManager;
use super::remote::{self, RemoteStore};

/// A genuine connectivity transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityChanged {
    pub is_online: bool,
}

/// Tracks the current connectivity state.
#[derive(Debug)]
pub struct ConnectivityMonitor {
    online: AtomicBool,
}

impl ConnectivityMonitor {
    pub fn new(initial: bool) -> Self {
        ConnectivityMonitor {
            online: AtomicBool::new(initial),
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    /// Records a signal; returns the transition it causes, if any.
    pub fn observe(&self, online: bool) -> Option<ConnectivityChanged> {
        let previous = self.online.swap(online, Ordering::AcqRel);
        (previous != online).then_some(ConnectivityChanged { is_online: online })
    }
}

/// Answers whether the remote store is reachable right now.
pub trait ReachabilityProbe: Send + Sync {
    fn check(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
}

/// Probes a tareas-remote server with a protocol-level ping.
pub struct RemoteProbe {
    url: String,
    timeout: Duration,
    next_ping: AtomicU64,
}

impl RemoteProbe {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        RemoteProbe {
            url: url.into(),
            timeout,
            next_ping: AtomicU64::new(1),
        }
    }
}

impl ReachabilityProbe for RemoteProbe {
    fn check(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move {
            let ping_id = self.next_ping.fetch_add(1, Ordering::Relaxed);
            let attempt = async {
                let mut ws = remote::connect(&self.url).await?;
                let reply = remote::exchange(&mut ws, &ClientMessage::ping(ping_id)).await;
                let _ = ws.close(None).await;
                reply
            };

            match tokio::time::timeout(self.timeout, attempt).await {
                Ok(Ok(ServerMessage::Pong { id })) => id == ping_id,
                Ok(Ok(other)) => {
                    tracing::debug!(?other, "unexpected reply to ping");
                    false
                }
                Ok(Err(e)) => {
                    tracing::debug!("remote unreachable: {}", e);
                    false
                }
                Err(_) => {
                    tracing::debug!(timeout = ?self.timeout, "ping timed out");
                    false
                }
            }
        })
    }
}

/// Polls `probe` every `interval` and feeds the result to `manager` until
/// `cancel` fires. The first check happens immediately.
pub async fn watch_connectivity<R, P>(
    manager: OfflineManager<R>,
    probe: P,
    interval: Duration,
    cancel: CancellationToken,
) where
    R: RemoteStore + 'static,
    P: ReachabilityProbe,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let online = tokio::select! {
            _ = cancel.cancelled() => break,
            online = probe.check() => online,
        };
        manager.set_online(online);
    }

    tracing::debug!("connectivity watcher stopped");
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
