// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote document store abstraction.
//!
//! Provides a trait-based layer that enables:
//! - A WebSocket client for the tareas-remote server in production
//! - Mock stores for unit testing

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use tareas_core::protocol::{ClientMessage, ServerMessage};
use tareas_core::Document;

/// Error type for remote store calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The store could not be reached or the connection broke.
    #[error("transport error: {0}")]
    Transport(String),

    /// The store refused the request.
    #[error("rejected by remote: {0}")]
    Rejected(String),

    /// No reply arrived in time.
    #[error("remote call timed out after {0:?}")]
    Timeout(Duration),
}

/// Result type for remote store calls.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Boxed future returned by [`RemoteStore`] methods.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = RemoteResult<T>> + Send + 'a>>;

/// A document store reachable over the network.
///
/// Each method performs exactly one remote call.
pub trait RemoteStore: Send + Sync {
    /// Inserts a document and returns its id.
    ///
    /// With `id` set, the document is written at that id (overwriting);
    /// otherwise the store assigns one.
    fn create<'a>(
        &'a self,
        collection: &'a str,
        id: Option<&'a str>,
        data: &'a Document,
    ) -> RemoteFuture<'a, String>;

    /// Merges fields into an existing document.
    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        data: &'a Document,
    ) -> RemoteFuture<'a, ()>;

    /// Removes a document.
    fn delete<'a>(&'a self, collection: &'a str, id: &'a str) -> RemoteFuture<'a, ()>;
}

impl<T: RemoteStore + ?Sized> RemoteStore for Arc<T> {
    fn create<'a>(
        &'a self,
        collection: &'a str,
        id: Option<&'a str>,
        data: &'a Document,
    ) -> RemoteFuture<'a, String> {
        (**self).create(collection, id, data)
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        data: &'a Document,
    ) -> RemoteFuture<'a, ()> {
        (**self).update(collection, id, data)
    }

    fn delete<'a>(&'a self, collection: &'a str, id: &'a str) -> RemoteFuture<'a, ()> {
        (**self).delete(collection, id)
    }
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens a WebSocket connection to `url`.
pub(crate) async fn connect(url: &str) -> RemoteResult<WsStream> {
    let (ws, _) = tokio_tungstenite::connect_async(url)
        .await
        .map_err(|e| RemoteError::Transport(format!("connection to {url} failed: {e}")))?;
    Ok(ws)
}

/// Sends `msg` and waits for the reply that answers it.
///
/// Replies to other requests are skipped; an `error` reply always ends the
/// exchange since the server sends it for requests it could not parse.
pub(crate) async fn exchange(ws: &mut WsStream, msg: &ClientMessage) -> RemoteResult<ServerMessage> {
    let json = msg
        .to_json()
        .map_err(|e| RemoteError::Transport(format!("serialization failed: {e}")))?;
    ws.send(Message::Text(json.into()))
        .await
        .map_err(|e| RemoteError::Transport(format!("send failed: {e}")))?;

    let wanted = msg.request_id();
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => {
                let reply = ServerMessage::from_json(&text)
                    .map_err(|e| RemoteError::Transport(format!("invalid reply: {e}")))?;
                if matches!(reply, ServerMessage::Error { .. }) || reply.request_id() == wanted {
                    return Ok(reply);
                }
                tracing::debug!(?reply, "skipping unrelated reply");
            }
            Some(Ok(Message::Close(_))) | None => {
                return Err(RemoteError::Transport("connection closed".into()));
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                return Err(RemoteError::Transport(format!("receive failed: {e}")));
            }
        }
    }
}

/// [`RemoteStore`] speaking the tareas wire protocol over a WebSocket.
///
/// Connects lazily on the first call and reuses the connection. Any transport
/// failure or timeout drops the connection; the next call reconnects.
pub struct WebSocketRemote {
    url: String,
    request_timeout: Duration,
    conn: Mutex<Option<WsStream>>,
    next_request_id: AtomicU64,
}

impl WebSocketRemote {
    /// Creates a client for the server at `url`.
    pub fn new(url: impl Into<String>, request_timeout: Duration) -> Self {
        WebSocketRemote {
            url: url.into(),
            request_timeout,
            conn: Mutex::new(None),
            next_request_id: AtomicU64::new(1),
        }
    }

    /// Returns the server URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn next_request_id(&self) -> u64 {
        self.next_request_id.fetch_add(1, Ordering::Relaxed)
    }

    async fn request(&self, msg: ClientMessage) -> RemoteResult<Option<String>> {
        let mut conn = self.conn.lock().await;

        let result = tokio::time::timeout(self.request_timeout, async {
            if conn.is_none() {
                tracing::debug!(url = %self.url, "connecting to remote");
                *conn = Some(connect(&self.url).await?);
            }
            let ws = conn
                .as_mut()
                .ok_or_else(|| RemoteError::Transport("not connected".into()))?;
            exchange(ws, &msg).await
        })
        .await;

        let reply = match result {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                *conn = None;
                return Err(e);
            }
            Err(_) => {
                *conn = None;
                return Err(RemoteError::Timeout(self.request_timeout));
            }
        };

        match reply {
            ServerMessage::Ack { id, .. } => Ok(id),
            ServerMessage::Rejected { message, .. } | ServerMessage::Error { message } => {
                Err(RemoteError::Rejected(message))
            }
            ServerMessage::Pong { .. } => Err(RemoteError::Transport(
                "unexpected pong in reply to a document request".into(),
            )),
        }
    }
}

impl RemoteStore for WebSocketRemote {
    fn create<'a>(
        &'a self,
        collection: &'a str,
        id: Option<&'a str>,
        data: &'a Document,
    ) -> RemoteFuture<'a, String> {
        Box::pin(async move {
            let msg = ClientMessage::create(
                self.next_request_id(),
                collection,
                id.map(String::from),
                data.clone(),
            );
            let assigned = self.request(msg).await?;
            assigned
                .or_else(|| id.map(String::from))
                .ok_or_else(|| RemoteError::Transport("create acknowledged without an id".into()))
        })
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        data: &'a Document,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            let msg = ClientMessage::update(self.next_request_id(), collection, id, data.clone());
            self.request(msg).await.map(|_| ())
        })
    }

    fn delete<'a>(&'a self, collection: &'a str, id: &'a str) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            let msg = ClientMessage::delete(self.next_request_id(), collection, id);
            self.request(msg).await.map(|_| ())
        })
    }
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
