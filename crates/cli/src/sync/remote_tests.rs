// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the WebSocket remote store against scripted local servers.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::AtomicUsize;
use tokio::net::TcpListener;

/// How a scripted server answers one request.
type Script = Arc<dyn Fn(ClientMessage) -> Vec<ServerMessage> + Send + Sync>;

/// Starts a server answering every text message with `script`'s replies.
///
/// With `close_after` set, each connection is closed after that many
/// requests.
async fn scripted_server(script: Script, close_after: Option<usize>) -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let connections = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&connections);

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            let script = Arc::clone(&script);
            tokio::spawn(async move {
                let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
                let mut served = 0;
                while let Some(Ok(msg)) = ws.next().await {
                    let Message::Text(text) = msg else { continue };
                    let request = ClientMessage::from_json(&text).unwrap();
                    for reply in script(request) {
                        let json = reply.to_json().unwrap();
                        if ws.send(Message::Text(json.into())).await.is_err() {
                            return;
                        }
                    }
                    served += 1;
                    if close_after == Some(served) {
                        let _ = ws.close(None).await;
                        return;
                    }
                }
            });
        }
    });

    (addr, connections)
}

fn ack_all() -> Script {
    Arc::new(|msg: ClientMessage| {
        let reply = match &msg {
            ClientMessage::Create { request_id, id, .. } => {
                ServerMessage::ack(*request_id, Some(id.clone().unwrap_or_else(|| "srv-1".into())))
            }
            ClientMessage::Update { request_id, id, .. }
            | ClientMessage::Delete { request_id, id, .. } => {
                ServerMessage::ack(*request_id, Some(id.clone()))
            }
            ClientMessage::Ping { id } => ServerMessage::pong(*id),
        };
        vec![reply]
    })
}

fn doc() -> Document {
    json!({"nombre": "Pagar renta"}).as_object().cloned().unwrap()
}

fn remote_for(addr: SocketAddr) -> WebSocketRemote {
    WebSocketRemote::new(format!("ws://{addr}"), Duration::from_secs(5))
}

#[tokio::test]
async fn create_returns_assigned_id() {
    let (addr, _) = scripted_server(ack_all(), None).await;
    let remote = remote_for(addr);

    let id = remote.create("tasks", None, &doc()).await.unwrap();
    assert_eq!(id, "srv-1");
}

#[tokio::test]
async fn create_at_id_returns_that_id() {
    let (addr, _) = scripted_server(ack_all(), None).await;
    let remote = remote_for(addr);

    let id = remote.create("tasks", Some("t-9"), &doc()).await.unwrap();
    assert_eq!(id, "t-9");
}

#[tokio::test]
async fn connection_is_reused() {
    let (addr, connections) = scripted_server(ack_all(), None).await;
    let remote = remote_for(addr);

    remote.update("tasks", "t-1", &doc()).await.unwrap();
    remote.delete("tasks", "t-1").await.unwrap();

    assert_eq!(connections.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rejection_maps_to_rejected() {
    let script: Script = Arc::new(|msg: ClientMessage| {
        vec![ServerMessage::rejected(
            msg.request_id().unwrap(),
            "document not found: tasks/t-1",
        )]
    });
    let (addr, _) = scripted_server(script, None).await;
    let remote = remote_for(addr);

    let err = remote.update("tasks", "t-1", &doc()).await.unwrap_err();
    assert!(matches!(err, RemoteError::Rejected(ref m) if m.contains("not found")));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let remote = remote_for(addr);
    let err = remote.delete("tasks", "t-1").await.unwrap_err();
    assert!(matches!(err, RemoteError::Transport(_)));
}

#[tokio::test]
async fn silent_server_times_out() {
    let script: Script = Arc::new(|_| Vec::new());
    let (addr, _) = scripted_server(script, None).await;
    let remote = WebSocketRemote::new(format!("ws://{addr}"), Duration::from_millis(100));

    let err = remote.delete("tasks", "t-1").await.unwrap_err();
    assert_eq!(err, RemoteError::Timeout(Duration::from_millis(100)));
}

#[tokio::test]
async fn reconnects_after_server_closes() {
    let (addr, connections) = scripted_server(ack_all(), Some(1)).await;
    let remote = remote_for(addr);

    remote.delete("tasks", "a").await.unwrap();
    // The first connection is closed now; this call fails on the dead socket
    // or succeeds on a fresh one, and the next one must succeed either way.
    let _ = remote.delete("tasks", "b").await;
    remote.delete("tasks", "c").await.unwrap();

    assert!(connections.load(Ordering::SeqCst) >= 2);
}

#[tokio::test]
async fn skips_replies_to_other_requests() {
    let script: Script = Arc::new(|msg: ClientMessage| {
        let request_id = msg.request_id().unwrap();
        vec![
            ServerMessage::ack(request_id + 100, Some("stale".into())),
            ServerMessage::ack(request_id, Some("fresh".into())),
        ]
    });
    let (addr, _) = scripted_server(script, None).await;
    let remote = remote_for(addr);

    let id = remote.create("tasks", None, &doc()).await.unwrap();
    assert_eq!(id, "fresh");
}

#[test]
fn error_display() {
    assert!(RemoteError::Transport("boom".into())
        .to_string()
        .contains("transport error"));
    assert!(RemoteError::Rejected("nope".into())
        .to_string()
        .contains("rejected"));
    assert!(RemoteError::Timeout(Duration::from_secs(2))
        .to_string()
        .contains("timed out"));
}
