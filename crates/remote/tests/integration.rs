// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Integration tests for the tareas-remote server binary.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::net::TcpListener;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Spawns a server process and kills it on drop.
struct ServerProcess {
    child: Child,
    port: u16,
}

impl ServerProcess {
    fn spawn(data: &Path) -> Self {
        let port = TcpListener::bind("127.0.0.1:0")
            .and_then(|l| l.local_addr())
            .map(|addr| addr.port())
            .expect("pick free port");

        let child = Command::new(env!("CARGO_BIN_EXE_tareas-remote"))
            .arg("--bind")
            .arg(format!("127.0.0.1:{}", port))
            .arg("--data")
            .arg(data)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn server process");

        ServerProcess { child, port }
    }

    /// Connects, retrying while the process starts up.
    async fn connect(&self) -> (SplitSink<Socket, Message>, SplitStream<Socket>) {
        let url = format!("ws://127.0.0.1:{}", self.port);
        for _ in 0..20 {
            if let Ok(Ok((stream, _))) =
                tokio::time::timeout(Duration::from_millis(500), connect_async(&url)).await
            {
                return stream.split();
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        panic!("server did not accept connections at {}", url);
    }
}

impl Drop for ServerProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

async fn request(
    sink: &mut SplitSink<Socket, Message>,
    stream: &mut SplitStream<Socket>,
    msg: Value,
) -> Value {
    sink.send(Message::Text(msg.to_string().into()))
        .await
        .expect("send request");

    match tokio::time::timeout(Duration::from_secs(5), stream.next()).await {
        Ok(Some(Ok(Message::Text(text)))) => serde_json::from_str(&text).unwrap(),
        other => panic!("expected a text reply, got {:?}", other),
    }
}

#[tokio::test]
async fn answers_ping_with_pong() {
    let data = tempfile::tempdir().unwrap();
    let server = ServerProcess::spawn(data.path());
    let (mut sink, mut stream) = server.connect().await;

    let reply = request(&mut sink, &mut stream, json!({"type": "ping", "id": 12345})).await;

    assert_eq!(reply, json!({"type": "pong", "id": 12345}));
}

#[tokio::test]
async fn documents_survive_a_restart() {
    let data = tempfile::tempdir().unwrap();

    {
        let server = ServerProcess::spawn(data.path());
        let (mut sink, mut stream) = server.connect().await;
        let reply = request(
            &mut sink,
            &mut stream,
            json!({
                "type": "create",
                "request_id": 1,
                "collection": "tasks",
                "id": "renta-marzo",
                "data": {"nombre": "Pagar renta", "fecha": "2026-03-05"}
            }),
        )
        .await;
        assert_eq!(reply["type"], "ack");
        assert_eq!(reply["id"], "renta-marzo");
    }

    let server = ServerProcess::spawn(data.path());
    let (mut sink, mut stream) = server.connect().await;
    let reply = request(
        &mut sink,
        &mut stream,
        json!({
            "type": "update",
            "request_id": 2,
            "collection": "tasks",
            "id": "renta-marzo",
            "data": {"descripcion": "Transferir al casero"}
        }),
    )
    .await;

    // Updates are rejected for missing documents, so an ack means it persisted.
    assert_eq!(reply["type"], "ack", "unexpected reply: {}", reply);
    assert_eq!(reply["request_id"], 2);
}
