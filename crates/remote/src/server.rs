// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket server implementation.
//!
//! Each connection is served sequentially: a request is applied and answered
//! before the next one is read, so a client sees its writes acknowledged in
//! the order it sent them.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use tareas_core::protocol::{ClientMessage, ServerMessage};

use crate::state::ServerState;

/// Run the WebSocket server on the given address.
pub async fn run(addr: SocketAddr, state: ServerState) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on: {}", addr);

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let state = state.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }
}

/// Handle a single WebSocket connection.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: ServerState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    info!("New WebSocket connection from: {}", peer_addr);

    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    while let Some(msg) = ws_stream.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let response = handle_client_message(&text, &state).await;
                let json = response.to_json()?;
                ws_sink.send(Message::Text(json.into())).await?;
            }
            Ok(Message::Close(_)) => {
                info!("Client {} disconnected", peer_addr);
                break;
            }
            Ok(Message::Ping(data)) => {
                ws_sink.send(Message::Pong(data)).await?;
            }
            Ok(_) => {
                // Binary, Pong and raw frames are ignored
            }
            Err(e) => {
                warn!("WebSocket error from {}: {}", peer_addr, e);
                break;
            }
        }
    }

    info!("Connection closed: {}", peer_addr);
    Ok(())
}

/// Apply a client message and build the reply.
pub(crate) async fn handle_client_message(text: &str, state: &ServerState) -> ServerMessage {
    let msg = match ClientMessage::from_json(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!("Unparsable request: {}", e);
            return ServerMessage::error(format!("invalid request: {e}"));
        }
    };
    debug!("Received message: {:?}", msg);

    match msg {
        ClientMessage::Create {
            request_id,
            collection,
            id,
            data,
        } => match state.create(&collection, id, data).await {
            Ok(id) => {
                debug!("Created {}/{}", collection, id);
                ServerMessage::ack(request_id, Some(id))
            }
            Err(e) => ServerMessage::rejected(request_id, e.to_string()),
        },

        ClientMessage::Update {
            request_id,
            collection,
            id,
            data,
        } => match state.update(&collection, &id, data).await {
            Ok(()) => {
                debug!("Updated {}/{}", collection, id);
                ServerMessage::ack(request_id, Some(id))
            }
            Err(e) => ServerMessage::rejected(request_id, e.to_string()),
        },

        ClientMessage::Delete {
            request_id,
            collection,
            id,
        } => match state.delete(&collection, &id).await {
            Ok(()) => {
                debug!("Deleted {}/{}", collection, id);
                ServerMessage::ack(request_id, Some(id))
            }
            Err(e) => ServerMessage::rejected(request_id, e.to_string()),
        },

        ClientMessage::Ping { id } => {
            debug!("Ping received: {}", id);
            ServerMessage::pong(id)
        }
    }
}
