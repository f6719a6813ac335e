// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol messages between a client and the remote document store.
//!
//! Every document request carries a client-chosen `request_id` that the server
//! echoes in its `ack` or `rejected` reply, so a client can match responses to
//! requests on a single connection.

use serde::{Deserialize, Serialize};

use crate::mutation::Document;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Insert a document.
    ///
    /// Without `id` the server assigns one; with `id` any existing document
    /// at that id is overwritten.
    Create {
        request_id: u64,
        collection: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        data: Document,
    },

    /// Merge fields into an existing document.
    Update {
        request_id: u64,
        collection: String,
        id: String,
        data: Document,
    },

    /// Remove a document. Succeeds even when the document does not exist.
    Delete {
        request_id: u64,
        collection: String,
        id: String,
    },

    /// Reachability check.
    Ping {
        /// Client-chosen ID echoed in Pong.
        id: u64,
    },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The request was applied.
    Ack {
        request_id: u64,
        /// Id of the affected document (the assigned one for creates).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    /// The request was understood but refused.
    Rejected { request_id: u64, message: String },

    /// Pong response to client Ping.
    Pong {
        /// Echoed from the Ping message.
        id: u64,
    },

    /// The request could not be parsed.
    Error {
        /// Human-readable error description.
        message: String,
    },
}

impl ClientMessage {
    /// Creates a Create message.
    pub fn create(
        request_id: u64,
        collection: impl Into<String>,
        id: Option<String>,
        data: Document,
    ) -> Self {
        ClientMessage::Create {
            request_id,
            collection: collection.into(),
            id,
            data,
        }
    }

    /// Creates an Update message.
    pub fn update(
        request_id: u64,
        collection: impl Into<String>,
        id: impl Into<String>,
        data: Document,
    ) -> Self {
        ClientMessage::Update {
            request_id,
            collection: collection.into(),
            id: id.into(),
            data,
        }
    }

    /// Creates a Delete message.
    pub fn delete(request_id: u64, collection: impl Into<String>, id: impl Into<String>) -> Self {
        ClientMessage::Delete {
            request_id,
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Creates a Ping message.
    pub fn ping(id: u64) -> Self {
        ClientMessage::Ping { id }
    }

    /// Returns the request id of a document request.
    pub fn request_id(&self) -> Option<u64> {
        match self {
            ClientMessage::Create { request_id, .. }
            | ClientMessage::Update { request_id, .. }
            | ClientMessage::Delete { request_id, .. } => Some(*request_id),
            ClientMessage::Ping { .. } => None,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Creates an Ack message.
    pub fn ack(request_id: u64, id: Option<String>) -> Self {
        ServerMessage::Ack { request_id, id }
    }

    /// Creates a Rejected message.
    pub fn rejected(request_id: u64, message: impl Into<String>) -> Self {
        ServerMessage::Rejected {
            request_id,
            message: message.into(),
        }
    }

    /// Creates a Pong message.
    pub fn pong(id: u64) -> Self {
        ServerMessage::Pong { id }
    }

    /// Creates an Error message.
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    /// Returns the request id this message answers, if any.
    pub fn request_id(&self) -> Option<u64> {
        match self {
            ServerMessage::Ack { request_id, .. } | ServerMessage::Rejected { request_id, .. } => {
                Some(*request_id)
            }
            ServerMessage::Pong { .. } | ServerMessage::Error { .. } => None,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
