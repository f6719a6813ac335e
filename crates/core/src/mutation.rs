// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Mutations queued for delivery to the remote document store.
//!
//! A [`Mutation`] is what a caller asks for: create, update or delete a
//! document. Once accepted it becomes a [`MutationRecord`], the flat form that
//! is persisted in the offline queue and replayed on reconnect.
//!
//! Records are stored with the field names `id`, `type`, `collection`, `docId`
//! and `data`, with `type` one of `add`, `update` or `delete`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::id::OperationId;

/// Field map of a document, as sent to the remote store.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// The kind of change a record applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MutationKind {
    /// Insert a document (wire name `add`).
    Create,
    /// Merge fields into an existing document.
    Update,
    /// Remove a document.
    Delete,
    /// A kind this build does not understand. Never executed.
    Unsupported(String),
}

impl MutationKind {
    /// Returns the wire name of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            MutationKind::Create => "add",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
            MutationKind::Unsupported(other) => other,
        }
    }
}

impl From<String> for MutationKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "add" => MutationKind::Create,
            "update" => MutationKind::Update,
            "delete" => MutationKind::Delete,
            _ => MutationKind::Unsupported(s),
        }
    }
}

impl From<MutationKind> for String {
    fn from(kind: MutationKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A change requested by a caller, before it has been assigned an id.
///
/// The variants make the record invariants structural: updates and deletes
/// always name a document, creates and updates always carry fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Create {
        collection: String,
        /// Client-assigned id; when absent the remote store picks one.
        document_id: Option<String>,
        payload: Document,
    },
    Update {
        collection: String,
        document_id: String,
        payload: Document,
    },
    Delete {
        collection: String,
        document_id: String,
    },
}

impl Mutation {
    /// Creates a document whose id is chosen by the remote store.
    pub fn create(collection: impl Into<String>, payload: Document) -> Self {
        Mutation::Create {
            collection: collection.into(),
            document_id: None,
            payload,
        }
    }

    /// Creates a document at a client-assigned id.
    pub fn create_at(
        collection: impl Into<String>,
        document_id: impl Into<String>,
        payload: Document,
    ) -> Self {
        Mutation::Create {
            collection: collection.into(),
            document_id: Some(document_id.into()),
            payload,
        }
    }

    /// Merges `payload` into an existing document.
    pub fn update(
        collection: impl Into<String>,
        document_id: impl Into<String>,
        payload: Document,
    ) -> Self {
        Mutation::Update {
            collection: collection.into(),
            document_id: document_id.into(),
            payload,
        }
    }

    /// Deletes a document.
    pub fn delete(collection: impl Into<String>, document_id: impl Into<String>) -> Self {
        Mutation::Delete {
            collection: collection.into(),
            document_id: document_id.into(),
        }
    }

    /// Builds a mutation from untyped parts, enforcing the record invariants.
    pub fn from_parts(
        kind: MutationKind,
        collection: String,
        document_id: Option<String>,
        payload: Option<Document>,
    ) -> Result<Self> {
        if collection.trim().is_empty() {
            return Err(Error::InvalidMutation("collection name is empty".into()));
        }

        match (kind, document_id, payload) {
            (MutationKind::Create, document_id, Some(payload)) => Ok(Mutation::Create {
                collection,
                document_id,
                payload,
            }),
            (MutationKind::Update, Some(document_id), Some(payload)) => Ok(Mutation::Update {
                collection,
                document_id,
                payload,
            }),
            (MutationKind::Delete, Some(document_id), _) => Ok(Mutation::Delete {
                collection,
                document_id,
            }),
            (MutationKind::Create, _, None) => {
                Err(Error::InvalidMutation("add requires a payload".into()))
            }
            (MutationKind::Update, None, _) => {
                Err(Error::InvalidMutation("update requires a document id".into()))
            }
            (MutationKind::Update, _, None) => {
                Err(Error::InvalidMutation("update requires a payload".into()))
            }
            (MutationKind::Delete, None, _) => {
                Err(Error::InvalidMutation("delete requires a document id".into()))
            }
            (MutationKind::Unsupported(kind), _, _) => Err(Error::InvalidMutation(format!(
                "unsupported operation type '{kind}'"
            ))),
        }
    }

    /// Returns the kind of this mutation.
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::Create { .. } => MutationKind::Create,
            Mutation::Update { .. } => MutationKind::Update,
            Mutation::Delete { .. } => MutationKind::Delete,
        }
    }

    /// Stamps the mutation with its id, producing a queue record.
    pub fn into_record(self, id: OperationId) -> MutationRecord {
        let kind = self.kind();
        let (collection, document_id, payload) = match self {
            Mutation::Create {
                collection,
                document_id,
                payload,
            } => (collection, document_id, Some(payload)),
            Mutation::Update {
                collection,
                document_id,
                payload,
            } => (collection, Some(document_id), Some(payload)),
            Mutation::Delete {
                collection,
                document_id,
            } => (collection, Some(document_id), None),
        };

        MutationRecord {
            id,
            kind,
            collection,
            document_id,
            payload,
            attempts: 0,
        }
    }
}

/// A queued mutation as persisted in the offline queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationRecord {
    /// Assigned at enqueue time; unique and increasing.
    pub id: OperationId,
    #[serde(rename = "type")]
    pub kind: MutationKind,
    pub collection: String,
    #[serde(rename = "docId", default)]
    pub document_id: Option<String>,
    #[serde(rename = "data", default)]
    pub payload: Option<Document>,
    /// Failed delivery attempts so far.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub attempts: u32,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl MutationRecord {
    /// Checks the field invariants for the record's kind.
    ///
    /// Records of an unsupported kind pass; they are rejected at execution.
    pub fn validate(&self) -> Result<()> {
        if self.collection.trim().is_empty() {
            return Err(Error::InvalidMutation(format!(
                "record {} has an empty collection name",
                self.id
            )));
        }

        let needs_document_id = matches!(self.kind, MutationKind::Update | MutationKind::Delete);
        let needs_payload = matches!(self.kind, MutationKind::Create | MutationKind::Update);

        if needs_document_id && self.document_id.is_none() {
            return Err(Error::InvalidMutation(format!(
                "{} record {} has no document id",
                self.kind, self.id
            )));
        }
        if needs_payload && self.payload.is_none() {
            return Err(Error::InvalidMutation(format!(
                "{} record {} has no payload",
                self.kind, self.id
            )));
        }

        Ok(())
    }

    /// Returns true if this record targets the given document.
    pub fn targets(&self, document_id: &str) -> bool {
        self.document_id.as_deref() == Some(document_id)
    }
}

#[cfg(test)]
#[path = "mutation_tests.rs"]
mod tests;
