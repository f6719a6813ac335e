// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::sync::test_helpers::{doc, task, MockRemote, RemoteCall};
use serde_json::json;
use tareas_core::{Mutation, OperationId};
use yare::parameterized;

fn record(mutation: Mutation) -> MutationRecord {
    mutation.into_record(OperationId::new(1000, 0, 1))
}

#[tokio::test]
async fn create_without_id_lets_store_assign() {
    let remote = MockRemote::new();
    let executor = OperationExecutor::new(remote.clone());

    executor
        .execute(&record(Mutation::create("tasks", task("Pagar renta"))))
        .await
        .unwrap();

    assert_eq!(
        remote.calls(),
        vec![RemoteCall::Create {
            collection: "tasks".into(),
            id: None,
            data: task("Pagar renta"),
        }]
    );
    assert_eq!(remote.documents("tasks").len(), 1);
}

#[tokio::test]
async fn create_at_client_id() {
    let remote = MockRemote::new();
    let executor = OperationExecutor::new(remote.clone());

    executor
        .execute(&record(Mutation::create_at("tasks", "t-1", task("x"))))
        .await
        .unwrap();

    assert!(remote.document("tasks", "t-1").is_some());
}

#[tokio::test]
async fn update_merges_and_delete_removes() {
    let remote = MockRemote::new();
    let executor = OperationExecutor::new(remote.clone());

    executor
        .execute(&record(Mutation::create_at("tasks", "t-1", task("x"))))
        .await
        .unwrap();
    executor
        .execute(&record(Mutation::update(
            "tasks",
            "t-1",
            doc(json!({"descripcion": "hoy"})),
        )))
        .await
        .unwrap();
    assert_eq!(remote.document("tasks", "t-1").unwrap()["descripcion"], "hoy");

    executor
        .execute(&record(Mutation::delete("tasks", "t-1")))
        .await
        .unwrap();
    assert!(remote.document("tasks", "t-1").is_none());
    assert_eq!(remote.calls().len(), 3);
}

#[tokio::test]
async fn remote_failure_is_transient() {
    let remote = MockRemote::new();
    remote.fail_next(1);
    let executor = OperationExecutor::new(remote.clone());

    let err = executor
        .execute(&record(Mutation::delete("tasks", "t-1")))
        .await
        .unwrap_err();

    assert!(matches!(err, ExecutionError::Transient(RemoteError::Transport(_))));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn rejection_is_transient() {
    let remote = MockRemote::new();
    let executor = OperationExecutor::new(remote.clone());

    let err = executor
        .execute(&record(Mutation::update("tasks", "missing", task("x"))))
        .await
        .unwrap_err();

    assert!(matches!(err, ExecutionError::Transient(RemoteError::Rejected(_))));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn unsupported_kind_makes_no_call() {
    let remote = MockRemote::new();
    let executor = OperationExecutor::new(remote.clone());

    let mut rec = record(Mutation::delete("tasks", "t-1"));
    rec.kind = MutationKind::Unsupported("archive".into());

    let err = executor.execute(&rec).await.unwrap_err();
    assert_eq!(err, ExecutionError::UnsupportedOperation("archive".into()));
    assert!(!err.is_retryable());
    assert!(remote.calls().is_empty());
}

#[parameterized(
    update_without_id = { MutationKind::Update, None, Some(json!({"nombre": "x"})) },
    update_without_payload = { MutationKind::Update, Some("t-1"), None },
    delete_without_id = { MutationKind::Delete, None, None },
    create_without_payload = { MutationKind::Create, None, None },
)]
fn invalid_record_makes_no_call(
    kind: MutationKind,
    document_id: Option<&str>,
    payload: Option<serde_json::Value>,
) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let remote = MockRemote::new();
    let executor = OperationExecutor::new(remote.clone());

    let rec = MutationRecord {
        id: OperationId::new(1000, 0, 1),
        kind,
        collection: "tasks".into(),
        document_id: document_id.map(String::from),
        payload: payload.map(doc),
        attempts: 0,
    };

    let err = rt.block_on(executor.execute(&rec)).unwrap_err();
    assert!(matches!(err, ExecutionError::InvalidRecord(_)));
    assert!(!err.is_retryable());
    assert!(remote.calls().is_empty());
}
