// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::commands::testing::{today, TestContext};
use crate::sync::test_helpers::{doc, RemoteCall};
use serde_json::json;

fn fields(nombre: &str, fecha: &str) -> TaskFields {
    TaskFields {
        nombre: Some(nombre.to_string()),
        fecha: Some(fecha.to_string()),
        ..TaskFields::default()
    }
}

#[tokio::test]
async fn add_queues_create_and_syncs() {
    let ctx = TestContext::new();
    let manager = ctx.manager(false);

    add_impl::<_, tareas_core::FileStore>(
        &manager,
        ctx.collection(),
        fields("Pagar renta", "2026-03-05"),
        Some("renta-marzo".into()),
        None,
        today(),
    )
    .unwrap();
    assert!(manager.has_pending_for("renta-marzo"));

    manager.set_online(true);
    manager.sync_now().await;

    assert_eq!(
        ctx.remote.document("tasks", "renta-marzo").unwrap(),
        doc(json!({
            "nombre": "Pagar renta",
            "fecha": "2026-03-05",
            "descripcion": "",
            "urlImagenes": []
        }))
    );
}

#[test]
fn add_rejects_invalid_fields_without_queueing() {
    let ctx = TestContext::new();
    let manager = ctx.manager(false);

    let result = add_impl::<_, tareas_core::FileStore>(
        &manager,
        ctx.collection(),
        fields("Pagar renta", "2026-02-01"),
        None,
        None,
        today(),
    );
    assert!(matches!(result, Err(Error::DateInPast { .. })));
    assert_eq!(manager.pending_count(), 0);
}

#[test]
fn add_from_draft_fills_missing_fields_and_clears_draft() {
    let ctx = TestContext::new();
    let drafts = ctx.drafts();
    drafts
        .save(doc(json!({
            "nombre": "Borrador",
            "fecha": "2026-03-10",
            "descripcion": "de ayer"
        })))
        .unwrap();
    let manager = ctx.manager(false);

    let given = TaskFields {
        nombre: Some("Pagar renta".into()),
        ..TaskFields::default()
    };
    add_impl(
        &manager,
        ctx.collection(),
        given,
        None,
        Some(&drafts),
        today(),
    )
    .unwrap();

    let payload = manager.pending()[0].payload.clone().unwrap();
    assert_eq!(payload["nombre"], "Pagar renta");
    assert_eq!(payload["fecha"], "2026-03-10");
    assert_eq!(payload["descripcion"], "de ayer");
    assert!(!drafts.has_draft());
}

#[test]
fn add_from_missing_draft_fails() {
    let ctx = TestContext::new();
    let manager = ctx.manager(false);
    let result = add_impl(
        &manager,
        ctx.collection(),
        TaskFields::default(),
        None,
        Some(&ctx.drafts()),
        today(),
    );
    assert!(matches!(result, Err(Error::NoDraft)));
}

#[tokio::test]
async fn edit_then_rm_run_in_order() {
    let ctx = TestContext::new();
    let manager = ctx.manager(false);

    add_impl::<_, tareas_core::FileStore>(
        &manager,
        ctx.collection(),
        fields("Pagar renta", "2026-03-05"),
        Some("t-1".into()),
        None,
        today(),
    )
    .unwrap();
    edit_impl(
        &manager,
        ctx.collection(),
        "t-1",
        TaskFields {
            descripcion: Some("Transferir".into()),
            ..TaskFields::default()
        },
        today(),
    )
    .unwrap();
    rm_impl(&manager, ctx.collection(), "t-1").unwrap();

    manager.set_online(true);
    manager.sync_now().await;

    let calls = ctx.remote.calls();
    assert_eq!(calls.len(), 3);
    assert!(matches!(&calls[0], RemoteCall::Create { id: Some(id), .. } if id == "t-1"));
    assert_eq!(
        calls[1],
        RemoteCall::Update {
            collection: "tasks".into(),
            id: "t-1".into(),
            data: doc(json!({"descripcion": "Transferir"})),
        }
    );
    assert!(matches!(&calls[2], RemoteCall::Delete { id, .. } if id == "t-1"));
    assert!(ctx.remote.document("tasks", "t-1").is_none());
}

#[test]
fn edit_without_changes_fails() {
    let ctx = TestContext::new();
    let manager = ctx.manager(false);
    assert!(matches!(
        edit_impl(&manager, ctx.collection(), "t-1", TaskFields::default(), today()),
        Err(Error::NothingToEdit)
    ));
}

#[test]
fn blank_ids_are_rejected() {
    let ctx = TestContext::new();
    let manager = ctx.manager(false);
    assert!(rm_impl(&manager, ctx.collection(), "  ").is_err());
    assert!(add_impl::<_, tareas_core::FileStore>(
        &manager,
        ctx.collection(),
        fields("x", "2026-03-05"),
        Some(" ".into()),
        None,
        today(),
    )
    .is_err());
    assert_eq!(manager.pending_count(), 0);
}
