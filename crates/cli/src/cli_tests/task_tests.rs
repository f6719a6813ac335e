// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing tests for `add`, `edit`, `rm` and `submit`.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use yare::parameterized;

#[test]
fn should_parse_add_with_all_fields() {
    let cli = parse(&[
        "tareas",
        "add",
        "Pagar renta",
        "-f",
        "2026-03-05",
        "-d",
        "Transferir al casero",
        "-i",
        "https://i.imgbb.com/a.jpg",
        "--imagen",
        "https://i.imgbb.com/b.jpg",
        "--id",
        "renta-marzo",
    ])
    .unwrap();

    let Command::Add {
        nombre,
        task,
        id,
        from_draft,
        no_sync,
    } = cli.command
    else {
        unreachable!("expected Add command");
    };
    assert_eq!(nombre.as_deref(), Some("Pagar renta"));
    assert_eq!(task.fecha.as_deref(), Some("2026-03-05"));
    assert_eq!(task.descripcion.as_deref(), Some("Transferir al casero"));
    assert_eq!(task.imagenes.len(), 2);
    assert_eq!(id.as_deref(), Some("renta-marzo"));
    assert!(!from_draft);
    assert!(!no_sync);
}

#[test]
fn should_parse_add_from_draft_without_name() {
    let cli = parse(&["tareas", "add", "--from-draft", "--no-sync"]).unwrap();
    let Command::Add {
        nombre,
        from_draft,
        no_sync,
        ..
    } = cli.command
    else {
        unreachable!("expected Add command");
    };
    assert_eq!(nombre, None);
    assert!(from_draft);
    assert!(no_sync);
}

#[parameterized(
    blank_name = { &["tareas", "add", "  "] },
    edit_without_id = { &["tareas", "edit"] },
    rm_without_id = { &["tareas", "rm"] },
    images_and_clear = { &["tareas", "edit", "t-1", "-i", "x", "--clear-images"] },
    submit_without_kind = { &["tareas", "submit"] },
)]
fn should_reject_invalid_args(args: &[&str]) {
    assert!(parse(args).is_err(), "expected {:?} to fail", args);
}

#[test]
fn should_parse_edit_fields() {
    let cli = parse(&["tareas", "edit", "t-1", "-n", "Nuevo", "--clear-images"]).unwrap();
    let Command::Edit {
        id, nombre, task, ..
    } = cli.command
    else {
        unreachable!("expected Edit command");
    };
    assert_eq!(id, "t-1");
    let fields = task.into_fields(nombre);
    assert_eq!(fields.nombre.as_deref(), Some("Nuevo"));
    assert_eq!(fields.imagenes, Some(Vec::new()));
    assert_eq!(fields.fecha, None);
}

#[test]
fn should_parse_rm() {
    let cli = parse(&["tareas", "rm", "t-9", "--no-sync"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Rm { ref id, no_sync: true } if id == "t-9"
    ));
}

#[test]
fn should_parse_submit() {
    let cli = parse(&[
        "tareas",
        "submit",
        "update",
        "-c",
        "tasks",
        "--id",
        "t-1",
        "--data",
        r#"{"descripcion":"x"}"#,
    ])
    .unwrap();
    let Command::Submit {
        kind,
        collection,
        id,
        data,
        no_sync,
    } = cli.command
    else {
        unreachable!("expected Submit command");
    };
    assert_eq!(kind, "update");
    assert_eq!(collection.as_deref(), Some("tasks"));
    assert_eq!(id.as_deref(), Some("t-1"));
    assert_eq!(data.as_deref(), Some(r#"{"descripcion":"x"}"#));
    assert!(!no_sync);
}
