// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing tests for the `init` command.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    bare = { &["tareas", "init"], None, None },
    remote = { &["tareas", "init", "--remote", "wss://sync.example.com"], Some("wss://sync.example.com"), None },
    path = { &["tareas", "init", "--path", "/tmp/lista"], None, Some("/tmp/lista") },
    both = { &["tareas", "init", "--remote", "ws://localhost:7890", "--path", "."], Some("ws://localhost:7890"), Some(".") },
)]
fn should_parse_init_args(args: &[&str], remote: Option<&str>, path: Option<&str>) {
    let cli = parse(args).unwrap();
    match cli.command {
        Command::Init {
            remote: r,
            path: p,
        } => {
            assert_eq!(r.as_deref(), remote, "remote mismatch for {:?}", args);
            assert_eq!(p.as_deref(), path, "path mismatch for {:?}", args);
        }
        _ => unreachable!("expected Init command"),
    }
}
