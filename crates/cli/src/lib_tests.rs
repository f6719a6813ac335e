// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use clap::Parser;
use yare::parameterized;

#[parameterized(
    quiet_command = { &["tareas", "pending"], "warn" },
    watch = { &["tareas", "watch"], "info" },
    verbose = { &["tareas", "sync", "--verbose"], "debug" },
    verbose_watch = { &["tareas", "watch", "--verbose"], "debug" },
)]
fn log_level_per_command(args: &[&str], expected: &str) {
    let cli = Cli::try_parse_from(args).unwrap();
    assert_eq!(default_log_level(&cli.command, cli.verbose), expected);
}
