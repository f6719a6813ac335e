// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    invalid_key = { Error::InvalidKey("../etc".into()), "../etc" },
    corrupted = { Error::CorruptedData("bad queue".into()), "bad queue" },
    invalid_id = { Error::InvalidOperationId("abc".into()), "abc" },
    invalid_mutation = { Error::InvalidMutation("update requires a document id".into()), "document id" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn error_quota_exceeded_display() {
    let err = Error::QuotaExceeded {
        requested: 2048,
        quota: 1024,
    };
    let msg = err.to_string();
    assert!(msg.contains("2048"));
    assert!(msg.contains("1024"));
}

#[test]
fn error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn error_from_json() {
    let json_err = serde_json::from_str::<()>("invalid").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Json(_)));
}
