// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::TempDir;
use yare::parameterized;

#[test]
fn put_then_get_returns_the_stored_response() {
    let temp = TempDir::new().unwrap();
    let cache = CacheStorage::open(temp.path())
        .unwrap()
        .open_cache("tareas-app-v1")
        .unwrap();

    let response = AssetResponse::ok("<html></html>", Some("text/html"));
    cache.put("http://localhost/index.html", &response).unwrap();

    assert_eq!(
        cache.get("http://localhost/index.html").unwrap(),
        Some(response)
    );
    assert_eq!(cache.get("http://localhost/other").unwrap(), None);
}

#[test]
fn put_replaces_previous_entry() {
    let temp = TempDir::new().unwrap();
    let cache = CacheStorage::open(temp.path())
        .unwrap()
        .open_cache("v1")
        .unwrap();

    cache.put("/", &AssetResponse::ok("old", None)).unwrap();
    cache.put("/", &AssetResponse::ok("new", None)).unwrap();

    assert_eq!(cache.get("/").unwrap().unwrap().body, b"new");
    assert_eq!(cache.urls().unwrap(), vec!["/".to_string()]);
}

#[test]
fn entries_survive_reopen() {
    let temp = TempDir::new().unwrap();
    CacheStorage::open(temp.path())
        .unwrap()
        .open_cache("v1")
        .unwrap()
        .put("/manifest.json", &AssetResponse::ok("{}", Some("application/json")))
        .unwrap();

    let cache = CacheStorage::open(temp.path())
        .unwrap()
        .open_cache("v1")
        .unwrap();
    let entry = cache.get("/manifest.json").unwrap().unwrap();
    assert_eq!(entry.content_type.as_deref(), Some("application/json"));
}

#[test]
fn entry_key_is_sha256_hex() {
    assert_eq!(
        entry_key(""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn corrupt_metadata_is_reported() {
    let temp = TempDir::new().unwrap();
    let cache = CacheStorage::open(temp.path())
        .unwrap()
        .open_cache("v1")
        .unwrap();
    cache.put("/", &AssetResponse::ok("x", None)).unwrap();
    fs::write(temp.path().join("v1").join(format!("{}.json", entry_key("/"))), "nope").unwrap();

    assert!(matches!(cache.get("/"), Err(AssetError::CorruptedEntry(_))));
}

#[test]
fn cache_names_and_delete() {
    let temp = TempDir::new().unwrap();
    let storage = CacheStorage::open(temp.path()).unwrap();
    storage.open_cache("tareas-app-v1").unwrap();
    storage.open_cache("tareas-app-v0").unwrap();

    assert_eq!(
        storage.cache_names().unwrap(),
        vec!["tareas-app-v0".to_string(), "tareas-app-v1".to_string()]
    );
    assert!(storage.delete("tareas-app-v0").unwrap());
    assert!(!storage.delete("tareas-app-v0").unwrap());
    assert_eq!(storage.cache_names().unwrap(), vec!["tareas-app-v1".to_string()]);
}

#[parameterized(
    parent = { ".." },
    hidden = { ".cache" },
    slash = { "a/b" },
    empty = { "" },
)]
fn invalid_cache_names_are_rejected(name: &str) {
    let temp = TempDir::new().unwrap();
    let storage = CacheStorage::open(temp.path()).unwrap();
    assert!(matches!(
        storage.open_cache(name),
        Err(AssetError::InvalidCacheName(_))
    ));
}
