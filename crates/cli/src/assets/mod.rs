// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Static asset cache.
//!
//! [`AssetWorker`] sits between the app shell and the network. Requests for
//! backend services are passed through untouched; everything else is fetched
//! network-first, successful responses are cached, and the cache answers
//! while the network is down.

mod fetch;
mod storage;
mod worker;

pub use fetch::{FetchFuture, Fetcher, HttpFetcher};
pub use storage::{Cache, CacheStorage};
pub use worker::{
    AssetWorker, DEFAULT_BYPASS, DEFAULT_CACHE_NAME, DEFAULT_OFFLINE_PAGE, DEFAULT_PRECACHE,
};

use thiserror::Error;

/// Errors raised by the asset cache.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("network error: {0}")]
    Network(String),

    #[error("precache failed for {url}: {reason}")]
    Precache { url: String, reason: String },

    #[error("invalid cache name: '{0}'")]
    InvalidCacheName(String),

    #[error("corrupted cache entry: {0}")]
    CorruptedEntry(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A request seen by the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    pub url: String,
    /// Top-level page navigation, as opposed to a subresource.
    pub navigate: bool,
}

impl AssetRequest {
    pub fn get(url: impl Into<String>) -> Self {
        AssetRequest {
            url: url.into(),
            navigate: false,
        }
    }

    pub fn navigate(url: impl Into<String>) -> Self {
        AssetRequest {
            url: url.into(),
            navigate: true,
        }
    }
}

/// A response produced by the network or the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
    pub status: u16,
    pub status_text: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl AssetResponse {
    /// A `200 OK` response.
    pub fn ok(body: impl Into<Vec<u8>>, content_type: Option<&str>) -> Self {
        AssetResponse {
            status: 200,
            status_text: "OK".to_string(),
            content_type: content_type.map(String::from),
            body: body.into(),
        }
    }

    /// The response for a subresource that is neither reachable nor cached.
    pub fn unavailable() -> Self {
        AssetResponse {
            status: 503,
            status_text: "Service Unavailable".to_string(),
            content_type: Some("text/plain; charset=utf-8".to_string()),
            body: b"resource unavailable offline".to_vec(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// What the worker decided to do with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interception {
    /// Not handled; the caller goes to the network directly.
    Bypass,
    Respond(AssetResponse),
}
