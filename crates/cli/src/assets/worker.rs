// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::{
    AssetError, AssetRequest, AssetResponse, Cache, CacheStorage, Fetcher, Interception,
};

/// Versioned name of the current cache.
pub const DEFAULT_CACHE_NAME: &str = "tareas-app-v1";

/// URL fragments of backend services that are never cached.
pub const DEFAULT_BYPASS: &[&str] = &["firebasestorage", "firestore", "imgbb.com", "firebase"];

/// App shell paths fetched on install.
pub const DEFAULT_PRECACHE: &[&str] = &["/", "/index1.html", "/manifest.json"];

/// Page served to navigations that are neither reachable nor cached.
pub const DEFAULT_OFFLINE_PAGE: &str = "/index.html";

/// Network-first cache for the app's static assets.
pub struct AssetWorker<F: Fetcher> {
    cache_name: String,
    storage: CacheStorage,
    fetcher: F,
    bypass: Vec<String>,
    precache: Vec<String>,
    offline_page: String,
    origin: String,
}

impl<F: Fetcher> AssetWorker<F> {
    /// Creates a worker with the default cache name, bypass list, precache
    /// list and offline page. Relative paths resolve against `origin`.
    pub fn new(storage: CacheStorage, fetcher: F, origin: impl Into<String>) -> Self {
        AssetWorker {
            cache_name: DEFAULT_CACHE_NAME.to_string(),
            storage,
            fetcher,
            bypass: DEFAULT_BYPASS.iter().map(|s| s.to_string()).collect(),
            precache: DEFAULT_PRECACHE.iter().map(|s| s.to_string()).collect(),
            offline_page: DEFAULT_OFFLINE_PAGE.to_string(),
            origin: origin.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn with_cache_name(mut self, name: impl Into<String>) -> Self {
        self.cache_name = name.into();
        self
    }

    pub fn with_precache(mut self, paths: Vec<String>) -> Self {
        self.precache = paths;
        self
    }

    /// Adds patterns to the bypass list.
    pub fn with_bypass(mut self, patterns: impl IntoIterator<Item = String>) -> Self {
        self.bypass
            .extend(patterns.into_iter().filter(|p| !p.is_empty()));
        self
    }

    pub fn with_offline_page(mut self, path: impl Into<String>) -> Self {
        self.offline_page = path.into();
        self
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Resolves a path against the origin. Absolute URLs are kept.
    pub fn resolve(&self, path: &str) -> String {
        if path.contains("://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.origin, path)
        } else {
            format!("{}/{}", self.origin, path)
        }
    }

    /// Fetches every precache path into the current cache.
    ///
    /// Fails on the first path that cannot be fetched or does not answer
    /// `200`; entries stored before the failure are kept.
    pub async fn install(&self) -> Result<usize, AssetError> {
        let cache = self.cache()?;
        for path in &self.precache {
            let url = self.resolve(path);
            let response = self
                .fetcher
                .fetch(&url)
                .await
                .map_err(|e| AssetError::Precache {
                    url: url.clone(),
                    reason: e.to_string(),
                })?;
            if !response.is_ok() {
                return Err(AssetError::Precache {
                    url,
                    reason: format!("status {} {}", response.status, response.status_text),
                });
            }
            cache.put(&url, &response)?;
            tracing::debug!(%url, "precached");
        }
        tracing::info!(cache = %self.cache_name, count = self.precache.len(), "installed");
        Ok(self.precache.len())
    }

    /// Deletes every cache except the current one. Returns the deleted names.
    pub fn activate(&self) -> Result<Vec<String>, AssetError> {
        let mut deleted = Vec::new();
        for name in self.storage.cache_names()? {
            if name != self.cache_name {
                tracing::info!(cache = %name, "deleting stale cache");
                self.storage.delete(&name)?;
                deleted.push(name);
            }
        }
        Ok(deleted)
    }

    /// Returns true if `url` targets a backend service.
    pub fn bypasses(&self, url: &str) -> bool {
        self.bypass.iter().any(|pattern| url.contains(pattern.as_str()))
    }

    /// Answers a request network-first.
    ///
    /// Cache storage failures are logged and treated as misses.
    pub async fn handle(&self, request: &AssetRequest) -> Interception {
        let url = self.resolve(&request.url);
        if self.bypasses(&url) {
            return Interception::Bypass;
        }

        let cache = match self.cache() {
            Ok(cache) => Some(cache),
            Err(e) => {
                tracing::warn!(cache = %self.cache_name, "cache unavailable: {}", e);
                None
            }
        };

        match self.fetcher.fetch(&url).await {
            Ok(response) => {
                if response.is_ok() {
                    if let Some(cache) = &cache {
                        if let Err(e) = cache.put(&url, &response) {
                            tracing::warn!(%url, "failed to cache response: {}", e);
                        }
                    }
                }
                Interception::Respond(response)
            }
            Err(e) => {
                tracing::debug!(%url, "network failed, falling back to cache: {}", e);
                let cached = cache.as_ref().and_then(|c| lookup(c, &url));
                if let Some(response) = cached {
                    return Interception::Respond(response);
                }
                if request.navigate {
                    let page = self.resolve(&self.offline_page);
                    if let Some(response) = cache.as_ref().and_then(|c| lookup(c, &page)) {
                        return Interception::Respond(response);
                    }
                }
                Interception::Respond(AssetResponse::unavailable())
            }
        }
    }

    fn cache(&self) -> Result<Cache, AssetError> {
        self.storage.open_cache(&self.cache_name)
    }
}

fn lookup(cache: &Cache, url: &str) -> Option<AssetResponse> {
    match cache.get(url) {
        Ok(entry) => entry,
        Err(e) => {
            tracing::warn!(%url, "unreadable cache entry: {}", e);
            None
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
