// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.tareas/config.toml`:
//! - `collection`: remote collection tasks are written to (default `tasks`)
//! - `[remote]`: document store URL and network timeouts
//! - `[retry]`: backoff between failed sync passes
//! - `[assets]`: static asset cache settings
//!
//! Runtime state (the queue, drafts and asset caches) lives next to it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::assets::{DEFAULT_CACHE_NAME, DEFAULT_OFFLINE_PAGE, DEFAULT_PRECACHE};
use crate::error::{Error, Result};
use crate::sync::RetryPolicy;

const WORK_DIR_NAME: &str = ".tareas";
const CONFIG_FILE_NAME: &str = "config.toml";
const STATE_DIR_NAME: &str = "state";
const CACHE_DIR_NAME: &str = "cache";
const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Default remote collection for tasks.
pub const DEFAULT_COLLECTION: &str = "tasks";

/// Default document store address.
pub const DEFAULT_REMOTE_URL: &str = "ws://127.0.0.1:7890";

/// Project configuration stored in `.tareas/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            collection: default_collection(),
            remote: RemoteConfig::default(),
            retry: RetryConfig::default(),
            assets: AssetsConfig::default(),
        }
    }
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

/// Remote document store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// WebSocket URL (`ws://` or `wss://`).
    #[serde(default = "default_remote_url")]
    pub url: String,
    /// Max time for one request/response exchange in milliseconds (default: 10000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Max time for a reachability probe in milliseconds (default: 3000).
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    /// Seconds between reachability probes in `watch` (default: 15).
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            url: default_remote_url(),
            request_timeout_ms: default_request_timeout_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
            probe_interval_secs: default_probe_interval_secs(),
        }
    }
}

fn default_remote_url() -> String {
    DEFAULT_REMOTE_URL.to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_probe_timeout_ms() -> u64 {
    3_000
}

fn default_probe_interval_secs() -> u64 {
    15
}

impl RemoteConfig {
    /// Validates that the URL is a WebSocket URL.
    ///
    /// Returns an error message if the URL is invalid.
    pub fn validate_url(&self) -> Option<String> {
        let rest = self
            .url
            .strip_prefix("ws://")
            .or_else(|| self.url.strip_prefix("wss://"));
        match rest {
            Some(rest) if !rest.is_empty() => None,
            Some(_) => Some(format!("invalid remote URL '{}': missing host", self.url)),
            None => Some(format!(
                "invalid remote URL '{}': must be ws:// or wss://",
                self.url
            )),
        }
    }

    /// Returns the `host[:port]` part of the URL.
    pub fn host(&self) -> Option<&str> {
        let rest = self.url.split_once("://").map(|(_, rest)| rest)?;
        let host = rest.split(['/', '?']).next().unwrap_or_default();
        (!host.is_empty()).then_some(host)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs.max(1))
    }
}

/// Backoff between failed sync passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Schedule another pass after a failed one (default: true).
    #[serde(default = "default_auto_retry")]
    pub auto_retry: bool,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Attempts before an operation is moved to the dead letters (default: unlimited).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            auto_retry: default_auto_retry(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            max_attempts: None,
        }
    }
}

fn default_auto_retry() -> bool {
    true
}

fn default_initial_delay_ms() -> u64 {
    1_000
}

fn default_max_delay_ms() -> u64 {
    60_000
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            auto_retry: self.auto_retry,
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms.max(self.initial_delay_ms)),
            max_attempts: self.max_attempts,
        }
    }
}

/// Static asset cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Versioned cache name; caches with any other name are deleted on activate.
    #[serde(default = "default_cache_name")]
    pub cache_name: String,
    /// Origin the app shell is served from.
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_precache")]
    pub precache: Vec<String>,
    /// Extra URL fragments that bypass the cache.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bypass: Vec<String>,
    #[serde(default = "default_offline_page")]
    pub offline_page: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        AssetsConfig {
            cache_name: default_cache_name(),
            origin: default_origin(),
            precache: default_precache(),
            bypass: Vec::new(),
            offline_page: default_offline_page(),
        }
    }
}

fn default_cache_name() -> String {
    DEFAULT_CACHE_NAME.to_string()
}

fn default_origin() -> String {
    "http://localhost:8080".to_string()
}

fn default_precache() -> Vec<String> {
    DEFAULT_PRECACHE.iter().map(|s| s.to_string()).collect()
}

fn default_offline_page() -> String {
    DEFAULT_OFFLINE_PAGE.to_string()
}

impl Config {
    /// Loads configuration from the given `.tareas/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        if let Some(msg) = config.remote.validate_url() {
            return Err(Error::Config(msg));
        }
        if config.collection.trim().is_empty() {
            return Err(Error::Config("collection cannot be empty".to_string()));
        }
        Ok(config)
    }

    /// Saves configuration to the given `.tareas/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }
}

/// Find the .tareas directory by walking up from the current directory.
pub fn find_work_dir() -> Result<PathBuf> {
    find_work_dir_from(&std::env::current_dir()?)
}

/// Find the .tareas directory by walking up from `start`.
pub fn find_work_dir_from(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Initialize a new .tareas directory at the given path.
pub fn init_work_dir(path: &Path, remote_url: Option<&str>) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    let mut config = Config::default();
    if let Some(url) = remote_url {
        config.remote.url = url.to_string();
    }
    if let Some(msg) = config.remote.validate_url() {
        return Err(Error::Config(msg));
    }

    fs::create_dir_all(&work_dir)?;
    config.save(&work_dir)?;
    write_gitignore(&work_dir)?;

    Ok(work_dir)
}

/// Directory holding the queue and drafts.
pub fn state_dir(work_dir: &Path) -> PathBuf {
    work_dir.join(STATE_DIR_NAME)
}

/// Directory holding the asset caches.
pub fn cache_dir(work_dir: &Path) -> PathBuf {
    work_dir.join(CACHE_DIR_NAME)
}

/// Write a .gitignore that keeps runtime state out of version control.
pub fn write_gitignore(work_dir: &Path) -> Result<()> {
    let content = "# Queue and drafts\nstate/\n\n# Asset caches\ncache/\n";
    fs::write(work_dir.join(GITIGNORE_FILE_NAME), content)?;
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
