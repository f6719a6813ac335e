// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk cache storage.
//!
//! Layout: `<root>/<cache name>/<sha256(url)>.json` holds the response
//! metadata and `<sha256(url)>.body` the raw body.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{AssetError, AssetResponse};

/// A directory of named caches.
#[derive(Debug, Clone)]
pub struct CacheStorage {
    root: PathBuf,
}

impl CacheStorage {
    pub fn open(root: impl AsRef<Path>) -> Result<Self, AssetError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(CacheStorage { root })
    }

    /// Opens (creating if needed) the cache called `name`.
    pub fn open_cache(&self, name: &str) -> Result<Cache, AssetError> {
        let dir = self.cache_dir(name)?;
        fs::create_dir_all(&dir)?;
        Ok(Cache { dir })
    }

    /// Lists existing cache names, sorted.
    pub fn cache_names(&self) -> Result<Vec<String>, AssetError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Deletes the cache called `name`. Returns false if it did not exist.
    pub fn delete(&self, name: &str) -> Result<bool, AssetError> {
        let dir = self.cache_dir(name)?;
        match fs::remove_dir_all(&dir) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn cache_dir(&self, name: &str) -> Result<PathBuf, AssetError> {
        tareas_core::kv::validate_key(name)
            .map_err(|_| AssetError::InvalidCacheName(name.to_string()))?;
        Ok(self.root.join(name))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct EntryMeta {
    url: String,
    status: u16,
    status_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    stored_at: DateTime<Utc>,
}

/// One named cache.
#[derive(Debug, Clone)]
pub struct Cache {
    dir: PathBuf,
}

/// Hex SHA-256 of a URL, used as the entry file stem.
pub(crate) fn entry_key(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}

impl Cache {
    /// Stores `response` under `url`, replacing any previous entry.
    pub fn put(&self, url: &str, response: &AssetResponse) -> Result<(), AssetError> {
        let key = entry_key(url);
        let meta = EntryMeta {
            url: url.to_string(),
            status: response.status,
            status_text: response.status_text.clone(),
            content_type: response.content_type.clone(),
            stored_at: Utc::now(),
        };

        // Body first: a readable metadata file implies a complete body.
        write_atomic(&self.dir.join(format!("{key}.body")), &response.body)?;
        write_atomic(
            &self.dir.join(format!("{key}.json")),
            serde_json::to_string(&meta)?.as_bytes(),
        )?;
        Ok(())
    }

    /// Returns the entry stored under `url`.
    pub fn get(&self, url: &str) -> Result<Option<AssetResponse>, AssetError> {
        let key = entry_key(url);
        let meta = match fs::read_to_string(self.dir.join(format!("{key}.json"))) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let meta: EntryMeta = serde_json::from_str(&meta)
            .map_err(|e| AssetError::CorruptedEntry(format!("{url}: {e}")))?;
        if meta.url != url {
            return Err(AssetError::CorruptedEntry(format!(
                "{url}: entry belongs to {}",
                meta.url
            )));
        }

        let body = fs::read(self.dir.join(format!("{key}.body")))?;
        Ok(Some(AssetResponse {
            status: meta.status,
            status_text: meta.status_text,
            content_type: meta.content_type,
            body,
        }))
    }

    /// Lists cached URLs, sorted.
    pub fn urls(&self) -> Result<Vec<String>, AssetError> {
        let mut urls = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let meta: EntryMeta = serde_json::from_str(&fs::read_to_string(&path)?)
                    .map_err(|e| AssetError::CorruptedEntry(format!("{}: {e}", path.display())))?;
                urls.push(meta.url);
            }
        }
        urls.sort();
        Ok(urls)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), AssetError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut file = File::create(&tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "storage_tests.rs"]
mod tests;
