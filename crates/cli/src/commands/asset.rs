// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Static asset cache commands.

use std::io::Write;
use std::time::Duration;

use super::{runtime, Workspace};
use crate::assets::{
    AssetRequest, AssetWorker, CacheStorage, Fetcher, HttpFetcher, Interception,
};
use crate::config::{cache_dir, AssetsConfig, RemoteConfig};
use crate::error::Result;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the worker described by the asset config.
pub(crate) fn build_worker<F: Fetcher>(
    storage: CacheStorage,
    fetcher: F,
    assets: &AssetsConfig,
    remote: &RemoteConfig,
) -> AssetWorker<F> {
    let mut bypass = assets.bypass.clone();
    if let Some(host) = remote.host() {
        bypass.push(host.to_string());
    }
    AssetWorker::new(storage, fetcher, &assets.origin)
        .with_cache_name(&assets.cache_name)
        .with_precache(assets.precache.clone())
        .with_offline_page(&assets.offline_page)
        .with_bypass(bypass)
}

fn open_worker(ws: &Workspace) -> Result<AssetWorker<HttpFetcher>> {
    let storage = CacheStorage::open(cache_dir(&ws.work_dir))?;
    let fetcher = HttpFetcher::new(FETCH_TIMEOUT)?;
    Ok(build_worker(
        storage,
        fetcher,
        &ws.config.assets,
        &ws.config.remote,
    ))
}

pub fn install() -> Result<()> {
    let ws = Workspace::open()?;
    let worker = open_worker(&ws)?;
    let count = runtime()?.block_on(worker.install())?;
    println!("Cached {} asset(s) in {}", count, worker.cache_name());
    Ok(())
}

pub fn activate() -> Result<()> {
    let ws = Workspace::open()?;
    let deleted = open_worker(&ws)?.activate()?;
    if deleted.is_empty() {
        println!("No stale caches");
    }
    for name in deleted {
        println!("Deleted cache {}", name);
    }
    Ok(())
}

/// Writes the body to stdout and the status line to stderr.
pub fn get(path: String, navigate: bool) -> Result<()> {
    let ws = Workspace::open()?;
    let worker = open_worker(&ws)?;
    let request = if navigate {
        AssetRequest::navigate(path)
    } else {
        AssetRequest::get(path)
    };

    match runtime()?.block_on(worker.handle(&request)) {
        Interception::Bypass => {
            eprintln!("{}: not cached (backend service)", worker.resolve(&request.url));
        }
        Interception::Respond(response) => {
            eprintln!("{} {}", response.status, response.status_text);
            std::io::stdout().write_all(&response.body)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "asset_tests.rs"]
mod tests;
