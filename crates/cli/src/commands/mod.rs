// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod asset;
pub mod draft;
pub mod init;
pub mod queue;
pub mod submit;
pub mod sync;
pub mod task;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use tareas_core::id::node_id_from_seed;
use tareas_core::{DraftStore, FileStore};

use crate::config::{find_work_dir, state_dir, Config};
use crate::error::{Error, Result};
use crate::sync::{
    DrainOutcome, EngineConfig, OfflineManager, ReachabilityProbe, RemoteProbe, RemoteStore,
    WebSocketRemote,
};

const LOCK_FILE_NAME: &str = "queue.lock";

/// An initialized `.tareas/` directory and its configuration.
pub struct Workspace {
    pub work_dir: PathBuf,
    pub config: Config,
}

impl Workspace {
    /// Finds the workspace by walking up from the current directory.
    pub fn open() -> Result<Self> {
        Self::at(find_work_dir()?)
    }

    pub fn at(work_dir: PathBuf) -> Result<Self> {
        let config = Config::load(&work_dir)?;
        Ok(Workspace { work_dir, config })
    }

    /// Key-value store for the queue and drafts.
    pub fn state_store(&self) -> Result<FileStore> {
        Ok(FileStore::open(state_dir(&self.work_dir))?)
    }

    /// Takes the queue lock. Held until the returned file is dropped.
    pub fn lock(&self) -> Result<File> {
        use fs2::FileExt;

        let dir = state_dir(&self.work_dir);
        std::fs::create_dir_all(&dir)?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE_NAME))?;

        file.try_lock_exclusive()
            .map_err(|e| Error::QueueLocked(e.to_string()))?;

        Ok(file)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            node_id: node_id_from_seed(&self.work_dir),
            retry: self.config.retry.policy(),
            ..EngineConfig::default()
        }
    }

    pub fn remote(&self) -> WebSocketRemote {
        WebSocketRemote::new(&self.config.remote.url, self.config.remote.request_timeout())
    }

    pub fn probe(&self) -> RemoteProbe {
        RemoteProbe::new(&self.config.remote.url, self.config.remote.probe_timeout())
    }

    /// Opens the offline queue against `remote`.
    pub fn open_manager<R: RemoteStore + 'static>(
        &self,
        remote: R,
        online: bool,
    ) -> Result<OfflineManager<R>> {
        Ok(OfflineManager::open(
            self.state_store()?,
            remote,
            self.engine_config(),
            online,
        ))
    }

    pub fn drafts(&self) -> Result<DraftStore<FileStore>> {
        Ok(DraftStore::new(self.state_store()?))
    }
}

/// Builds the runtime async commands run on.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Runtime::new()?)
}

/// Checks reachability, then drains if the remote answered.
pub async fn sync_if_reachable<R, P>(manager: &OfflineManager<R>, probe: &P) -> DrainOutcome
where
    R: RemoteStore + 'static,
    P: ReachabilityProbe,
{
    manager.set_online(probe.check().await);
    manager.sync_now().await
}

/// One-line summary of a drain attempt.
pub fn describe_outcome(outcome: &DrainOutcome, pending: usize) -> String {
    match outcome {
        DrainOutcome::Offline => format!("Offline: {pending} operation(s) waiting"),
        DrainOutcome::Empty => "Nothing to sync".to_string(),
        DrainOutcome::Coalesced => "A sync is already running".to_string(),
        DrainOutcome::Completed(report) if report.failed == 0 => {
            format!("Synced {} operation(s)", report.succeeded)
        }
        DrainOutcome::Completed(report) => format!(
            "Synced {} operation(s), {} failed, {pending} waiting",
            report.succeeded, report.failed
        ),
    }
}

/// Runs `f` against the locked queue, then, unless `no_sync`, tries to
/// deliver whatever is pending.
pub fn with_queue<T>(
    ws: &Workspace,
    no_sync: bool,
    f: impl FnOnce(&OfflineManager) -> Result<T>,
) -> Result<T> {
    let _lock = ws.lock()?;
    let manager = ws.open_manager(ws.remote(), false)?;
    let value = f(&manager)?;

    if !no_sync {
        let rt = runtime()?;
        let outcome = rt.block_on(sync_if_reachable(&manager, &ws.probe()));
        println!("{}", describe_outcome(&outcome, manager.pending_count()));
    }
    Ok(value)
}
