//! File-backed cache of origin responses.
//!
//! The whole mapping lives in memory and is written back to a single JSON
//! file after every insert. I/O failures are logged and never propagate:
//! durability is best effort.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info};

use crate::errors::StoreError;
use crate::models::{CacheKey, CachedResponse};


type Snapshot = BTreeMap<CacheKey, CachedResponse>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No cache file yet.
    Missing,
    Loaded(usize),
    /// The file could not be read or parsed; the store kept its prior contents.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Removed,
    NothingToRemove,
    /// Memory was cleared but the file could not be deleted.
    Failed,
}

pub struct CacheStore {
    path: PathBuf,
    entries: RwLock<Snapshot>,
    // Serialises flushes so two writers never interleave in the file.
    flush: Mutex<()>,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: RwLock::new(BTreeMap::new()),
            flush: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> LoadOutcome {
        match read_snapshot(&self.path).await {
            Ok(None) => LoadOutcome::Missing,
            Ok(Some(snapshot)) => {
                let count = snapshot.len();
                *self.entries.write().await = snapshot;
                info!(path = %self.path.display(), entries = count, "cache loaded from file");
                LoadOutcome::Loaded(count)
            }
            Err(err) => {
                error!(path = %self.path.display(), error = %err, "error loading cache from file");
                LoadOutcome::Failed
            }
        }
    }

    pub async fn get(&self, key: &CacheKey) -> Option<CachedResponse> {
        self.entries.read().await.get(key).cloned()
    }

    /// Inserts or replaces `key`, then flushes the whole store. A failed
    /// flush leaves the in-memory entry in place.
    pub async fn put(&self, key: CacheKey, response: CachedResponse) {
        self.entries.write().await.insert(key, response);

        match self.save().await {
            Ok(()) => debug!(path = %self.path.display(), "cache saved to file"),
            Err(err) => error!(error = %err, "error saving cache to file"),
        }
    }

    pub async fn save(&self) -> Result<(), StoreError> {
        let _flush = self.flush.lock().await;
        let data = {
            let entries = self.entries.read().await;
            serde_json::to_string_pretty(&*entries)?
        };
        write_atomically(&self.path, data.as_bytes()).await
    }

    pub async fn clear(&self) -> ClearOutcome {
        self.entries.write().await.clear();

        let outcome = match fs::remove_file(&self.path).await {
            Ok(()) => {
                info!(path = %self.path.display(), "cache file deleted");
                ClearOutcome::Removed
            }
            Err(err) if err.kind() == ErrorKind::NotFound => ClearOutcome::NothingToRemove,
            Err(source) => {
                let err = StoreError::Remove {
                    path: self.path.clone(),
                    source,
                };
                error!(error = %err, "error deleting cache file");
                ClearOutcome::Failed
            }
        };
        info!("cache cleared");
        outcome
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

async fn read_snapshot(path: &Path) -> Result<Option<Snapshot>, StoreError> {
    let data = match fs::read_to_string(path).await {
        Ok(data) => data,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    Ok(Some(serde_json::from_str(&data)?))
}

async fn write_atomically(path: &Path, data: &[u8]) -> Result<(), StoreError> {
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp = temp_path(path);
    if let Err(source) = fs::write(&tmp, data).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(write_err(source));
    }
    if let Err(source) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(write_err(source));
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_else(|| path.as_os_str()));
    name.push(".tmp");
    path.with_file_name(name)
}
