// src/pipeline/dest.rs

//! Writing records out and serializing writers of the same directory.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use tokio::sync::OwnedMutexGuard;
use tracing::debug;

use crate::fs::FileSystem;
use crate::pipeline::record::FileRecord;

/// One async lock per destination directory.
///
/// Every pipeline holds the lock for its destination from the moment it
/// starts reading until its last write, and `clean-css` holds the CSS
/// directory lock while deleting. Two invocations that write the same
/// directory therefore run one after the other, while unrelated
/// directories proceed concurrently.
#[derive(Debug, Clone, Default)]
pub struct DestinationLocks {
    locks: Arc<Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>>,
}

impl DestinationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `dir`. Spellings such as `css`, `./css`
    /// and `css/` share one lock.
    pub async fn acquire(&self, dir: &Path) -> OwnedMutexGuard<()> {
        let key = lock_key(dir);
        let lock = {
            let mut map = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(key.clone()).or_default())
        };

        if lock.try_lock().is_err() {
            debug!(dir = ?key, "destination busy, waiting");
        }
        lock.lock_owned().await
    }
}

fn lock_key(dir: &Path) -> PathBuf {
    dir.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Write every record to `dest_dir/relative`, creating directories and
/// replacing existing files. Returns the written paths in order.
pub fn write_records(
    fs: &dyn FileSystem,
    dest_dir: &Path,
    records: &[FileRecord],
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(records.len());
    for record in records {
        let target = dest_dir.join(&record.relative);
        fs.write(&target, &record.contents)?;
        debug!(path = ?target, bytes = record.contents.len(), "wrote output");
        written.push(target);
    }
    Ok(written)
}
