//! # File Store
//!
//! Flat JSON array of entries on local disk. Used when no key-value store is
//! configured, and as the fallback when it fails.
//!
//! Appends are read-modify-write of the whole file, held under a mutex so two
//! requests in this process never interleave. An existing file that is not a
//! JSON array is left untouched and the append fails.
use std::{io::ErrorKind, path::PathBuf};

use serde_json::Value;
use tokio::{fs, sync::Mutex};
use tracing::{info, warn};

use crate::{error::StorageError, survey::Submission};

pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub async fn append(&self, entry: &Submission) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;

        let mut raw = self.read_raw().await?;
        raw.push(serde_json::to_value(entry)?);

        fs::write(&self.path, serde_json::to_string_pretty(&raw)?).await?;

        #[cfg(feature = "verbose")]
        info!("Wrote {} entries to {}", raw.len(), self.path.display());

        Ok(())
    }

    /// Every well-formed entry in the file. A missing or unreadable file is
    /// treated as empty.
    pub async fn load_all(&self) -> Vec<Submission> {
        let raw = match self.read_raw().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to read {}: {e}", self.path.display());
                return Vec::new();
            }
        };

        raw.into_iter()
            .enumerate()
            .filter_map(|(index, value)| {
                serde_json::from_value(value)
                    .map_err(|e| warn!("Skipping malformed entry {index}: {e}"))
                    .ok()
            })
            .collect()
    }

    async fn read_raw(&self) -> Result<Vec<Value>, StorageError> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("{} does not exist yet, starting empty", self.path.display());
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }
}
