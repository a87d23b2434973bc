//! # Storage
//!
//! Best-effort persistence over the two backends.
//!
//! ## Writes
//! - Key-value store when configured
//! - On key-value failure, or without one, append to the file store
//! - On file failure, either surface the error or, with lenient writes, report
//!   a received-but-unsaved submission
//!
//! ## Reads
//! - Key-value store when configured, skipped if it fails
//! - Always merged with the file store, which holds any write Redis refused
use tracing::{error, info, warn};

use crate::{
    config::Config,
    database::{KvStore, init_redis},
    error::StorageError,
    file_store::FileStore,
    survey::{Aggregate, Submission},
};

pub const READ_ONLY_MESSAGE: &str = "Submission received (read-only environment)";

#[derive(Debug, PartialEq, Eq)]
pub enum Saved {
    Stored,
    Unsaved(&'static str),
}

pub struct Storage {
    kv: Option<KvStore>,
    file: FileStore,
    lenient_writes: bool,
}

impl Storage {
    pub fn new(kv: Option<KvStore>, file: FileStore, lenient_writes: bool) -> Self {
        Self {
            kv,
            file,
            lenient_writes,
        }
    }

    pub async fn from_config(config: &Config) -> Self {
        let kv = match &config.redis_url {
            Some(url) => match init_redis(url).await {
                Ok(connection) => {
                    info!("Using Redis for submissions");
                    Some(KvStore::new(connection))
                }
                Err(e) => {
                    warn!("Redis unavailable, using file storage: {e}");
                    None
                }
            },
            None => {
                info!("REDIS_URL not set, using file storage");
                None
            }
        };

        Self::new(
            kv,
            FileStore::new(&config.data_file),
            config.lenient_writes,
        )
    }

    pub async fn save(&self, entry: &Submission) -> Result<Saved, StorageError> {
        if let Some(kv) = &self.kv {
            match kv.append(entry).await {
                Ok(()) => return Ok(Saved::Stored),
                Err(e) => error!("Redis write failed, falling back to file: {e}"),
            }
        }

        match self.file.append(entry).await {
            Ok(()) => Ok(Saved::Stored),
            Err(e) if self.lenient_writes => {
                error!("File write failed, reporting success anyway: {e}");
                Ok(Saved::Unsaved(READ_ONLY_MESSAGE))
            }
            Err(e) => Err(e),
        }
    }

    /// Redis entries followed by file entries. The file is always read since
    /// it holds every submission Redis refused, whether or not Redis is
    /// serving reads now.
    pub async fn load_all(&self) -> Vec<Submission> {
        let mut entries = match &self.kv {
            Some(kv) => match kv.load_all().await {
                Ok(entries) => {
                    info!("Loaded {} entries from Redis", entries.len());
                    entries
                }
                Err(e) => {
                    error!("Redis read failed, using file only: {e}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let from_file = self.file.load_all().await;
        info!("Loaded {} entries from file", from_file.len());
        entries.extend(from_file);

        entries
    }

    pub async fn aggregate(&self) -> Aggregate {
        Aggregate::from_entries(&self.load_all().await)
    }
}
