//! # Redis
//!
//! Optional key-value store for submissions.
//!
//! ## Layout
//!
//! - `submissions_count`: number of submission keys handed out so far
//! - `submission_<n>`: JSON encoded entry, `n` in `0..submissions_count`
//!
//! ## Writes
//!
//! The counter is bumped with `INCR` before the entry is written, so
//! concurrent submits always claim distinct keys. A write that fails after the
//! bump leaves a gap, which readers skip like any other missing entry.
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use tracing::warn;

use crate::{error::StorageError, survey::Submission};

pub const COUNT_KEY: &str = "submissions_count";

pub fn submission_key(index: u64) -> String {
    format!("submission_{index}")
}

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, StorageError> {
    let config = ConnectionManagerConfig::new().set_number_of_retries(1);

    let client = Client::open(redis_url)?;
    let connection_manager = client.get_connection_manager_with_config(config).await?;

    Ok(connection_manager)
}

#[derive(Clone)]
pub struct KvStore {
    connection: ConnectionManager,
}

impl KvStore {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }

    pub async fn append(&self, entry: &Submission) -> Result<(), StorageError> {
        let mut connection = self.connection.clone();
        let payload = serde_json::to_string(entry)?;

        let count: i64 = connection.incr(COUNT_KEY, 1).await?;
        let _: () = connection.set(submission_key(claimed_index(count)?), payload).await?;

        Ok(())
    }

    pub async fn load_all(&self) -> Result<Vec<Submission>, StorageError> {
        let mut connection = self.connection.clone();

        let count: Option<i64> = connection.get(COUNT_KEY).await?;
        let count = count.map_or(0, |count| count.max(0) as u64);

        if count == 0 {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = (0..count).map(submission_key).collect();
        let values: Vec<Option<String>> = connection.mget(&keys).await?;

        Ok(decode_entries(keys.iter().zip(values)))
    }
}

/// Key index claimed by an `INCR` that returned `count`. Anything below 1
/// means the counter was tampered with.
fn claimed_index(count: i64) -> Result<u64, StorageError> {
    count
        .checked_sub(1)
        .and_then(|index| u64::try_from(index).ok())
        .ok_or(StorageError::Counter(count))
}

fn decode_entries<'a, I>(pairs: I) -> Vec<Submission>
where
    I: IntoIterator<Item = (&'a String, Option<String>)>,
{
    pairs
        .into_iter()
        .filter_map(|(key, value)| {
            let value = value?;

            serde_json::from_str(&value)
                .map_err(|e| warn!("Skipping malformed {key}: {e}"))
                .ok()
        })
        .collect()
}
