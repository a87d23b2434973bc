use std::{env, fmt::Display, fs::read_to_string, path::PathBuf, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub redis_url: Option<String>,
    pub data_file: PathBuf,
    pub static_dir: PathBuf,
    pub lenient_writes: bool,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "1111"),
            redis_url: read_secret("REDIS_URL").or_else(|| var("REDIS_URL")),
            data_file: try_load("DATA_FILE", "data.json"),
            static_dir: try_load("STATIC_DIR", "public"),
            lenient_writes: try_load("LENIENT_WRITES", "false"),
        }
    }

    /// File-only configuration rooted at `data_file`, no key-value store.
    pub fn file_only(data_file: impl Into<PathBuf>) -> Self {
        Self {
            port: 0,
            redis_url: None,
            data_file: data_file.into(),
            static_dir: PathBuf::from("public"),
            lenient_writes: false,
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parses `key` from the environment, falling back to `default` when it is
/// unset or does not parse. Only a bad `default` aborts startup.
fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    if let Some(raw) = var(key) {
        match raw.trim().parse() {
            Ok(value) => return value,
            Err(e) => warn!("Ignoring {key}={raw}: {e}, using default: {default}"),
        }
    } else {
        info!("{key} not set, using default: {default}");
    }

    default
        .parse()
        .unwrap_or_else(|e| panic!("Default for {key} is invalid: {e}"))
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            info!("No {secret_name} secret file: {e}");
        })
        .ok()
        .filter(|s| !s.is_empty())
}
