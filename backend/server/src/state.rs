use std::sync::Arc;

use super::{config::Config, storage::Storage};

pub struct State {
    pub config: Config,
    pub storage: Storage,
}

impl State {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let storage = Storage::from_config(&config).await;

        Arc::new(Self { config, storage })
    }

    pub fn with_storage(config: Config, storage: Storage) -> Arc<Self> {
        Arc::new(Self { config, storage })
    }
}
