use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::corpus::Corpus;
use crate::store::Store;
use crate::trainer::engine::TrainerEngine;

#[derive(Clone)]
pub struct AppState {
    store: Arc<Store>,
    engine: Arc<TrainerEngine>,
    config: Arc<Config>,
    started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<Store>, engine: Arc<TrainerEngine>, config: &Config) -> Self {
        Self {
            store,
            engine,
            config: Arc::new(config.clone()),
            started_at: Instant::now(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn engine(&self) -> &TrainerEngine {
        &self.engine
    }

    pub fn corpus(&self) -> &Corpus {
        self.engine.corpus()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
