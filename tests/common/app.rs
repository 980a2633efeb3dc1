use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;

use scenario_trainer::config::{Config, TrainerEnvConfig};
use scenario_trainer::corpus::Corpus;
use scenario_trainer::routes::build_router;
use scenario_trainer::state::AppState;
use scenario_trainer::store::Store;
use scenario_trainer::trainer::config::TrainerConfig;
use scenario_trainer::trainer::engine::TrainerEngine;

use super::fixtures;

pub const TEST_SEED: u64 = 7;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
    _temp_dir: TempDir,
}

pub async fn spawn_with_corpus(corpus: Corpus) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let sled_path = temp_dir.path().join("trainer-test.sled");

    // Built directly so parallel tests never race on process env vars.
    let config = Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 3000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        sled_path: sled_path.to_string_lossy().to_string(),
        corpus_path: "fixture".to_string(),
        cors_origin: "http://localhost:5173".to_string(),
        trainer: TrainerEnvConfig {
            selector_seed: Some(TEST_SEED),
            ..TrainerEnvConfig::default()
        },
    };

    let store = Arc::new(Store::open(&config.sled_path).expect("open store"));
    store.run_migrations().expect("run migrations");

    let engine = Arc::new(TrainerEngine::new(
        TrainerConfig::from_env(&config.trainer),
        store.clone(),
        Arc::new(corpus),
        config.trainer.selector_seed,
    ));

    let state = AppState::new(store, engine, &config);
    let app = build_router(state.clone());

    TestApp {
        app,
        state,
        config,
        _temp_dir: temp_dir,
    }
}

pub async fn spawn_test_app() -> TestApp {
    spawn_with_corpus(fixtures::small_corpus()).await
}
