use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderName, HeaderValue};
use scenario_trainer::config::Config;
use scenario_trainer::corpus::Corpus;
use scenario_trainer::extractors::PLAYER_ID_HEADER;
use scenario_trainer::logging::init_tracing;
use scenario_trainer::middleware::request_id::REQUEST_ID_HEADER;
use scenario_trainer::routes::build_router;
use scenario_trainer::state::AppState;
use scenario_trainer::store::Store;
use scenario_trainer::trainer::config::TrainerConfig;
use scenario_trainer::trainer::engine::TrainerEngine;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    init_tracing(&config.log_config());
    tracing::info!("Starting scenario-trainer");

    let trainer_config = TrainerConfig::from_env(&config.trainer);
    if let Err(reason) = trainer_config.validate() {
        panic!("FATAL: invalid trainer configuration: {reason}");
    }

    let (corpus, rejections) = Corpus::load(&config.corpus_path).expect("Failed to load puzzle corpus");
    if !rejections.is_empty() {
        tracing::warn!(rejected = rejections.len(), "Some corpus items were rejected");
    }
    let corpus = Arc::new(corpus);

    let store = Arc::new(Store::open(&config.sled_path).expect("Failed to open sled database"));
    store.run_migrations().expect("Failed to run migrations");

    if config.trainer.selector_seed.is_some() {
        tracing::info!("Puzzle selection uses a fixed seed");
    }
    let engine = Arc::new(TrainerEngine::new(
        trainer_config,
        store.clone(),
        corpus,
        config.trainer.selector_seed,
    ));

    let state = AppState::new(store.clone(), engine, &config);

    let cors_layer = build_cors_layer(&config);

    let app = build_router(state)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ));

    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!(%addr, "Listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "HTTP server crashed");
    }

    tracing::info!("Flushing store before exit");
    if let Err(e) = store.flush() {
        tracing::error!(error = %e, "Failed to flush store before exit");
    }
    tracing::info!("Shutdown complete");
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    let allowed_headers = [
        header::CONTENT_TYPE,
        header::ACCEPT,
        HeaderName::from_static(PLAYER_ID_HEADER),
        HeaderName::from_static(REQUEST_ID_HEADER),
    ];

    // Wildcard is for local development only and cannot carry credentials.
    if config.cors_origin.trim() == "*" {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_credentials(false)
            .allow_headers(allowed_headers)
            .allow_methods(Any);
    }

    match config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_headers(allowed_headers)
            .allow_methods(Any),
        Err(e) => {
            panic!(
                "FATAL: Invalid CORS_ORIGIN '{}': {}. \
                 Fix the CORS_ORIGIN environment variable.",
                config.cors_origin, e
            );
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = sigterm.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Shutdown signal received");
}
