use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "uptimeSecs": state.uptime_secs(),
        "corpus": {
            "items": state.corpus().len(),
        },
    }))
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Ready once the corpus is non-empty and the store answers a read.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let store_healthy = state.store().get_settings("__health_check__").is_ok();
    let latency_us = start.elapsed().as_micros() as u64;
    let ready = store_healthy && !state.corpus().is_empty();

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(serde_json::json!({
            "ready": ready,
            "store": { "healthy": store_healthy, "latencyUs": latency_us },
            "corpus": { "items": state.corpus().len() },
        })),
    )
}
