use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::extractors::PlayerId;
use crate::response::{ok, page, AppError};
use crate::state::AppState;
use crate::validation::clamp_page_size;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile))
        .route("/history", get(get_history))
        .route("/reset", post(reset_progress))
}

async fn get_profile(
    player: PlayerId,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let profile = state.engine().profile(player.as_str()).await?;
    Ok(ok(profile))
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<usize>,
    offset: Option<usize>,
}

async fn get_history(
    player: PlayerId,
    Query(q): Query<HistoryQuery>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let limit = clamp_page_size(q.limit);
    let offset = q.offset.unwrap_or(0);
    let attempts = state
        .store()
        .list_attempts(player.as_str(), limit, offset)?;
    let total = state.store().count_attempts(player.as_str())?;
    Ok(page(attempts, total, limit, offset))
}

async fn reset_progress(
    player: PlayerId,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let profile = state.engine().reset_progress(player.as_str()).await?;
    tracing::info!(player_id = player.as_str(), "Progress reset requested");
    Ok(ok(profile))
}
