use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::Serialize;

use crate::extractors::{JsonBody, PlayerId};
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::trainer::filter::{filter_by_attributes, FilterSpec};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(get_settings).put(update_settings).delete(clear_settings),
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SettingsView {
    filters: FilterSpec,
    matching_puzzles: usize,
    total_puzzles: usize,
}

fn view(state: &AppState, filters: FilterSpec) -> SettingsView {
    let items = state.corpus().items();
    SettingsView {
        matching_puzzles: filter_by_attributes(items, &filters).len(),
        total_puzzles: items.len(),
        filters,
    }
}

async fn get_settings(
    player: PlayerId,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let filters = state.store().get_settings(player.as_str())?;
    Ok(ok(view(&state, filters)))
}

/// Replaces the whole filter spec; omitted dimensions become unrestricted.
async fn update_settings(
    player: PlayerId,
    State(state): State<AppState>,
    JsonBody(filters): JsonBody<FilterSpec>,
) -> Result<impl IntoResponse, AppError> {
    state.store().set_settings(player.as_str(), &filters)?;
    let saved = view(&state, filters);
    if saved.matching_puzzles == 0 {
        tracing::info!(player_id = player.as_str(), "Saved filters match no puzzles");
    }
    Ok(ok(saved))
}

async fn clear_settings(
    player: PlayerId,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    state.store().clear_settings(player.as_str())?;
    Ok(ok(view(&state, FilterSpec::unrestricted())))
}
