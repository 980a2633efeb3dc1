use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;

use crate::corpus::{prepare_item, Attributes, CorpusError, Item};
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::trainer::engine::PuzzleView;
use crate::trainer::ranks::difficulty_label;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_puzzles))
        .route("/validate", post(validate_puzzle))
        .route("/:id", get(get_puzzle))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PuzzleSummary<'a> {
    id: u32,
    title: &'a str,
    difficulty_rating: i32,
    difficulty_label: &'static str,
    attributes: &'a Attributes,
}

async fn list_puzzles(State(state): State<AppState>) -> impl IntoResponse {
    let summaries: Vec<PuzzleSummary<'_>> = state
        .corpus()
        .items()
        .iter()
        .map(|item| PuzzleSummary {
            id: item.id,
            title: &item.title,
            difficulty_rating: item.difficulty_rating,
            difficulty_label: difficulty_label(item.difficulty_rating),
            attributes: &item.attributes,
        })
        .collect();
    ok(serde_json::json!({
        "total": summaries.len(),
        "items": summaries,
    }))
}

async fn get_puzzle(
    Path(id): Path<u32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let item = state
        .corpus()
        .get(id)
        .ok_or_else(|| AppError::not_found(&format!("Puzzle {id} not found")))?;
    Ok(ok(PuzzleView::from(item)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidatedPuzzle {
    item: Item,
    id_in_use: bool,
}

/// Checks an authored draft against the corpus rules. Nothing is stored.
async fn validate_puzzle(
    State(state): State<AppState>,
    JsonBody(draft): JsonBody<serde_json::Value>,
) -> Result<impl IntoResponse, AppError> {
    let item: Item = serde_json::from_value(draft).map_err(CorpusError::from)?;
    let item = prepare_item(item)?;
    let id_in_use = state.corpus().get(item.id).is_some();
    Ok(ok(ValidatedPuzzle { item, id_in_use }))
}
