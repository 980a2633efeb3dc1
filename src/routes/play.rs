use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::extractors::{JsonBody, PlayerId};
use crate::response::{ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/next", get(next_puzzle))
        .route("/answer", post(submit_answer))
}

async fn next_puzzle(
    player: PlayerId,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let next = state.engine().next_puzzle(player.as_str()).await?;
    Ok(ok(next))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerRequest {
    puzzle_id: u32,
    choice_id: String,
}

async fn submit_answer(
    player: PlayerId,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let choice_id = req.choice_id.trim();
    if choice_id.is_empty() {
        return Err(AppError::bad_request(
            "INVALID_CHOICE",
            "choiceId must not be empty",
        ));
    }

    let outcome = state
        .engine()
        .submit_answer(player.as_str(), req.puzzle_id, choice_id)
        .await?;
    Ok(ok(outcome))
}
