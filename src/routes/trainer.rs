use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::response::ok;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/config", get(get_config))
}

async fn get_config(State(state): State<AppState>) -> impl IntoResponse {
    ok(state.engine().config().await)
}
