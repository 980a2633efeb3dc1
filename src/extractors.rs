use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::response::IntoResponse;
use serde::de::DeserializeOwned;

use crate::response::AppError;
use crate::validation::is_valid_player_id;

pub const PLAYER_ID_HEADER: &str = "x-player-id";

/// A wrapper around `axum::Json<T>` that returns `AppError` on deserialization failure
/// instead of Axum's default plain-text rejection.
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection_to_app_error(rejection)),
        }
    }
}

fn json_rejection_to_app_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(e) => {
            tracing::warn!(error = %e, "JSON data deserialization failed");
            AppError::bad_request("INVALID_REQUEST_BODY", &e.body_text())
        }
        JsonRejection::JsonSyntaxError(e) => {
            tracing::warn!(error = %e, "JSON syntax parsing failed");
            AppError::bad_request("INVALID_REQUEST_BODY", "Request body is not valid JSON")
        }
        JsonRejection::MissingJsonContentType(e) => {
            tracing::warn!(error = %e, "Missing or invalid JSON Content-Type");
            AppError::bad_request(
                "INVALID_REQUEST_BODY",
                "Expected Content-Type: application/json",
            )
        }
        other => {
            tracing::warn!(error = %other, "Unexpected JSON body rejection");
            AppError::bad_request("INVALID_REQUEST_BODY", "Invalid request body")
        }
    }
}

impl<T> std::ops::Deref for JsonBody<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: serde::Serialize> IntoResponse for JsonBody<T> {
    fn into_response(self) -> axum::response::Response {
        axum::Json(self.0).into_response()
    }
}

/// The caller-chosen player identity from the `x-player-id` header.
///
/// Identity is asserted, not authenticated.
#[derive(Debug, Clone)]
pub struct PlayerId(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for PlayerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(PLAYER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| is_valid_player_id(s))
            .ok_or_else(|| {
                AppError::unauthorized(
                    "PLAYER_ID_REQUIRED",
                    "Send an x-player-id header of 1-64 letters, digits, '-' or '_'",
                )
            })?;

        Ok(PlayerId(id.to_string()))
    }
}

impl PlayerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
