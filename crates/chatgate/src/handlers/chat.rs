//! Chat HTTP handler.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::debug;

use crate::llm::ChatInput;
use crate::response;
use crate::server::AppState;

#[derive(Serialize)]
pub struct ChatResponse {
    response: String,
}

/// POST /api/chat
///
/// Bodies that do not deserialize get the same `{"error": ...}` shape as
/// every other failure.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatInput>, JsonRejection>,
) -> Result<Json<ChatResponse>, Response> {
    let Json(input) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected chat request body");
        response::bad_request(rejection.body_text()).into_response()
    })?;

    let response = state
        .chat
        .chat(input)
        .await
        .map_err(IntoResponse::into_response)?;
    Ok(Json(ChatResponse { response }))
}
