//! JSON error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::llm::ChatError;

/// Body of every error response: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ErrorBody>) {
    error_response(StatusCode::BAD_REQUEST, message)
}

pub fn internal_error(message: impl Into<String>) -> (StatusCode, Json<ErrorBody>) {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        match &self {
            ChatError::Validation(msg) => {
                debug!(error = %msg, "Rejected chat request");
                return bad_request(msg.clone()).into_response();
            }
            ChatError::Configuration(msg) => warn!(error = %msg, "Chat error"),
            ChatError::Upstream { status, .. } => error!(status, error = %self, "Chat error"),
            ChatError::Network(e) => error!(error = %e, "Chat error"),
        }
        internal_error(self.to_string()).into_response()
    }
}
