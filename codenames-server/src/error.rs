//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use codenames_arena::ArenaError;
use codenames_core::CoreError;
use serde_json::json;

/// Error returned by a handler as `{ "error": message }`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<ArenaError> for ApiError {
    fn from(err: ArenaError) -> Self {
        let status = match &err {
            ArenaError::Core(
                CoreError::GameOver | CoreError::WrongPhase { .. } | CoreError::WrongTeam { .. },
            ) => StatusCode::CONFLICT,
            ArenaError::Core(
                CoreError::InvalidClueCount(_) | CoreError::CardIndexOutOfRange { .. },
            ) => StatusCode::BAD_REQUEST,
            ArenaError::InvalidMoveProviderResponse { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {}", err);
        }
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
