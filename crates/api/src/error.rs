//! API error type and its JSON rendering

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors returned to HTTP callers as `{"error": "<message>"}`
#[derive(Debug, Error)]
pub enum ApiError {
    /// Upstream answered with a non-2xx status; relayed as-is
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("{0}")]
    InternalError(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Upstream { status, .. } => *status,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
