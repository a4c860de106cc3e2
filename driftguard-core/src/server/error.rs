//! Error responses for the drift service.

use crate::error::DriftError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// A failed drift request, rendered as `{"error": ..., "message": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Drift(#[from] DriftError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Drift(DriftError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Drift(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Drift(DriftError::NotFound { .. }) => "not_found",
            Self::Drift(DriftError::UnsupportedFormat { .. }) => "unsupported_format",
            Self::Drift(DriftError::Io(_)) => "unreadable",
            Self::Drift(_) => "invalid_data",
            Self::BadRequest(_) => "bad_request",
            Self::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Drift request failed");
        } else {
            tracing::warn!(error = %self, "Drift request rejected");
        }
        let body = Json(json!({
            "error": self.code(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}
