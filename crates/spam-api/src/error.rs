use std::error::Error as _;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use spam_inference::InferenceError;
use tracing::{error, warn};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid threshold `{0}`: expected a number")]
    InvalidThreshold(String),

    #[error("failed to load scoring artifacts")]
    Artifacts(#[source] InferenceError),

    #[error("failed to score text")]
    Scoring(#[source] InferenceError),

    #[error("artifact loading task did not complete")]
    Join(#[from] tokio::task::JoinError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidThreshold(_) => StatusCode::BAD_REQUEST,
            Self::Artifacts(_) | Self::Scoring(_) | Self::Join(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The error and all of its sources, outermost first.
    fn chain(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.chain();
        if status.is_server_error() {
            error!(%status, error = %message, "Request failed");
        } else {
            warn!(%status, error = %message, "Rejected request");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
