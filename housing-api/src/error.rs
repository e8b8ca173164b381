//! API error types for housing-api
//!
//! Every failure renders as `{"detail": "<message>"}` with the matching status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use housing_common::{ModelError, PreprocessError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Preprocessing failure; client errors unless the file itself went missing
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    /// Model load or prediction failure
    #[error(transparent)]
    Model(#[from] ModelError),

    /// housing-common error
    #[error("Common error: {0}")]
    Common(#[from] housing_common::Error),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Preprocess(PreprocessError::Format(_))
            | ApiError::Preprocess(PreprocessError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Common(housing_common::Error::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Common(housing_common::Error::NotFound(_)) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Model(ModelError::NotFound(_)) => "Model file not found.".to_string(),
            ApiError::Preprocess(PreprocessError::Validation(msg))
            | ApiError::Preprocess(PreprocessError::Format(msg)) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_preprocess_client_errors_are_bad_request() {
        let err = ApiError::from(PreprocessError::Format("bad".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.detail(), "bad");

        let err = ApiError::from(PreprocessError::Validation("no target".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_model_detail() {
        let err = ApiError::from(ModelError::NotFound(PathBuf::from("models/model.json")));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail(), "Model file not found.");
    }

    #[test]
    fn test_invalid_input_is_bad_request() {
        let err = ApiError::from(housing_common::Error::InvalidInput("x".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
