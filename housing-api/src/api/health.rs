//! Root greeting and health check endpoints

use axum::{extract::State, routing::get, Json, Router};
use housing_common::db::documents;
use serde::Serialize;
use tracing::{error, info};

use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// GET /
pub async fn root() -> Json<MessageResponse> {
    info!("Root endpoint accessed.");
    Json(MessageResponse {
        message: "Welcome to the Housing Data API!".to_string(),
    })
}

/// GET /api/health
///
/// Pings the document store; any store failure reports the service unhealthy.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    match documents::ping(&state.documents).await {
        Ok(()) => {
            info!("Health check passed.");
            Ok(Json(HealthResponse {
                status: "healthy".to_string(),
            }))
        }
        Err(e) => {
            error!("Health check failed: {}", e);
            Err(ApiError::Internal("Service unhealthy.".to_string()))
        }
    }
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
