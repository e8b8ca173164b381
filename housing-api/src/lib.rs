//! housing-api library - REST service over the preprocessing pipeline
//!
//! Uploaded CSV files are preprocessed and stored in the document store;
//! stored records are scored by the regression model and written to the
//! prediction store.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use housing_common::config::HousingConfig;
use housing_common::FeatureSchema;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod pagination;

pub use error::{ApiError, ApiResult};

/// Largest accepted upload body
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Document store pool (raw preprocessed records)
    pub documents: SqlitePool,
    /// Prediction store pool
    pub predictions: SqlitePool,
    /// Resolved service configuration
    pub config: Arc<HousingConfig>,
    /// Feature schema shared by upload preprocessing and prediction alignment
    pub schema: Arc<FeatureSchema>,
}

impl AppState {
    /// Create new application state with the housing feature schema
    pub fn new(documents: SqlitePool, predictions: SqlitePool, config: HousingConfig) -> Self {
        Self {
            documents,
            predictions,
            config: Arc::new(config),
            schema: Arc::new(FeatureSchema::housing()),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route("/upload", post(api::upload_data))
        .route("/process", get(api::process_data))
        .route(
            "/raw_data",
            get(api::get_raw_data).delete(api::delete_raw_data),
        )
        .route("/predicted_data", get(api::get_predicted_data))
        .merge(api::health_routes());

    Router::new()
        .route("/", get(api::root))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
