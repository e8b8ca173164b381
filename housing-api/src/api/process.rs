//! Prediction run over a stored collection

use axum::extract::{Query, State};
use axum::Json;
use housing_common::db::{documents, predictions};
use housing_common::preprocess::align_records;
use housing_common::{LinearRegressor, Regressor};
use serde::Serialize;
use tracing::{info, warn};

use super::upload::CollectionQuery;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub message: String,
    pub records: usize,
}

/// GET /api/process
///
/// Loads every document of the collection, aligns it to the expected feature
/// vector, predicts with the configured model and appends the results to the
/// prediction store.
pub async fn process_data(
    State(state): State<AppState>,
    Query(query): Query<CollectionQuery>,
) -> ApiResult<Json<ProcessResponse>> {
    let collection = query.key(&state);

    let mut records = documents::find_all(&state.documents, &collection).await?;
    if records.is_empty() {
        warn!("No data found in {}", collection);
        return Err(ApiError::NotFound("No data found in the collection.".to_string()));
    }
    for record in &mut records {
        record.remove(documents::ID_FIELD);
    }
    info!("Fetched {} records from {}", records.len(), collection);

    let features = align_records(&records, &state.schema);

    let model_path = state.config.model_path();
    let model = tokio::task::spawn_blocking(move || LinearRegressor::load(&model_path))
        .await
        .map_err(|e| ApiError::Internal(format!("Model load task failed: {}", e)))??;
    let values = model.predict(&features)?;

    let inserted = predictions::save_predictions(
        &state.predictions,
        &state.config.storage.predictions_table,
        &features,
        &values,
        housing_common::time::now(),
    )
    .await?;

    info!("Data processed and stored: {} predictions", inserted);
    Ok(Json(ProcessResponse {
        message: "Data processed and stored successfully.".to_string(),
        records: inserted,
    }))
}
