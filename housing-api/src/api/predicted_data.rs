//! Reading stored predictions

use axum::extract::{Query, State};
use axum::Json;
use housing_common::db::predictions;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::pagination::{clamp_page, default_limit};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct PredictedDataQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Overrides the configured predictions table
    pub table_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictedDataResponse {
    pub predicted_data: Vec<Map<String, Value>>,
    pub skip: i64,
    pub limit: i64,
}

/// GET /api/predicted_data
///
/// Newest predictions first.
pub async fn get_predicted_data(
    State(state): State<AppState>,
    Query(query): Query<PredictedDataQuery>,
) -> ApiResult<Json<PredictedDataResponse>> {
    let table = query
        .table_name
        .as_deref()
        .unwrap_or(&state.config.storage.predictions_table);
    let page = clamp_page(query.skip, query.limit);

    let rows = predictions::fetch_predictions(&state.predictions, table, page.limit, page.skip).await?;
    if rows.is_empty() {
        return Err(ApiError::NotFound("No predicted data found.".to_string()));
    }

    Ok(Json(PredictedDataResponse {
        predicted_data: rows,
        skip: page.skip,
        limit: page.limit,
    }))
}
