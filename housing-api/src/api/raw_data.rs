//! Browsing and clearing stored raw records

use axum::extract::{Query, State};
use axum::Json;
use housing_common::db::documents::{self, Document};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::pagination::{clamp_page, default_limit};
use crate::{ApiResult, AppState};

use super::upload::CollectionQuery;

#[derive(Debug, Deserialize)]
pub struct RawDataQuery {
    pub db_name: Option<String>,
    pub collection_name: Option<String>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct RawDataResponse {
    pub data: Vec<Document>,
    pub skip: i64,
    pub limit: i64,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub deleted: u64,
}

/// GET /api/raw_data
pub async fn get_raw_data(
    State(state): State<AppState>,
    Query(query): Query<RawDataQuery>,
) -> ApiResult<Json<RawDataResponse>> {
    let collection = CollectionQuery {
        db_name: query.db_name,
        collection_name: query.collection_name,
    }
    .key(&state);
    let page = clamp_page(query.skip, query.limit);

    let data = documents::find_page(&state.documents, &collection, page.skip, page.limit).await?;
    let total = documents::count(&state.documents, &collection).await?;
    info!("Fetched {} of {} documents from {}", data.len(), total, collection);

    Ok(Json(RawDataResponse {
        data,
        skip: page.skip,
        limit: page.limit,
        total,
    }))
}

/// DELETE /api/raw_data
pub async fn delete_raw_data(
    State(state): State<AppState>,
    Query(query): Query<CollectionQuery>,
) -> ApiResult<Json<DeleteResponse>> {
    let collection = query.key(&state);
    let deleted = documents::delete_all(&state.documents, &collection).await?;

    Ok(Json(DeleteResponse {
        message: format!(
            "All documents in {} have been deleted successfully.",
            collection
        ),
        deleted,
    }))
}
