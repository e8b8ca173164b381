//! CSV upload endpoint
//!
//! The uploaded file is spooled to a temporary file, run through the
//! preprocessing pipeline and stored as one document per row: the aligned
//! feature values plus the `target` value.

use std::io::Write;

use axum::extract::{Multipart, Query, State};
use axum::Json;
use housing_common::db::documents::{self, collection_key, Document};
use housing_common::preprocess::{preprocess_path, FeatureMatrix};
use serde::Deserialize;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::health::MessageResponse;
use crate::{ApiError, ApiResult, AppState};

/// Field holding the target value in stored documents
pub const TARGET_FIELD: &str = "target";

/// Multipart field carrying the CSV file
const FILE_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct CollectionQuery {
    pub db_name: Option<String>,
    pub collection_name: Option<String>,
}

impl CollectionQuery {
    /// `<db>.<collection>` key, falling back to configured defaults
    pub fn key(&self, state: &AppState) -> String {
        let storage = &state.config.storage;
        collection_key(
            self.db_name.as_deref().unwrap_or(&storage.default_db_name),
            self.collection_name
                .as_deref()
                .unwrap_or(&storage.default_collection),
        )
    }
}

/// Feature rows as documents with the target value attached
pub fn to_documents(features: &FeatureMatrix, target: &[f64]) -> Vec<Document> {
    features
        .to_records()
        .into_iter()
        .zip(target)
        .map(|(mut record, value)| {
            record.insert(TARGET_FIELD.to_string(), Value::from(*value));
            record
        })
        .collect()
}

/// POST /api/upload
pub async fn upload_data(
    State(state): State<AppState>,
    Query(query): Query<CollectionQuery>,
    mut multipart: Multipart,
) -> ApiResult<Json<MessageResponse>> {
    let collection = query.key(&state);

    let mut spool = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload.csv").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;
        info!("Received file {} ({} bytes)", filename, bytes.len());

        let mut file = NamedTempFile::new()?;
        file.write_all(&bytes)?;
        file.flush()?;
        spool = Some(file);
        break;
    }
    let spool = spool.ok_or_else(|| ApiError::BadRequest("No file uploaded.".to_string()))?;

    let schema = state.schema.clone();
    let (features, target) =
        tokio::task::spawn_blocking(move || preprocess_path(spool.path(), &schema))
            .await
            .map_err(|e| ApiError::Internal(format!("Preprocessing task failed: {}", e)))??;
    debug!("Preprocessed upload into {:?}", features.shape());

    let records = to_documents(&features, &target);
    documents::insert_many(&state.documents, &collection, &records).await?;

    info!("Data uploaded and stored in {}", collection);
    Ok(Json(MessageResponse {
        message: "Data uploaded and stored successfully.".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_documents_attaches_target() {
        let features = FeatureMatrix::new(
            vec!["longitude".to_string()],
            vec![vec![-122.0], vec![-121.0]],
        );
        let docs = to_documents(&features, &[1.0, 2.0]);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1]["longitude"], json!(-121.0));
        assert_eq!(docs[1][TARGET_FIELD], json!(2.0));
    }
}
