//! Relational store for model predictions
//!
//! One table row per predicted record: the aligned feature values, the
//! prediction and the time it was produced.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use sqlx::{Column, Row, SqlitePool, TypeInfo, ValueRef};
use tracing::{debug, info, warn};

use crate::preprocess::FeatureMatrix;
use crate::{Error, Result};

pub const PREDICTION_COLUMN: &str = "predictions";
pub const TIMESTAMP_COLUMN: &str = "prediction_timestamp";

/// Validate an identifier before it is spliced into SQL
pub fn is_valid_identifier(name: &str) -> bool {
    // Only allow alphanumeric and underscore
    name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.is_empty()
        && name.len() < 100
}

fn check_identifier(name: &str) -> Result<()> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("Invalid identifier: {}", name)))
    }
}

/// Create the predictions table for this feature layout if it doesn't exist
pub async fn ensure_predictions_table(pool: &SqlitePool, table: &str, feature_names: &[String]) -> Result<()> {
    check_identifier(table)?;
    for name in feature_names {
        check_identifier(name)?;
    }

    let mut columns = vec!["id INTEGER PRIMARY KEY AUTOINCREMENT".to_string()];
    columns.extend(feature_names.iter().map(|name| format!("\"{}\" REAL", name)));
    columns.push(format!("{} REAL", PREDICTION_COLUMN));
    columns.push(format!("{} TEXT NOT NULL", TIMESTAMP_COLUMN));

    let sql = format!(
        "CREATE TABLE IF NOT EXISTS \"{}\" ({})",
        table,
        columns.join(", ")
    );
    sqlx::query(&sql).execute(pool).await?;

    info!("Table {} created (if not exists).", table);
    Ok(())
}

/// Insert one row per feature row with its prediction; returns the inserted count
pub async fn save_predictions(
    pool: &SqlitePool,
    table: &str,
    features: &FeatureMatrix,
    predictions: &[f64],
    timestamp: DateTime<Utc>,
) -> Result<usize> {
    if features.n_rows() != predictions.len() {
        return Err(Error::InvalidInput(format!(
            "{} feature rows but {} predictions",
            features.n_rows(),
            predictions.len()
        )));
    }

    ensure_predictions_table(pool, table, features.columns()).await?;

    let column_list = features
        .columns()
        .iter()
        .map(|name| format!("\"{}\"", name))
        .chain([PREDICTION_COLUMN.to_string(), TIMESTAMP_COLUMN.to_string()])
        .collect::<Vec<_>>();
    let placeholders = vec!["?"; column_list.len()].join(", ");
    let sql = format!(
        "INSERT INTO \"{}\" ({}) VALUES ({})",
        table,
        column_list.join(", "),
        placeholders
    );

    let timestamp = timestamp.to_rfc3339();
    let mut tx = pool.begin().await?;
    for (row, prediction) in features.rows().iter().zip(predictions) {
        let mut query = sqlx::query(&sql);
        for value in row {
            query = query.bind(*value);
        }
        query
            .bind(*prediction)
            .bind(&timestamp)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    info!("Inserted {} records into {}.", predictions.len(), table);
    Ok(predictions.len())
}

/// Newest predictions first, skipping `skip` and returning at most `limit`
pub async fn fetch_predictions(pool: &SqlitePool, table: &str, limit: i64, skip: i64) -> Result<Vec<Map<String, Value>>> {
    check_identifier(table)?;

    let exists: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
    )
    .bind(table)
    .fetch_one(pool)
    .await?;
    if exists == 0 {
        warn!("Predictions table {} does not exist yet.", table);
        return Ok(Vec::new());
    }

    let sql = format!("SELECT * FROM \"{}\" ORDER BY id DESC LIMIT ? OFFSET ?", table);
    debug!("Executing SQL query: {}", sql);

    let rows = sqlx::query(&sql)
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;

    if rows.is_empty() {
        warn!("No rows fetched from the database.");
    } else {
        info!("Fetched {} rows from the database {}.", rows.len(), table);
    }

    Ok(rows.iter().map(row_to_json).collect())
}

/// Convert a SQLite row to a JSON object keyed by column name
fn row_to_json(row: &sqlx::sqlite::SqliteRow) -> Map<String, Value> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let value = row
                .try_get_raw(i)
                .ok()
                .and_then(|raw| {
                    if raw.is_null() {
                        return Some(Value::Null);
                    }
                    // Decode by the stored value's runtime type
                    match raw.type_info().name() {
                        "INTEGER" => row.try_get::<i64, _>(i).ok().map(|v| json!(v)),
                        "REAL" => row.try_get::<f64, _>(i).ok().map(|v| json!(v)),
                        "TEXT" => row.try_get::<String, _>(i).ok().map(Value::String),
                        _ => None,
                    }
                })
                .unwrap_or(Value::Null);
            (column.name().to_string(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn matrix(rows: Vec<Vec<f64>>) -> FeatureMatrix {
        FeatureMatrix::new(vec!["longitude".to_string(), "latitude".to_string()], rows)
    }

    #[test]
    fn test_identifier_validation() {
        assert!(is_valid_identifier("predictions"));
        assert!(is_valid_identifier("ocean_proximity__LT_1H_OCEAN"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("x; DROP TABLE y"));
        assert!(!is_valid_identifier("a\"b"));
    }

    #[tokio::test]
    async fn test_save_and_fetch_newest_first() {
        let pool = open_in_memory().await.unwrap();
        let features = matrix(vec![vec![-122.0, 37.0], vec![-121.0, 38.0]]);
        let ts = Utc::now();

        let inserted = save_predictions(&pool, "predictions", &features, &[1.5, 2.5], ts)
            .await
            .unwrap();
        assert_eq!(inserted, 2);

        let rows = fetch_predictions(&pool, "predictions", 10, 0).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], json!(2));
        assert_eq!(rows[0]["longitude"], json!(-121.0));
        assert_eq!(rows[0][PREDICTION_COLUMN], json!(2.5));
        assert_eq!(rows[0][TIMESTAMP_COLUMN], json!(ts.to_rfc3339()));

        let page = fetch_predictions(&pool, "predictions", 1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0]["id"], json!(1));
    }

    #[tokio::test]
    async fn test_fetch_missing_table_is_empty() {
        let pool = open_in_memory().await.unwrap();
        let rows = fetch_predictions(&pool, "predictions", 10, 0).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_length_mismatch_rejected() {
        let pool = open_in_memory().await.unwrap();
        let features = matrix(vec![vec![0.0, 0.0]]);
        let err = save_predictions(&pool, "predictions", &features, &[], Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
