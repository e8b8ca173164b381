//! Document store for preprocessed raw records
//!
//! Records are schemaless JSON objects grouped into collections keyed by
//! `<db_name>.<collection_name>`. Each document gets a UUID returned as `_id`
//! when read back.

use chrono::Utc;
use serde_json::{Map, Value};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{Error, Result};

/// JSON object stored as one document
pub type Document = Map<String, Value>;

/// Field carrying the document id in read results
pub const ID_FIELD: &str = "_id";

/// Collection key for a database / collection pair
pub fn collection_key(db_name: &str, collection_name: &str) -> String {
    format!("{}.{}", db_name, collection_name)
}

/// Create the documents table if it doesn't exist
pub async fn init_documents_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            id TEXT PRIMARY KEY,
            collection TEXT NOT NULL,
            body TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection)")
        .execute(pool)
        .await?;

    debug!("Documents table initialized");
    Ok(())
}

/// Insert documents in one transaction; returns the number inserted
pub async fn insert_many(pool: &SqlitePool, collection: &str, records: &[Document]) -> Result<usize> {
    if records.is_empty() {
        return Ok(0);
    }

    // Serialize everything before taking a connection
    let created_at = Utc::now().to_rfc3339();
    let bodies = records
        .iter()
        .map(|record| {
            serde_json::to_string(record)
                .map_err(|e| Error::Internal(format!("Failed to serialize document: {}", e)))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut tx = pool.begin().await?;
    for body in &bodies {
        sqlx::query("INSERT INTO documents (id, collection, body, created_at) VALUES (?, ?, ?, ?)")
            .bind(Uuid::new_v4().to_string())
            .bind(collection)
            .bind(body)
            .bind(&created_at)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    info!("Inserted {} records into {}", bodies.len(), collection);
    Ok(bodies.len())
}

/// Documents in insertion order, skipping `skip` and returning at most `limit`
pub async fn find_page(pool: &SqlitePool, collection: &str, skip: i64, limit: i64) -> Result<Vec<Document>> {
    let rows = sqlx::query(
        "SELECT id, body FROM documents WHERE collection = ? ORDER BY rowid LIMIT ? OFFSET ?",
    )
    .bind(collection)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_document).collect()
}

/// Every document of a collection in insertion order
pub async fn find_all(pool: &SqlitePool, collection: &str) -> Result<Vec<Document>> {
    let rows = sqlx::query("SELECT id, body FROM documents WHERE collection = ? ORDER BY rowid")
        .bind(collection)
        .fetch_all(pool)
        .await?;

    rows.iter().map(row_to_document).collect()
}

pub async fn count(pool: &SqlitePool, collection: &str) -> Result<i64> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = ?")
        .bind(collection)
        .fetch_one(pool)
        .await?;
    Ok(total)
}

/// Delete every document of a collection; returns the deleted count
pub async fn delete_all(pool: &SqlitePool, collection: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM documents WHERE collection = ?")
        .bind(collection)
        .execute(pool)
        .await?;

    info!("Deleted {} documents from {}", result.rows_affected(), collection);
    Ok(result.rows_affected())
}

/// Round-trip a trivial query to check the store is reachable
pub async fn ping(pool: &SqlitePool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

fn row_to_document(row: &sqlx::sqlite::SqliteRow) -> Result<Document> {
    let id: String = row.try_get("id")?;
    let body: String = row.try_get("body")?;

    let mut document: Document = serde_json::from_str(&body)
        .map_err(|e| Error::Internal(format!("Failed to deserialize document {}: {}", id, e)))?;
    document.insert(ID_FIELD.to_string(), Value::String(id));
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use serde_json::json;

    async fn store() -> SqlitePool {
        let pool = open_in_memory().await.unwrap();
        init_documents_table(&pool).await.unwrap();
        pool
    }

    fn doc(value: Value) -> Document {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_insert_and_page() {
        let pool = store().await;
        let key = collection_key("housing", "data");
        let records: Vec<Document> = (0..5).map(|i| doc(json!({"n": i}))).collect();

        assert_eq!(insert_many(&pool, &key, &records).await.unwrap(), 5);
        assert_eq!(count(&pool, &key).await.unwrap(), 5);

        let page = find_page(&pool, &key, 1, 2).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0]["n"], json!(1));
        assert_eq!(page[1]["n"], json!(2));
        assert!(page[0][ID_FIELD].is_string());
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let pool = store().await;
        insert_many(&pool, "a.x", &[doc(json!({"v": 1}))]).await.unwrap();
        insert_many(&pool, "a.y", &[doc(json!({"v": 2}))]).await.unwrap();

        assert_eq!(delete_all(&pool, "a.x").await.unwrap(), 1);
        assert_eq!(count(&pool, "a.x").await.unwrap(), 0);
        assert_eq!(find_all(&pool, "a.y").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_empty_is_noop() {
        let pool = store().await;
        assert_eq!(insert_many(&pool, "a.x", &[]).await.unwrap(), 0);
        assert!(ping(&pool).await.is_ok());
    }
}
