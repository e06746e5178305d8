use crate::{new_record_id, StoreError, StoreErrorCode, SubmissionStore};
use async_trait::async_trait;
use binsight_model::{RecordId, StoredRecord, SurveyRecord};
use rusqlite::Connection;
use std::path::Path;
use tokio::sync::Mutex;
use tracing::warn;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS submissions (
    id TEXT PRIMARY KEY,
    created_at TEXT NOT NULL,
    record TEXT NOT NULL
)";

/// SQLite-backed store. The canonical record is kept as one JSON document
/// per row; `created_at` is denormalized for ordering and inspection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        }
        let conn = Connection::open(path)
            .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl SubmissionStore for SqliteStore {
    async fn append(&self, record: &SurveyRecord) -> Result<RecordId, StoreError> {
        let id = new_record_id();
        let json = serde_json::to_string(record)
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))?;
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO submissions (id, created_at, record) VALUES (?1, ?2, ?3)",
            (id.as_str(), record.timestamp.as_str(), json.as_str()),
        )
        .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<StoredRecord>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT id, record FROM submissions ORDER BY rowid DESC")
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            let (id, json) = row.map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
            match serde_json::from_str::<SurveyRecord>(&json) {
                Ok(record) => records.push(StoredRecord {
                    id: RecordId::new(id),
                    record,
                }),
                Err(e) => {
                    // One bad row must not take the whole listing down.
                    warn!(id = %id, error = %e, "skipping malformed submission row");
                }
            }
        }
        Ok(records)
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM submissions", [])
            .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        Ok(())
    }

    async fn delete_one(&self, id: &RecordId) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let affected = conn
            .execute("DELETE FROM submissions WHERE id = ?1", [id.as_str()])
            .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        if affected == 0 {
            return Err(StoreError::new(
                StoreErrorCode::NotFound,
                format!("no submission with id {id}"),
            ));
        }
        Ok(())
    }
}
