use crate::{new_record_id, StoreError, StoreErrorCode, SubmissionStore};
use async_trait::async_trait;
use binsight_model::{RecordId, StoredRecord, SurveyRecord};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::warn;

/// Flat-file store: one JSON array per data file. Writes land in a
/// `.tmp` sibling and are renamed into place so readers never observe a
/// half-written file. An unparseable file is reset to an empty valid
/// store instead of poisoning every later call.
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes the read-modify-write cycle across concurrent appends.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_data_file(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        }
        if !self.path.exists() {
            fs::write(&self.path, "[]")
                .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        }
        Ok(())
    }

    fn read_records(&self) -> Result<Vec<StoredRecord>, StoreError> {
        self.ensure_data_file()?;
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        match serde_json::from_str::<Vec<StoredRecord>>(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "data file unreadable, resetting to empty");
                self.write_records(&[])?;
                Ok(Vec::new())
            }
        }
    }

    fn write_records(&self, records: &[StoredRecord]) -> Result<(), StoreError> {
        self.ensure_data_file()?;
        let bytes = serde_json::to_vec_pretty(records)
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for JsonFileStore {
    async fn append(&self, record: &SurveyRecord) -> Result<RecordId, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_records()?;
        let id = new_record_id();
        records.push(StoredRecord {
            id: id.clone(),
            record: record.clone(),
        });
        self.write_records(&records)?;
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<StoredRecord>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let records = self.read_records()?;
        Ok(records.into_iter().rev().collect())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.write_records(&[])
    }

    async fn delete_one(&self, id: &RecordId) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_records()?;
        let before = records.len();
        records.retain(|r| &r.id != id);
        if records.len() == before {
            return Err(StoreError::new(
                StoreErrorCode::NotFound,
                format!("no submission with id {id}"),
            ));
        }
        self.write_records(&records)
    }
}
