use crate::{new_record_id, StoreError, SubmissionStore};
use async_trait::async_trait;
use binsight_model::{RecordId, StoredRecord, SurveyRecord};
use tokio::sync::Mutex;

/// In-process store. Default backend when nothing durable is configured,
/// and the test double for everything above the trait.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<StoredRecord>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn append(&self, record: &SurveyRecord) -> Result<RecordId, StoreError> {
        let id = new_record_id();
        self.records.lock().await.push(StoredRecord {
            id: id.clone(),
            record: record.clone(),
        });
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<StoredRecord>, StoreError> {
        let records = self.records.lock().await;
        Ok(records.iter().rev().cloned().collect())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        self.records.lock().await.clear();
        Ok(())
    }

    async fn delete_one(&self, id: &RecordId) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|r| &r.id != id);
        if records.len() == before {
            return Err(StoreError::new(
                crate::StoreErrorCode::NotFound,
                format!("no submission with id {id}"),
            ));
        }
        Ok(())
    }
}
