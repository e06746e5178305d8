#![forbid(unsafe_code)]
//! Persistence for survey submissions. One async trait, three backends;
//! records are immutable after append and leave only through the admin
//! clear/delete operations.

use async_trait::async_trait;
use binsight_model::{RecordId, StoredRecord, SurveyRecord};
use std::fmt::{Display, Formatter};

mod json_file;
mod memory;
mod sqlite;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub const CRATE_NAME: &str = "binsight-store";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorCode {
    NotFound,
    Malformed,
    Io,
    Internal,
}

impl StoreErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Malformed => "malformed",
            Self::Io => "io_error",
            Self::Internal => "internal_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for StoreError {}

/// Capability surface the rest of the system needs from persistence.
/// `list_all` returns newest first.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn append(&self, record: &SurveyRecord) -> Result<RecordId, StoreError>;
    async fn list_all(&self) -> Result<Vec<StoredRecord>, StoreError>;
    async fn delete_all(&self) -> Result<(), StoreError>;
    async fn delete_one(&self, id: &RecordId) -> Result<(), StoreError>;
}

pub(crate) fn new_record_id() -> RecordId {
    RecordId::new(uuid::Uuid::new_v4().to_string())
}
