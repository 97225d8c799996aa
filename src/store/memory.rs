//! In-memory history store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use super::{HistoryStore, StoreError};
use crate::models::{ClassificationRecord, NewClassification};

#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    records: RwLock<Vec<ClassificationRecord>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert with an explicit creation time
    pub fn insert_at(&self, new: NewClassification, created_at: DateTime<Utc>) -> ClassificationRecord {
        let record = new.into_record(Uuid::new_v4(), created_at);
        self.records.write().push(record.clone());
        record
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn insert(&self, new: NewClassification) -> Result<ClassificationRecord, StoreError> {
        Ok(self.insert_at(new, Utc::now()))
    }

    async fn count_since(&self, session_id: &str, since: DateTime<Utc>) -> Result<u64, StoreError> {
        let count = self
            .records
            .read()
            .iter()
            .filter(|r| r.session_id.as_deref() == Some(session_id) && r.created_at >= since)
            .count();
        Ok(count as u64)
    }

    async fn list_by_session(&self, session_id: &str) -> Result<Vec<ClassificationRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|r| r.session_id.as_deref() == Some(session_id))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn delete_by_session(&self, session_id: &str) -> Result<u64, StoreError> {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|r| r.session_id.as_deref() != Some(session_id));
        Ok((before - records.len()) as u64)
    }
}
