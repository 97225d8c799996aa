//! History store - where classification records live.
//!
//! All record access goes through [`HistoryStore`]. The production backend is
//! PostgreSQL; the in-memory backend serves tests and local demos.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{ClassificationRecord, NewClassification};

pub mod memory;
pub mod postgres;

pub use memory::MemoryHistoryStore;
pub use postgres::PgHistoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt record {id}: {reason}")]
    Corrupt { id: uuid::Uuid, reason: String },
}

/// Append-only record store keyed by session id
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persist a record; the store assigns `id` and `created_at`.
    async fn insert(&self, new: NewClassification) -> Result<ClassificationRecord, StoreError>;

    /// Number of records of `session_id` created at or after `since`.
    async fn count_since(&self, session_id: &str, since: DateTime<Utc>) -> Result<u64, StoreError>;

    /// All records of a session, in no particular order.
    async fn list_by_session(&self, session_id: &str) -> Result<Vec<ClassificationRecord>, StoreError>;

    /// Delete every record of a session. Returns the number removed.
    async fn delete_by_session(&self, session_id: &str) -> Result<u64, StoreError>;

    /// Cheap reachability check used by `/health`.
    async fn ping(&self) -> Result<(), StoreError>;
}
