use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::{automock, predicate::*};
use thiserror::Error;

use crate::domain::entities::{BlobRecord, StoredBlob};
use crate::domain::value_objects::{BlobId, ContentHash};

#[derive(Debug, Error)]
pub enum BackendError {
    /// The unique rule on `content_hash` rejected the insert
    #[error("Content hash already stored: {0}")]
    Conflict(ContentHash),

    #[error("Blob not found: {0}")]
    NotFound(BlobId),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Port for the single logical blob collection.
///
/// Implementations must enforce uniqueness of well-formed content hashes
/// themselves: `create` for a hash that is already stored fails with
/// [`BackendError::Conflict`] and writes nothing.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BlobBackend: Send + Sync {
    /// Atomically store bytes, record and dedup index entry
    async fn create(&self, blob: StoredBlob) -> Result<BlobId, BackendError>;

    /// Load bytes and metadata
    async fn read(&self, id: &BlobId) -> Result<StoredBlob, BackendError>;

    /// Load metadata only
    async fn find_by_id(&self, id: &BlobId) -> Result<Option<BlobRecord>, BackendError>;

    /// Dedup index lookup
    async fn find_by_hash(&self, hash: &ContentHash) -> Result<Option<BlobId>, BackendError>;

    /// Remove bytes and index entry
    async fn remove(&self, id: &BlobId) -> Result<(), BackendError>;

    /// Move `last_used_at` forward to `at`; never moves it back
    async fn touch_last_used(&self, id: &BlobId, at: DateTime<Utc>) -> Result<(), BackendError>;

    /// Records created before `cutoff` and not used since, ordered by id,
    /// starting strictly after `after`
    async fn find_retention_candidates(
        &self,
        cutoff: DateTime<Utc>,
        after: Option<BlobId>,
        limit: i64,
    ) -> Result<Vec<BlobRecord>, BackendError>;
}
