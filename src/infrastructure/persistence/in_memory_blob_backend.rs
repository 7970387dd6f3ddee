use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::application::ports::{BackendError, BlobBackend};
use crate::domain::entities::{BlobRecord, StoredBlob};
use crate::domain::value_objects::{BlobId, ContentHash};

/// Process-local blob backend.
///
/// The hash index entry is claimed through the map's entry API, which plays
/// the part of the unique index: of several concurrent creates for one
/// hash exactly one wins.
#[derive(Default)]
pub struct InMemoryBlobBackend {
    blobs: DashMap<BlobId, StoredBlob>,
    by_hash: DashMap<ContentHash, BlobId>,
}

impl InMemoryBlobBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

#[async_trait]
impl BlobBackend for InMemoryBlobBackend {
    async fn create(&self, blob: StoredBlob) -> Result<BlobId, BackendError> {
        let id = blob.record.id();
        match self.by_hash.entry(blob.record.content_hash().clone()) {
            Entry::Occupied(entry) => Err(BackendError::Conflict(entry.key().clone())),
            Entry::Vacant(entry) => {
                // bytes first, so an id found through the index is always readable
                self.blobs.insert(id, blob);
                entry.insert(id);
                Ok(id)
            }
        }
    }

    async fn read(&self, id: &BlobId) -> Result<StoredBlob, BackendError> {
        self.blobs
            .get(id)
            .map(|blob| blob.value().clone())
            .ok_or(BackendError::NotFound(*id))
    }

    async fn find_by_id(&self, id: &BlobId) -> Result<Option<BlobRecord>, BackendError> {
        Ok(self.blobs.get(id).map(|blob| blob.record.clone()))
    }

    async fn find_by_hash(&self, hash: &ContentHash) -> Result<Option<BlobId>, BackendError> {
        Ok(self.by_hash.get(hash).map(|id| *id.value()))
    }

    async fn remove(&self, id: &BlobId) -> Result<(), BackendError> {
        let hash = self
            .blobs
            .get(id)
            .map(|blob| blob.record.content_hash().clone())
            .ok_or(BackendError::NotFound(*id))?;

        // index first, bytes second: the reverse of `create`
        self.by_hash.remove_if(&hash, |_, owner| owner == id);
        self.blobs
            .remove(id)
            .map(|_| ())
            .ok_or(BackendError::NotFound(*id))
    }

    async fn touch_last_used(&self, id: &BlobId, at: DateTime<Utc>) -> Result<(), BackendError> {
        let mut blob = self.blobs.get_mut(id).ok_or(BackendError::NotFound(*id))?;
        blob.record.touch(at);
        Ok(())
    }

    async fn find_retention_candidates(
        &self,
        cutoff: DateTime<Utc>,
        after: Option<BlobId>,
        limit: i64,
    ) -> Result<Vec<BlobRecord>, BackendError> {
        let mut candidates: Vec<BlobRecord> = self
            .blobs
            .iter()
            .filter(|blob| after.map_or(true, |after| *blob.key() > after))
            .filter(|blob| blob.record.is_stale(cutoff))
            .map(|blob| blob.record.clone())
            .collect();

        candidates.sort_by_key(|record| record.id());
        candidates.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(candidates)
    }
}
