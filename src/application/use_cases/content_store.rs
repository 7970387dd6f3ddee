use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::application::dto::{BlobContent, PutOutcome, Upload};
use crate::application::errors::StoreError;
use crate::application::ports::{BackendError, BlobBackend};
use crate::domain::entities::{BlobRecord, StoredBlob};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{BlobId, ContentHash};

/// How many times `put` re-runs lookup + create when the record that won a
/// hash conflict disappears before it can be read back.
pub const MAX_PUT_ATTEMPTS: u32 = 3;

/// Content-addressed store with dedup.
///
/// The backend's unique rule on the content hash is what guarantees a
/// single copy per content. The lookup before `create` only saves a write
/// in the common case; losing the race on `create` is expected and is
/// resolved by reading back the winner.
pub struct ContentStore {
    backend: Arc<dyn BlobBackend>,
}

impl ContentStore {
    pub fn new(backend: Arc<dyn BlobBackend>) -> Self {
        Self { backend }
    }

    /// Store content unless identical bytes are already stored
    pub async fn put(&self, upload: Upload) -> Result<PutOutcome, StoreError> {
        if upload.data.is_empty() {
            return Err(DomainError::EmptyContent.into());
        }

        let content_hash = ContentHash::of(&upload.data);

        for attempt in 1..=MAX_PUT_ATTEMPTS {
            if let Some(id) = self.backend.find_by_hash(&content_hash).await? {
                debug!(%id, hash = content_hash.short(), "Content already stored");
                return Ok(PutOutcome {
                    id,
                    content_hash,
                    created: false,
                });
            }

            let record = BlobRecord::new(
                content_hash.clone(),
                upload.data.len() as u64,
                upload.mime_type_or_default(),
                upload.original_name_or_default(),
                Utc::now(),
            );
            let blob = StoredBlob {
                record,
                data: upload.data.clone(),
            };

            match self.backend.create(blob).await {
                Ok(id) => {
                    info!(
                        %id,
                        hash = content_hash.short(),
                        size_bytes = upload.data.len(),
                        "Stored new blob"
                    );
                    return Ok(PutOutcome {
                        id,
                        content_hash,
                        created: true,
                    });
                }
                Err(BackendError::Conflict(_)) => {
                    debug!(
                        hash = content_hash.short(),
                        attempt, "Concurrent insert won the dedup race, reading it back"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(StoreError::DedupRace {
            hash: content_hash,
            attempts: MAX_PUT_ATTEMPTS,
        })
    }

    /// Load content by id
    pub async fn get(&self, id: &BlobId) -> Result<BlobContent, StoreError> {
        let stored = self.backend.read(id).await?;
        Ok(BlobContent {
            mime_type: stored.record.mime_type().to_string(),
            original_name: stored.record.original_name().to_string(),
            data: stored.data,
        })
    }

    /// Load metadata by id
    pub async fn info(&self, id: &BlobId) -> Result<BlobRecord, StoreError> {
        self.backend
            .find_by_id(id)
            .await?
            .ok_or(StoreError::NotFound(*id))
    }

    /// Remove content and its dedup entry. A second call reports `NotFound`.
    pub async fn delete(&self, id: &BlobId) -> Result<(), StoreError> {
        self.backend.remove(id).await?;
        debug!(%id, "Deleted blob");
        Ok(())
    }
}
