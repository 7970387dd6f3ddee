use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{BlobId, ContentHash};

pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";
pub const DEFAULT_ORIGINAL_NAME: &str = "wallpaper.jpg";

/// Metadata of one stored blob. Everything except `last_used_at` is fixed
/// at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobRecord {
    id: BlobId,
    content_hash: ContentHash,
    size_bytes: u64,
    mime_type: String,
    original_name: String,
    created_at: DateTime<Utc>,
    last_used_at: Option<DateTime<Utc>>,
}

impl BlobRecord {
    /// Create a fresh record, never used yet
    pub fn new(
        content_hash: ContentHash,
        size_bytes: u64,
        mime_type: impl Into<String>,
        original_name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: BlobId::new(),
            content_hash,
            size_bytes,
            mime_type: mime_type.into(),
            original_name: original_name.into(),
            created_at,
            last_used_at: None,
        }
    }

    /// Reconstruct from storage
    pub fn reconstruct(
        id: BlobId,
        content_hash: ContentHash,
        size_bytes: u64,
        mime_type: String,
        original_name: String,
        created_at: DateTime<Utc>,
        last_used_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            content_hash,
            size_bytes,
            mime_type,
            original_name,
            created_at,
            last_used_at,
        }
    }

    /// Record a use. Older timestamps are ignored so the value never goes back.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        if self.last_used_at.map_or(true, |prev| at > prev) {
            self.last_used_at = Some(at);
        }
    }

    /// True when both creation and last use (if any) are before `cutoff`
    pub fn is_stale(&self, cutoff: DateTime<Utc>) -> bool {
        self.created_at < cutoff && self.last_used_at.map_or(true, |used| used < cutoff)
    }

    // Getters
    pub fn id(&self) -> BlobId {
        self.id
    }

    pub fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_used_at(&self) -> Option<DateTime<Utc>> {
        self.last_used_at
    }
}

/// A record together with its bytes
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub record: BlobRecord,
    pub data: Bytes,
}
