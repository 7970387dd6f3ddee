use bytes::Bytes;
use serde::Serialize;

use crate::domain::entities::{BlobRecord, DEFAULT_MIME_TYPE, DEFAULT_ORIGINAL_NAME};
use crate::domain::value_objects::{BlobId, ContentHash};

/// Raw content handed over by an uploader
#[derive(Debug, Clone)]
pub struct Upload {
    pub data: Bytes,
    pub mime_type: Option<String>,
    pub original_name: Option<String>,
}

impl Upload {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            mime_type: None,
            original_name: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_original_name(mut self, name: impl Into<String>) -> Self {
        self.original_name = Some(name.into());
        self
    }

    pub fn mime_type_or_default(&self) -> &str {
        self.mime_type
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
    }

    pub fn original_name_or_default(&self) -> &str {
        self.original_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(DEFAULT_ORIGINAL_NAME)
    }
}

/// Result of `ContentStore::put`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PutOutcome {
    pub id: BlobId,
    pub content_hash: ContentHash,
    /// False when the content was already stored
    pub created: bool,
}

/// Bytes returned by `ContentStore::get`
#[derive(Debug, Clone)]
pub struct BlobContent {
    pub data: Bytes,
    pub mime_type: String,
    pub original_name: String,
}

/// Printable view of a record
#[derive(Debug, Clone, Serialize)]
pub struct BlobInfo {
    pub id: String,
    pub content_hash: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub original_name: String,
    pub created_at: String,
    pub last_used_at: Option<String>,
}

impl From<&BlobRecord> for BlobInfo {
    fn from(record: &BlobRecord) -> Self {
        Self {
            id: record.id().to_string(),
            content_hash: record.content_hash().to_string(),
            size_bytes: record.size_bytes(),
            mime_type: record.mime_type().to_string(),
            original_name: record.original_name().to_string(),
            created_at: record.created_at().to_rfc3339(),
            last_used_at: record.last_used_at().map(|t| t.to_rfc3339()),
        }
    }
}
