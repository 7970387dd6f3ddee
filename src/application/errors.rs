//! Error types surfaced by the use cases

use thiserror::Error;

use crate::application::ports::{ApplyError, BackendError, PointerError};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{BlobId, ContentHash};

/// Errors of the content-addressed store.
///
/// Hash conflicts from the backend never show up here; the store resolves
/// them by re-reading the dedup index.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Blob not found: {0}")]
    NotFound(BlobId),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] DomainError),

    #[error("Storage backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Dedup index for {hash} kept changing after {attempts} attempts")]
    DedupRace { hash: ContentHash, attempts: u32 },

    #[error("Storage backend error: {0}")]
    Backend(#[source] BackendError),
}

impl From<BackendError> for StoreError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotFound(id) => Self::NotFound(id),
            BackendError::Unavailable(reason) => Self::BackendUnavailable(reason),
            other => Self::Backend(other),
        }
    }
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[derive(Debug, Error)]
pub enum ActivateError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Apply(#[from] ApplyError),
}

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("A retention sweep is already running")]
    AlreadyRunning,

    /// Without the current id nothing can be protected, so nothing is deleted
    #[error("Cannot read the active wallpaper pointer: {0}")]
    ActivePointer(#[from] PointerError),
}
