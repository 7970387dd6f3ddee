use async_trait::async_trait;
#[cfg(test)]
use mockall::{automock, predicate::*};
use thiserror::Error;

use crate::domain::value_objects::BlobId;

#[derive(Debug, Error)]
pub enum PointerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt pointer: {0}")]
    Corrupt(String),
}

/// Where the id of the wallpaper currently on screen lives
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ActivePointer: Send + Sync {
    async fn get(&self) -> Result<Option<BlobId>, PointerError>;

    async fn set(&self, id: BlobId) -> Result<(), PointerError>;
}
