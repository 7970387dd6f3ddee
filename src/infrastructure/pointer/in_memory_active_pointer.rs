use async_trait::async_trait;
use parking_lot::RwLock;

use crate::application::ports::{ActivePointer, PointerError};
use crate::domain::value_objects::BlobId;

#[derive(Default)]
pub struct InMemoryActivePointer {
    current: RwLock<Option<BlobId>>,
}

impl InMemoryActivePointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_current(id: BlobId) -> Self {
        Self {
            current: RwLock::new(Some(id)),
        }
    }
}

#[async_trait]
impl ActivePointer for InMemoryActivePointer {
    async fn get(&self) -> Result<Option<BlobId>, PointerError> {
        Ok(*self.current.read())
    }

    async fn set(&self, id: BlobId) -> Result<(), PointerError> {
        *self.current.write() = Some(id);
        Ok(())
    }
}
