use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::application::ports::{ActivePointer, BlobBackend, PointerError};
use crate::domain::value_objects::BlobId;

/// Bookkeeping of wallpaper usage: last-used timestamps on records and the
/// pointer to the wallpaper on screen.
pub struct UsageTracker {
    backend: Arc<dyn BlobBackend>,
    pointer: Arc<dyn ActivePointer>,
}

impl UsageTracker {
    pub fn new(backend: Arc<dyn BlobBackend>, pointer: Arc<dyn ActivePointer>) -> Self {
        Self { backend, pointer }
    }

    /// Stamp `last_used_at = now`.
    ///
    /// Activation has already happened when this runs, so failures are
    /// logged and swallowed.
    pub async fn mark_used(&self, id: &BlobId) {
        match self.backend.touch_last_used(id, Utc::now()).await {
            Ok(()) => debug!(%id, "Marked blob as used"),
            Err(e) => warn!(%id, error = %e, "Could not record wallpaper usage"),
        }
    }

    /// Id protected from retention, if any
    pub async fn current_id(&self) -> Result<Option<BlobId>, PointerError> {
        self.pointer.get().await
    }

    /// Point at a newly activated wallpaper. Failures are logged only.
    pub async fn set_current(&self, id: BlobId) {
        if let Err(e) = self.pointer.set(id).await {
            warn!(%id, error = %e, "Could not persist active wallpaper pointer");
        }
    }
}
